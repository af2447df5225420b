use crate::genomics::{ConfigError, GeneticConfig, Genome, MarkingAllocator};
use crate::mutation::{
    AddConnectionMutator, AddNeuronMutator, Mutator, RemoveConnectionMutator, WeightMutator,
};
use crate::populations::speciation::speciate;
use crate::populations::{
    ElitistRouletteSelector, EvolveError, GenerationSummary, PopulationConfig, Selector, Species,
    Stats,
};

use ahash::RandomState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use std::collections::HashSet;

/// Scores genomes. The single selective-pressure hook of the evolver.
///
/// `evaluate` is a synchronous batch call over the whole generation;
/// any internal parallelism is the evaluator's business. Every genome
/// must leave the call with a fitness assigned, or the generation step
/// aborts.
pub trait FitnessEvaluator {
    /// Assigns a non-negative fitness to every genome in the slice.
    fn evaluate(&mut self, genomes: &mut [Genome]);

    /// The highest fitness `evaluate` can assign, when the task has
    /// one. Used to normalize champion fitness for `target_fitness`
    /// comparisons; `None` leaves fitness unnormalized.
    fn max_fitness(&self) -> Option<f64> {
        None
    }
}

/// Drives the generational loop over a population of genomes.
///
/// Each call to [`evolve_once`] runs one generation: evaluate,
/// re-speciate, select survivors, and refill the population with
/// mutated offspring allotted to species in proportion to their mean
/// surviving fitness. [`run`] loops generations until the configured
/// stopping condition and returns the all-time champion.
///
/// The evolver owns the run's random generator; [`seeded`] runs are
/// fully reproducible.
///
/// [`evolve_once`]: Evolver::evolve_once
/// [`run`]: Evolver::run
/// [`seeded`]: Evolver::seeded
pub struct Evolver {
    genetic: GeneticConfig,
    population: PopulationConfig,
    markings: MarkingAllocator,
    genomes: Vec<Genome>,
    species: Vec<Species>,
    selector: Box<dyn Selector>,
    weight_mutator: WeightMutator,
    add_neuron_mutator: AddNeuronMutator,
    add_connection_mutator: AddConnectionMutator,
    remove_connection_mutator: RemoveConnectionMutator,
    generation: usize,
    champion: Option<(Genome, f64)>,
    rng: StdRng,
}

impl Evolver {
    /// Creates an evolver with an entropy-seeded random generator and
    /// a population of minimal fully-connected genomes.
    ///
    /// # Errors
    /// Fails if either configuration carries an out-of-range scalar.
    pub fn new(
        genetic: GeneticConfig,
        population: PopulationConfig,
    ) -> Result<Evolver, ConfigError> {
        Evolver::with_rng(genetic, population, StdRng::from_entropy())
    }

    /// Creates an evolver whose entire run is reproducible from `seed`.
    pub fn seeded(
        genetic: GeneticConfig,
        population: PopulationConfig,
        seed: u64,
    ) -> Result<Evolver, ConfigError> {
        Evolver::with_rng(genetic, population, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        genetic: GeneticConfig,
        population: PopulationConfig,
        mut rng: StdRng,
    ) -> Result<Evolver, ConfigError> {
        genetic.validate()?;
        population.validate()?;

        let markings = MarkingAllocator::new(&genetic);
        let genomes = (0..population.size.get())
            .map(|_| Genome::minimal(markings.next_genome_id(), &genetic, &mut rng))
            .collect();

        Ok(Evolver {
            weight_mutator: WeightMutator::from_config(&genetic),
            add_neuron_mutator: AddNeuronMutator,
            add_connection_mutator: AddConnectionMutator::default(),
            remove_connection_mutator: RemoveConnectionMutator,
            genetic,
            population,
            markings,
            genomes,
            species: vec![],
            selector: Box::new(ElitistRouletteSelector::new()),
            generation: 0,
            champion: None,
            rng,
        })
    }

    /// Replaces the survivor-selection strategy. The default is
    /// [`ElitistRouletteSelector`].
    pub fn with_selector(mut self, selector: Box<dyn Selector>) -> Evolver {
        self.selector = selector;
        self
    }

    /// Runs a single generation.
    ///
    /// # Errors
    /// Fails if the evaluator leaves a genome unscored, if mutation or
    /// reproduction produces invalid chromosome material, or if the
    /// population is degenerate (nothing survives, or every survivor
    /// has zero fitness).
    pub fn evolve_once<E>(&mut self, evaluator: &mut E) -> Result<GenerationSummary, EvolveError>
    where
        E: FitnessEvaluator + ?Sized,
    {
        evaluator.evaluate(&mut self.genomes);
        for genome in &self.genomes {
            if genome.fitness().is_none() {
                return Err(EvolveError::Unevaluated(genome.id()));
            }
        }

        let max_fitness = evaluator.max_fitness();
        self.update_champion(max_fitness);

        speciate(
            &self.genomes,
            &mut self.species,
            self.generation,
            &self.population,
            &self.genetic,
        );

        self.selector.empty();
        self.selector
            .add(&mut self.genomes, &self.species, &self.population)?;
        let survivors = self.selector.select(&mut self.rng);

        let summary = self.summarize(max_fitness);
        log::info!(
            "generation {}: {} species, champion genome {} at fitness {:.4} (adjusted {:.4})",
            summary.generation,
            summary.species_count,
            summary.champion_id,
            summary.champion_fitness,
            summary.champion_adjusted_fitness,
        );

        self.reproduce(&survivors)?;
        self.generation += 1;
        Ok(summary)
    }

    /// Runs generations until the champion's adjusted fitness reaches
    /// `target_fitness` or `max_generations` generations have elapsed,
    /// whichever comes first. Always runs at least one generation.
    /// Returns a clone of the all-time champion, fitness included.
    ///
    /// # Errors
    /// Propagates the first generation-step failure. The population is
    /// left as of the failed step.
    pub fn run<E>(&mut self, evaluator: &mut E) -> Result<Genome, EvolveError>
    where
        E: FitnessEvaluator + ?Sized,
    {
        loop {
            let summary = self.evolve_once(evaluator)?;
            if let Some(target) = self.population.target_fitness {
                if summary.champion_adjusted_fitness >= target {
                    break;
                }
            }
            if self.generation >= self.population.max_generations {
                break;
            }
        }
        let (champion, _) = self
            .champion
            .clone()
            .expect("champion is recorded every generation");
        Ok(champion)
    }

    /// Records the all-time champion by adjusted fitness.
    fn update_champion(&mut self, max_fitness: Option<f64>) {
        let best = self
            .genomes
            .iter()
            .max_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .expect("NaN fitness")
            })
            .expect("empty population has no champion");
        let raw = best.fitness().expect("fitness verified after evaluation");
        let adjusted = adjust(raw, max_fitness);
        if self.champion.as_ref().map_or(true, |(_, held)| adjusted > *held) {
            self.champion = Some((best.clone(), adjusted));
        }
    }

    fn summarize(&self, max_fitness: Option<f64>) -> GenerationSummary {
        let best = self
            .genomes
            .iter()
            .max_by(|a, b| {
                a.fitness()
                    .partial_cmp(&b.fitness())
                    .expect("NaN fitness")
            })
            .expect("empty population has no champion");
        let raw = best.fitness().expect("fitness verified after evaluation");
        GenerationSummary {
            generation: self.generation,
            species_count: self.species.len(),
            champion_id: best.id(),
            champion_fitness: raw,
            champion_adjusted_fitness: adjust(raw, max_fitness),
            fitness: Stats::from(self.genomes.iter().filter_map(|g| g.fitness())),
        }
    }

    /// Builds the next generation: survivors carried over (fitness
    /// cleared), the rest filled with offspring allotted to species in
    /// proportion to the mean fitness of their surviving members.
    fn reproduce(&mut self, survivors: &[usize]) -> Result<(), EvolveError> {
        if survivors.is_empty() {
            return Err(EvolveError::DegeneratePopulation);
        }
        let survivor_set: HashSet<usize, RandomState> = survivors.iter().copied().collect();

        // Species parent pools, in species order.
        let parent_groups: Vec<Vec<usize>> = self
            .species
            .iter()
            .map(|s| {
                s.members()
                    .iter()
                    .copied()
                    .filter(|i| survivor_set.contains(i))
                    .collect::<Vec<usize>>()
            })
            .filter(|group| !group.is_empty())
            .collect();

        let size = self.population.size.get();
        let offspring_total = size - survivors.len().min(size);

        let group_fitness: Vec<f64> = parent_groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .filter_map(|&i| self.genomes[i].fitness())
                    .sum::<f64>()
                    / group.len() as f64
            })
            .collect();
        let fitness_total: f64 = group_fitness.iter().sum();
        if fitness_total <= 0.0 && offspring_total > 0 {
            return Err(EvolveError::DegeneratePopulation);
        }

        let allotment = round_retain_sum(
            &group_fitness
                .iter()
                .map(|f| f / fitness_total * offspring_total as f64)
                .collect::<Vec<f64>>(),
        );

        let mut next = Vec::with_capacity(size);
        for &index in survivors {
            let mut carried = self.genomes[index].clone();
            carried.clear_fitness();
            next.push(carried);
        }
        for (group, &count) in parent_groups.iter().zip(&allotment) {
            for _ in 0..count {
                let slot = self.rng.gen_range(0..group.len());
                let parent = self.genomes[group[slot]].clone();
                next.push(self.spawn_child(&parent)?);
            }
        }
        self.genomes = next;
        Ok(())
    }

    /// One offspring: weight perturbation always, each structural
    /// operator by its configured chance.
    fn spawn_child(&mut self, parent: &Genome) -> Result<Genome, EvolveError> {
        let id = self.markings.next_genome_id();

        let delta =
            self.weight_mutator
                .mutate(parent, &self.markings, &self.genetic, &mut self.rng)?;
        let mut child = parent.apply_delta(&delta, id)?;

        if self.rng.gen::<f64>() < self.genetic.add_neuron_mutation_rate {
            let delta =
                self.add_neuron_mutator
                    .mutate(&child, &self.markings, &self.genetic, &mut self.rng)?;
            child = child.apply_delta(&delta, id)?;
        }
        if self.rng.gen::<f64>() < self.genetic.add_connection_mutation_rate {
            let delta = self.add_connection_mutator.mutate(
                &child,
                &self.markings,
                &self.genetic,
                &mut self.rng,
            )?;
            child = child.apply_delta(&delta, id)?;
        }
        if self.rng.gen::<f64>() < self.genetic.remove_connection_mutation_rate {
            let delta = self.remove_connection_mutator.mutate(
                &child,
                &self.markings,
                &self.genetic,
                &mut self.rng,
            )?;
            child = child.apply_delta(&delta, id)?;
        }
        Ok(child)
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The current population.
    pub fn genomes(&self) -> impl Iterator<Item = &Genome> {
        self.genomes.iter()
    }

    /// Current species, as of the last completed generation.
    pub fn species(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    /// The all-time fittest genome, once a generation has run.
    pub fn champion(&self) -> Option<&Genome> {
        self.champion.as_ref().map(|(genome, _)| genome)
    }
}

/// Fitness normalized against the evaluator's maximum, when bounded.
fn adjust(raw: f64, max_fitness: Option<f64>) -> f64 {
    match max_fitness {
        Some(max) if max > 0.0 => raw / max,
        _ => raw,
    }
}

/// Rounds all values to whole numbers while preserving their order and
/// sum, assuming the sum is whole. Rounding is done in the manner that
/// minimizes the average error to the original set of values.
fn round_retain_sum(values: &[f64]) -> Vec<usize> {
    let total_sum = values.iter().sum::<f64>().round() as usize;
    let mut truncated: Vec<(usize, usize, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let u = f.floor();
            (i, u as usize, f - u)
        })
        .collect();
    let truncated_sum: usize = truncated.iter().map(|(_, u, _)| *u).sum();
    let remainder = (total_sum - truncated_sum).min(truncated.len());
    // Distribute the remainder in decreasing order of rounding error.
    truncated.sort_unstable_by(|a, b| b.2.partial_cmp(&a.2).expect("NaN share"));
    for (_, u, _) in &mut truncated[..remainder] {
        *u += 1;
    }
    truncated.sort_unstable_by_key(|(i, ..)| *i);
    truncated.iter().map(|(_, u, _)| *u).collect()
}
