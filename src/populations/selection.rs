use crate::genomics::Genome;
use crate::populations::{PopulationConfig, SelectionError, Species};

use rand::{Rng, RngCore};

/// A survivor-selection strategy.
///
/// Selectors follow an accumulate/select/empty protocol: the evolver
/// [`add`]s the generation's evaluated genomes, [`select`]s the
/// survivor set once, and [`empty`]s the selector before the next
/// generation. A `select` after `empty` returns no survivors.
///
/// [`add`]: Selector::add
/// [`select`]: Selector::select
/// [`empty`]: Selector::empty
pub trait Selector {
    /// Accumulates candidates for survival.
    ///
    /// # Errors
    /// Fails if any genome carries no fitness. Selection never scores
    /// genomes itself.
    fn add(
        &mut self,
        genomes: &mut [Genome],
        species: &[Species],
        config: &PopulationConfig,
    ) -> Result<(), SelectionError>;

    /// Picks the survivors among everything accumulated since the last
    /// [`empty`](Selector::empty), as indices into the added genome
    /// slice.
    fn select(&mut self, rng: &mut dyn RngCore) -> Vec<usize>;

    /// Discards all accumulated candidates. Idempotent.
    fn empty(&mut self);
}

/// Truncation selection: the fittest `round(survival_rate × n)` genomes
/// survive, by raw fitness, deterministically.
#[derive(Clone, Debug, Default)]
pub struct DirectSelector {
    candidates: Vec<(usize, f64)>,
    target: usize,
}

impl DirectSelector {
    pub fn new() -> DirectSelector {
        DirectSelector::default()
    }
}

impl Selector for DirectSelector {
    fn add(
        &mut self,
        genomes: &mut [Genome],
        _species: &[Species],
        config: &PopulationConfig,
    ) -> Result<(), SelectionError> {
        for (index, genome) in genomes.iter().enumerate() {
            let fitness = genome
                .fitness()
                .ok_or(SelectionError::Unevaluated(genome.id()))?;
            self.candidates.push((index, fitness));
        }
        self.target += (config.survival_rate * genomes.len() as f64).round() as usize;
        Ok(())
    }

    fn select(&mut self, _rng: &mut dyn RngCore) -> Vec<usize> {
        let mut ranked = self.candidates.clone();
        // Stable sort keeps population order among fitness ties.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).expect("NaN fitness"));
        ranked
            .into_iter()
            .take(self.target)
            .map(|(index, _)| index)
            .collect()
    }

    fn empty(&mut self) {
        self.candidates.clear();
        self.target = 0;
    }
}

/// Fitness-sharing roulette selection with per-species elites.
///
/// Each candidate's speciated fitness is its raw fitness divided by its
/// species' member count, recorded on the genome as a side effect.
/// When elitism is enabled, the fittest member of every species of at
/// least `elitism_min_species_size` members survives unconditionally.
/// The remaining survivor slots are drawn by cumulative-weight roulette
/// over speciated fitness, without replacement and with elites excluded
/// from the wheel, until `round(survival_rate × n)` genomes survive.
#[derive(Clone, Debug, Default)]
pub struct ElitistRouletteSelector {
    elites: Vec<usize>,
    candidates: Vec<(usize, f64)>,
    target: usize,
}

impl ElitistRouletteSelector {
    pub fn new() -> ElitistRouletteSelector {
        ElitistRouletteSelector::default()
    }
}

impl Selector for ElitistRouletteSelector {
    fn add(
        &mut self,
        genomes: &mut [Genome],
        species: &[Species],
        config: &PopulationConfig,
    ) -> Result<(), SelectionError> {
        for s in species {
            let size = s.len() as f64;
            for &index in s.members() {
                let raw = genomes[index]
                    .fitness()
                    .ok_or(SelectionError::Unevaluated(genomes[index].id()))?;
                genomes[index].set_speciated_fitness(raw / size);
                self.candidates.push((index, raw / size));
            }
            if config.elitism && s.len() >= config.elitism_min_species_size {
                let elite = s
                    .members()
                    .iter()
                    .copied()
                    .max_by(|&x, &y| {
                        genomes[x]
                            .fitness()
                            .partial_cmp(&genomes[y].fitness())
                            .expect("NaN fitness")
                    })
                    .expect("species has members");
                self.elites.push(elite);
            }
        }
        self.target += (config.survival_rate * genomes.len() as f64).round() as usize;
        Ok(())
    }

    fn select(&mut self, rng: &mut dyn RngCore) -> Vec<usize> {
        let mut survivors = self.elites.clone();
        let target = self.target.max(survivors.len());

        let mut wheel: Vec<(usize, f64)> = self
            .candidates
            .iter()
            .copied()
            .filter(|(index, _)| !survivors.contains(index))
            .collect();

        while survivors.len() < target && !wheel.is_empty() {
            let total: f64 = wheel.iter().map(|(_, weight)| weight).sum();
            let slot = if total > 0.0 {
                let spin = rng.gen_range(0.0..total);
                let mut cumulative = 0.0;
                let mut slot = wheel.len() - 1;
                for (i, (_, weight)) in wheel.iter().enumerate() {
                    cumulative += weight;
                    if spin < cumulative {
                        slot = i;
                        break;
                    }
                }
                slot
            } else {
                // All remaining weights are zero; fall back to the
                // first remaining candidate.
                0
            };
            survivors.push(wheel.swap_remove(slot).0);
        }
        survivors
    }

    fn empty(&mut self) {
        self.elites.clear();
        self.candidates.clear();
        self.target = 0;
    }
}
