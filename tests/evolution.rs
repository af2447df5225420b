//! End-to-end runs through the public API: genome construction,
//! transcription, activation, and full evolution loops.

use neuvo::activation::ActivationKind;
use neuvo::genomics::{
    ConnectionAllele, GeneticConfig, Genome, MarkingAllocator, NeuronAllele, NeuronRole,
};
use neuvo::networks::{Activator, Transcriber};
use neuvo::populations::{
    compatibility_distance, Evolver, FitnessEvaluator, PopulationConfig,
};

use rand::rngs::StdRng;
use rand::SeedableRng;

use std::num::NonZeroUsize;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct XorEvaluator {
    transcriber: Transcriber,
    cycles: NonZeroUsize,
}

impl XorEvaluator {
    fn new(config: &GeneticConfig) -> XorEvaluator {
        XorEvaluator {
            transcriber: Transcriber::new(config),
            cycles: config.recurrent_cycles,
        }
    }
}

impl FitnessEvaluator for XorEvaluator {
    fn evaluate(&mut self, genomes: &mut [Genome]) {
        let cases = [
            ([0.0, 0.0], 0.0),
            ([0.0, 1.0], 1.0),
            ([1.0, 0.0], 1.0),
            ([1.0, 1.0], 0.0),
        ];
        for genome in genomes.iter_mut() {
            let phenotype = self.transcriber.transcribe(genome).expect("malformed genome");
            let mut activator = Activator::new(phenotype, self.cycles).expect("bad outputs");
            let mut error = 0.0;
            for (stimuli, expected) in &cases {
                activator.reset();
                let response = activator.next(stimuli).expect("dimension mismatch");
                error += (response[0] - expected).abs();
            }
            genome.set_fitness((4.0 - error).powi(2));
        }
    }

    fn max_fitness(&self) -> Option<f64> {
        Some(16.0)
    }
}

fn xor_configs() -> (GeneticConfig, PopulationConfig) {
    // The default steep-sigmoid output keeps every response strictly
    // inside (0, 1), so no genome ever scores exactly zero.
    let genetic = GeneticConfig {
        input_count: NonZeroUsize::new(2).unwrap(),
        output_count: NonZeroUsize::new(1).unwrap(),
        ..GeneticConfig::default()
    };
    let population = PopulationConfig {
        size: NonZeroUsize::new(50).unwrap(),
        max_generations: 10,
        ..PopulationConfig::default()
    };
    (genetic, population)
}

#[test]
fn weighted_sum_network_end_to_end() {
    // Three linear inputs into one signed-clamped output, weights
    // 1.0, -1.0 and 0.0.
    let mut genome = Genome::new(0);
    for marking in 0..3 {
        genome
            .insert_neuron(NeuronAllele::new(
                marking,
                NeuronRole::Input,
                ActivationKind::Linear,
            ))
            .unwrap();
    }
    genome
        .insert_neuron(NeuronAllele::new(
            3,
            NeuronRole::Output,
            ActivationKind::SignedClampedLinear,
        ))
        .unwrap();
    genome
        .insert_connection(ConnectionAllele::new(4, 0, 3, 1.0))
        .unwrap();
    genome
        .insert_connection(ConnectionAllele::new(5, 1, 3, -1.0))
        .unwrap();
    genome
        .insert_connection(ConnectionAllele::new(6, 2, 3, 0.0))
        .unwrap();

    let config = GeneticConfig::default();
    let phenotype = Transcriber::new(&config).transcribe(&genome).unwrap();
    let mut activator = Activator::new(phenotype, config.recurrent_cycles).unwrap();

    assert_eq!(activator.next(&[1.0, 1.0, 1.0]).unwrap(), vec![0.0]);
    assert_eq!(activator.next(&[1.0, 0.0, 1.0]).unwrap(), vec![1.0]);
}

#[test]
fn xor_evolution_runs_to_completion() {
    init_logging();
    let (genetic, population) = xor_configs();
    let size = population.size.get();
    let max_generations = population.max_generations;

    let mut evaluator = XorEvaluator::new(&genetic);
    let mut evolver = Evolver::seeded(genetic, population, 42).unwrap();
    let champion = evolver.run(&mut evaluator).unwrap();

    assert_eq!(evolver.generation(), max_generations);
    assert_eq!(evolver.genomes().count(), size);
    assert!(champion.fitness().expect("champion carries fitness") > 0.0);
}

#[test]
fn target_fitness_short_circuits_the_run() {
    init_logging();
    let (genetic, mut population) = xor_configs();
    // Any positive score ends the run immediately.
    population.target_fitness = Some(1e-9);
    population.max_generations = 50;

    let mut evaluator = XorEvaluator::new(&genetic);
    let mut evolver = Evolver::seeded(genetic, population, 7).unwrap();
    evolver.run(&mut evaluator).unwrap();
    assert_eq!(evolver.generation(), 1);
}

#[test]
fn minimal_genomes_share_their_markings() {
    let config = GeneticConfig {
        input_count: NonZeroUsize::new(3).unwrap(),
        output_count: NonZeroUsize::new(2).unwrap(),
        ..GeneticConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let a = Genome::minimal(0, &config, &mut rng);
    let b = Genome::minimal(1, &config, &mut rng);

    let markings = |g: &Genome| {
        let mut m: Vec<u64> = g
            .neurons()
            .map(|n| n.marking())
            .chain(g.connections().map(|c| c.marking()))
            .collect();
        m.sort_unstable();
        m
    };
    assert_eq!(markings(&a), markings(&b));

    // The allocator starts past the seed layout, so mutations can
    // never collide with it.
    let allocator = MarkingAllocator::new(&config);
    let fresh = allocator.next_marking();
    assert!(markings(&a).iter().all(|&m| m < fresh));
}

#[test]
fn identical_seed_genomes_are_compatible() {
    let config = GeneticConfig::default();
    let mut rng = StdRng::seed_from_u64(5);
    let a = Genome::minimal(0, &config, &mut rng);
    let b = a.clone_as(1);

    assert_eq!(compatibility_distance(&a, &b, &config), 0.0);
    assert_eq!(
        compatibility_distance(&a, &b, &config),
        compatibility_distance(&b, &a, &config),
    );
}

#[test]
fn configurations_round_trip_through_serde() {
    let (genetic, population) = xor_configs();

    let json = serde_json::to_string(&genetic).unwrap();
    let restored: GeneticConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.input_count, genetic.input_count);
    assert_eq!(restored.output_activation, genetic.output_activation);
    assert_eq!(restored.weight_mutation_rate, genetic.weight_mutation_rate);

    let json = serde_json::to_string(&population).unwrap();
    let restored: PopulationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.size, population.size);
    assert_eq!(restored.survival_rate, population.survival_rate);
}
