//! A NEAT-style neuroevolution core: populations of variable-topology
//! neural-network genomes, speciated by compatibility distance and evolved
//! under fitness-sharing selection and stochastic mutation.
//!
//! Genomes are sets of neuron and connection alleles, each carrying a
//! globally unique historical marking minted by a [`MarkingAllocator`].
//! A [`Transcriber`] turns a genome into an executable [`Phenotype`], and an
//! [`Activator`] runs that phenotype against input stimuli, with multi-cycle
//! settling for recurrent topologies. The [`Evolver`] drives the generational
//! loop, delegating scoring to a caller-supplied [`FitnessEvaluator`].
//!
//! [`MarkingAllocator`]: crate::genomics::MarkingAllocator
//! [`Transcriber`]: crate::networks::Transcriber
//! [`Phenotype`]: crate::networks::Phenotype
//! [`Activator`]: crate::networks::Activator
//! [`Evolver`]: crate::populations::Evolver
//! [`FitnessEvaluator`]: crate::populations::FitnessEvaluator
//!
//! # Example: evolving a XOR approximator
//! ```
//! use neuvo::genomics::{GeneticConfig, Genome};
//! use neuvo::networks::{Activator, Transcriber};
//! use neuvo::populations::{Evolver, FitnessEvaluator, PopulationConfig};
//! use std::num::NonZeroUsize;
//!
//! struct XorEvaluator {
//!     transcriber: Transcriber,
//!     cycles: NonZeroUsize,
//! }
//!
//! impl FitnessEvaluator for XorEvaluator {
//!     fn evaluate(&mut self, genomes: &mut [Genome]) {
//!         let cases = [
//!             ([0.0, 0.0], 0.0),
//!             ([0.0, 1.0], 1.0),
//!             ([1.0, 0.0], 1.0),
//!             ([1.0, 1.0], 0.0),
//!         ];
//!         for genome in genomes.iter_mut() {
//!             let phenotype = self.transcriber.transcribe(genome).expect("malformed genome");
//!             let mut activator = Activator::new(phenotype, self.cycles).expect("bad outputs");
//!             let mut error = 0.0;
//!             for (stimuli, expected) in &cases {
//!                 activator.reset();
//!                 let response = activator.next(stimuli).expect("dimension mismatch");
//!                 error += (response[0] - expected).abs();
//!             }
//!             genome.set_fitness((4.0 - error).powi(2));
//!         }
//!     }
//!
//!     fn max_fitness(&self) -> Option<f64> {
//!         Some(16.0)
//!     }
//! }
//!
//! let genetic = GeneticConfig {
//!     input_count: NonZeroUsize::new(2).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     ..GeneticConfig::default()
//! };
//! let population = PopulationConfig {
//!     max_generations: 5,
//!     ..PopulationConfig::default()
//! };
//!
//! let mut evaluator = XorEvaluator {
//!     transcriber: Transcriber::new(&genetic),
//!     cycles: genetic.recurrent_cycles,
//! };
//! let mut evolver = Evolver::seeded(genetic, population, 42).unwrap();
//! let champion = evolver.run(&mut evaluator).unwrap();
//! assert!(champion.fitness().is_some());
//! ```

pub mod activation;
pub mod genomics;
pub mod mutation;
pub mod networks;
pub mod populations;

/// Identifier type for historical markings ("innovation numbers"),
/// used to designate historically identical genetic material for the
/// purposes of genome comparison and speciation.
pub type Marking = u64;

/// Identifier type for genomes.
pub type GenomeId = u64;

pub use activation::ActivationKind;
pub use genomics::{GeneticConfig, Genome, MarkingAllocator};
pub use networks::{Activator, Phenotype, Transcriber};
pub use populations::{Evolver, FitnessEvaluator, PopulationConfig};
