//! Mutation operators.
//!
//! Operators never modify the genome they are given. Each returns a
//! [`MutationDelta`]: the explicit sets of alleles to remove and to add,
//! which [`Genome::apply_delta`] turns into new chromosome material.
//! Weight perturbation keeps the perturbed gene's historical marking;
//! structural operators mint fresh markings for every new element.
//!
//! [`Genome::apply_delta`]: crate::genomics::Genome::apply_delta

mod structural;
mod weight;

pub use structural::{AddConnectionMutator, AddNeuronMutator, RemoveConnectionMutator};
pub use weight::WeightMutator;

use crate::genomics::{Allele, GeneticConfig, Genome, MarkingAllocator};

use rand::RngCore;
use thiserror::Error;

/// The outcome of a mutation: alleles to remove from and add to a
/// parent genome's material when building the child.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MutationDelta {
    pub removed: Vec<Allele>,
    pub added: Vec<Allele>,
}

impl MutationDelta {
    /// Whether the mutation produced no change.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// An error type indicating invalid mutation-operator arguments.
/// These are argument-validation failures, checked at the operator's
/// entry point, never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    /// The mutation rate must lie in (0, 1].
    #[error("mutation rate must lie in (0, 1] (got {0})")]
    InvalidRate(f64),
    /// The perturbation standard deviation must be positive.
    #[error("perturbation standard deviation must be positive (got {0})")]
    InvalidStdDev(f64),
}

/// A mutation operator over genomes.
pub trait Mutator {
    /// Computes a mutation of `genome` under the run's random generator.
    /// The genome itself is left untouched; new structural elements take
    /// their markings from `markings`.
    fn mutate(
        &self,
        genome: &Genome,
        markings: &MarkingAllocator,
        config: &GeneticConfig,
        rng: &mut dyn RngCore,
    ) -> Result<MutationDelta, MutationError>;
}
