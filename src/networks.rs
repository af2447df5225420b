//! Phenotypes: executable networks transcribed from genomes.
//!
//! A [`Phenotype`] is an arena of nodes indexed by position, with
//! incoming `(source index, weight)` edge lists; node values live in a
//! flat array inside the [`Activator`], so cyclic topologies need no
//! reference cycles. The [`Transcriber`] performs the genotype →
//! phenotype conversion and decides, once, whether the topology is
//! recurrent.

mod activator;
mod errors;
mod phenotype;

pub use activator::Activator;
pub use errors::{ActivationError, TranscriptionError};
pub use phenotype::{Phenotype, Transcriber};
