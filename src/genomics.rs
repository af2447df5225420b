//! Genomes and their alleles.
//!
//! A [`Genome`] is an ordered-by-marking collection of [`NeuronAllele`]s and
//! [`ConnectionAllele`]s. Alleles are immutable once part of a genome;
//! mutation operators produce explicit removal/addition sets that are applied
//! to build fresh genomes, never touching the parent.

mod alleles;
mod config;
mod errors;
mod genome;
mod history;

pub use alleles::{
    Allele, ConnectionAllele, NeuronAllele, NeuronRole, ALLELE_DISTANCE_MAX,
};
pub use config::{GeneticConfig, RecurrencyPolicy};
pub use errors::{ConfigError, GenomeError};
pub use genome::Genome;
pub use history::MarkingAllocator;
