use crate::Marking;

use thiserror::Error;

/// An error type indicating an invalid configuration scalar.
///
/// Configuration errors are fatal at initialization: the evolver
/// refuses to start a run on any invalid value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The named scalar must be strictly positive.
    #[error("{key} must be positive (got {value})")]
    NonPositive { key: &'static str, value: f64 },
    /// The named scalar must lie in (0, 1].
    #[error("{key} must lie in (0, 1] (got {value})")]
    OutOfUnitRange { key: &'static str, value: f64 },
    /// The named scalar must lie in [0, 1].
    #[error("{key} must lie in [0, 1] (got {value})")]
    OutOfClosedUnitRange { key: &'static str, value: f64 },
    /// The connection-weight bounds are empty or inverted.
    #[error("weight bounds are inverted ({min} is not below {max})")]
    InvertedWeightBounds { min: f64, max: f64 },
    /// An activation-function name did not resolve to a registry entry.
    #[error("unknown activation function `{0}`")]
    UnknownActivation(String),
}

/// An error type indicating invalid chromosome material.
///
/// Callers constructing genomes (reproduction, mutation) are responsible
/// for never producing one of these; they are fatal when they occur.
// `Display`/`Error` are implemented by hand because the `source` field of
// `DuplicateEndpoints` collides with thiserror's source-field inference.
#[derive(Debug, Clone, PartialEq)]
pub enum GenomeError {
    /// An allele with this marking is already present in the genome.
    DuplicateMarking(Marking),
    /// A connection references a neuron marking absent from the genome.
    UnknownEndpoint { connection: Marking, endpoint: Marking },
    /// Input neurons cannot be connection destinations.
    InputAsTarget { connection: Marking, neuron: Marking },
    /// Output neurons cannot be connection sources.
    OutputAsSource { connection: Marking, neuron: Marking },
    /// A connection with the same endpoints already exists.
    DuplicateEndpoints {
        connection: Marking,
        existing: Marking,
        source: Marking,
        target: Marking,
    },
    /// A mutation delta removed an allele the genome does not carry.
    AbsentAllele(Marking),
}

impl core::fmt::Display for GenomeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GenomeError::DuplicateMarking(marking) => {
                write!(f, "duplicate allele insertion with marking {marking}")
            }
            GenomeError::UnknownEndpoint { connection, endpoint } => {
                write!(f, "connection {connection} references nonexistent neuron {endpoint}")
            }
            GenomeError::InputAsTarget { connection, neuron } => {
                write!(f, "connection {connection} targets input neuron {neuron}")
            }
            GenomeError::OutputAsSource { connection, neuron } => {
                write!(f, "connection {connection} sources output neuron {neuron}")
            }
            GenomeError::DuplicateEndpoints { connection, existing, source, target } => {
                write!(
                    f,
                    "connection {connection} shadows connection {existing} with endpoints {source} -> {target}"
                )
            }
            GenomeError::AbsentAllele(marking) => {
                write!(f, "removal of nonexistent allele with marking {marking}")
            }
        }
    }
}

impl std::error::Error for GenomeError {}
