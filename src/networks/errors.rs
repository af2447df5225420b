use crate::{GenomeId, Marking};

use thiserror::Error;

/// An error type indicating a genome that cannot be transcribed.
///
/// These are fatal: the evolver aborts rather than silently dropping
/// the offending genome, which would corrupt population-size
/// invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranscriptionError {
    /// The genome has no input neurons.
    #[error("genome {0} has no input neurons")]
    NoInputNeurons(GenomeId),
    /// The genome has no output neurons.
    #[error("genome {0} has no output neurons")]
    NoOutputNeurons(GenomeId),
    /// A connection references a marking with no corresponding neuron.
    #[error("connection {connection} references unknown neuron {endpoint}")]
    DanglingEndpoint { connection: Marking, endpoint: Marking },
    /// The genome is cyclic but the recurrency policy forbids it.
    #[error("genome {0} is cyclic but recurrency is disallowed")]
    RecurrencyDisallowed(GenomeId),
}

/// An error type for phenotype execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivationError {
    /// The stimulus vector does not match the phenotype's input
    /// dimension.
    #[error("stimulus dimension mismatch: got {got}, phenotype expects {expected}")]
    StimulusDimension { got: usize, expected: usize },
    /// Output neurons carry activation functions with differing ranges.
    #[error("output nodes mix activation ranges ([{first_min}, {first_max}] vs [{other_min}, {other_max}])")]
    MixedOutputRanges {
        first_min: f64,
        first_max: f64,
        other_min: f64,
        other_max: f64,
    },
}
