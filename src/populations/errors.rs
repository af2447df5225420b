use crate::genomics::GenomeError;
use crate::mutation::MutationError;
use crate::GenomeId;

use thiserror::Error;

/// An error type for survivor selection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// A genome reached the selector without an assigned fitness.
    /// Selection never scores genomes itself; this is a caller error.
    #[error("genome {0} reached selection without a fitness")]
    Unevaluated(GenomeId),
}

/// An error type aborting a generation step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolveError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Genome(#[from] GenomeError),
    /// The evaluator left a genome without a fitness.
    #[error("evaluator did not assign a fitness to genome {0}")]
    Unevaluated(GenomeId),
    /// No genetic material can reproduce: every surviving genome has
    /// zero fitness, or nothing survived selection.
    #[error("attempted evolution on degenerate population")]
    DegeneratePopulation,
}
