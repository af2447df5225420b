//! Populations: speciation, selection and the generational loop.
//!
//! A population is a flat vector of genomes partitioned into [`Species`]
//! by compatibility distance to per-species representatives. Each
//! generation the [`Evolver`] scores every genome through a
//! caller-supplied [`FitnessEvaluator`], re-speciates, picks survivors
//! through a [`Selector`], and refills the population with mutated
//! offspring allotted to species in proportion to their mean fitness.

mod config;
mod errors;
mod evolver;
mod log;
mod selection;
mod speciation;
mod species;

pub use config::PopulationConfig;
pub use errors::{EvolveError, SelectionError};
pub use evolver::{Evolver, FitnessEvaluator};
pub use log::{GenerationSummary, Stats};
pub use selection::{DirectSelector, ElitistRouletteSelector, Selector};
pub use speciation::compatibility_distance;
pub use species::{Species, SpeciesId};
