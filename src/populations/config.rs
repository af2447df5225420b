use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation and evolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of genomes in the population, held constant across
    /// generations.
    pub size: NonZeroUsize,
    /// Compatibility distance beyond which genomes are considered as
    /// belonging to different species.
    pub speciation_threshold: f64,
    /// Fraction of the population carried into the next generation as
    /// parents, in (0, 1]. The survivor count is
    /// `round(survival_rate × size)`.
    pub survival_rate: f64,
    /// Whether the fittest member of each sufficiently large species
    /// survives unconditionally.
    pub elitism: bool,
    /// Minimum species member count for elitism to apply.
    pub elitism_min_species_size: usize,
    /// Generation count after which [`Evolver::run`] stops regardless
    /// of fitness.
    ///
    /// [`Evolver::run`]: crate::populations::Evolver::run
    pub max_generations: usize,
    /// Adjusted champion fitness at which [`Evolver::run`] stops early,
    /// if set.
    ///
    /// [`Evolver::run`]: crate::populations::Evolver::run
    pub target_fitness: Option<f64>,
}

impl Default for PopulationConfig {
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(150).unwrap(),
            speciation_threshold: 3.0,
            survival_rate: 0.2,
            elitism: true,
            elitism_min_species_size: 5,
            max_generations: 100,
            target_fitness: None,
        }
    }
}

impl PopulationConfig {
    /// Checks every scalar against its documented range.
    /// Called by the evolver before any generation executes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speciation_threshold > 0.0) {
            return Err(ConfigError::NonPositive {
                key: "speciation_threshold",
                value: self.speciation_threshold,
            });
        }
        if !(self.survival_rate > 0.0 && self.survival_rate <= 1.0) {
            return Err(ConfigError::OutOfUnitRange {
                key: "survival_rate",
                value: self.survival_rate,
            });
        }
        if let Some(target) = self.target_fitness {
            if !(target > 0.0) {
                return Err(ConfigError::NonPositive {
                    key: "target_fitness",
                    value: target,
                });
            }
        }
        Ok(())
    }
}
