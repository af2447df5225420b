use crate::activation::ActivationKind;
use crate::genomics::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Governs whether the transcriber may treat connections as recurrent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrencyPolicy {
    /// Cyclic genomes are a transcription error.
    Disallowed,
    /// Connections closing a cycle under topological order are treated
    /// as recurrent, regardless of their explicit flag.
    BestGuess,
    /// Only connections explicitly flagged recurrent are treated as such.
    Lazy,
}

/// Configuration data for genome generation, mutation, genetic
/// distance and transcription.
///
/// # Note
/// All quantities expressing probabilities should be in the range
/// [0.0, 1.0]; [`validate`] rejects values that are not.
///
/// [`validate`]: GeneticConfig::validate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneticConfig {
    /// Number of input neurons in a genome (stimulus dimension).
    pub input_count: NonZeroUsize,
    /// Number of output neurons in a genome (response dimension).
    pub output_count: NonZeroUsize,
    /// Activation function assigned to hidden neurons created by
    /// structural mutation.
    pub hidden_activation: ActivationKind,
    /// Activation function of output neurons. A single kind for all
    /// outputs, as the activator requires a shared output range.
    pub output_activation: ActivationKind,
    /// Lower bound on connection weights.
    pub weight_min: f64,
    /// Upper bound on connection weights.
    pub weight_max: f64,
    /// Fraction of a genome's connections perturbed by one weight
    /// mutation, in (0, 1].
    pub weight_mutation_rate: f64,
    /// Standard deviation of the gaussian weight perturbation.
    pub weight_mutation_std_dev: f64,
    /// Chance that a child undergoes a neuron-addition mutation.
    pub add_neuron_mutation_rate: f64,
    /// Chance that a child undergoes a connection-addition mutation.
    pub add_connection_mutation_rate: f64,
    /// Chance that a child undergoes a connection-removal mutation.
    pub remove_connection_mutation_rate: f64,
    /// Weight of excess genes in the compatibility distance.
    pub excess_coefficient: f64,
    /// Weight of disjoint genes in the compatibility distance.
    pub disjoint_coefficient: f64,
    /// Weight of the mean common-gene weight difference in the
    /// compatibility distance.
    pub common_weight_coefficient: f64,
    /// Number of activation steps a recurrent phenotype settles for.
    pub recurrent_cycles: NonZeroUsize,
    /// How the transcriber treats cyclic topologies.
    pub recurrency_policy: RecurrencyPolicy,
}

impl Default for GeneticConfig {
    fn default() -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(1).unwrap(),
            output_count: NonZeroUsize::new(1).unwrap(),
            hidden_activation: ActivationKind::SteepSigmoid,
            output_activation: ActivationKind::SteepSigmoid,
            weight_min: -5.0,
            weight_max: 5.0,
            weight_mutation_rate: 0.75,
            weight_mutation_std_dev: 1.5,
            add_neuron_mutation_rate: 0.03,
            add_connection_mutation_rate: 0.05,
            remove_connection_mutation_rate: 0.01,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            common_weight_coefficient: 0.4,
            recurrent_cycles: NonZeroUsize::new(1).unwrap(),
            recurrency_policy: RecurrencyPolicy::BestGuess,
        }
    }
}

impl GeneticConfig {
    /// Checks every scalar against its documented range.
    /// Called by the evolver before any generation executes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weight_min >= self.weight_max {
            return Err(ConfigError::InvertedWeightBounds {
                min: self.weight_min,
                max: self.weight_max,
            });
        }
        check_unit_open("weight_mutation_rate", self.weight_mutation_rate)?;
        check_positive("weight_mutation_std_dev", self.weight_mutation_std_dev)?;
        check_unit_closed("add_neuron_mutation_rate", self.add_neuron_mutation_rate)?;
        check_unit_closed(
            "add_connection_mutation_rate",
            self.add_connection_mutation_rate,
        )?;
        check_unit_closed(
            "remove_connection_mutation_rate",
            self.remove_connection_mutation_rate,
        )?;
        check_non_negative("excess_coefficient", self.excess_coefficient)?;
        check_non_negative("disjoint_coefficient", self.disjoint_coefficient)?;
        check_non_negative("common_weight_coefficient", self.common_weight_coefficient)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn for_test(inputs: usize, outputs: usize) -> GeneticConfig {
        GeneticConfig {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            ..GeneticConfig::default()
        }
    }
}

fn check_positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { key, value })
    }
}

fn check_non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { key, value })
    }
}

fn check_unit_open(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { key, value })
    }
}

fn check_unit_closed(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfClosedUnitRange { key, value })
    }
}
