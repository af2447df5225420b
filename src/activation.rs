//! The activation-function registry.
//!
//! Every neuron allele names one of the functions here; transcription
//! resolves the name into the phenotype, and the activator applies it.
//! The registry is a closed enum rather than a string-keyed map, so an
//! unresolvable function cannot exist past configuration parsing.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Slope used by the sigmoid variants, as in the original NEAT networks.
const STEEP_SIGMOID_SLOPE: f64 = 4.9;

/// An ActivationKind identifies the scalar activation function a
/// neuron applies to its input sum. All functions are pure and
/// stateless; each exposes its output bounds and a relative
/// computational cost usable for cost-aware fitness penalties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActivationKind {
    /// x
    Linear,
    /// 1 / (1 + exp(-x))
    Sigmoid,
    /// 1 / (1 + exp(-4.9x))
    SteepSigmoid,
    /// tanh(x)
    Tanh,
    /// tanh(x³)
    TanhCubic,
    /// 0 if x < 0, else 1
    Step,
    /// -1 if x < 0, else 1
    SignedStep,
    /// x clamped to [0, 1]
    ClampedLinear,
    /// x clamped to [-1, 1]
    SignedClampedLinear,
}

/// All registered activation kinds.
pub const ALL_ACTIVATION_KINDS: [ActivationKind; 9] = [
    ActivationKind::Linear,
    ActivationKind::Sigmoid,
    ActivationKind::SteepSigmoid,
    ActivationKind::Tanh,
    ActivationKind::TanhCubic,
    ActivationKind::Step,
    ActivationKind::SignedStep,
    ActivationKind::ClampedLinear,
    ActivationKind::SignedClampedLinear,
];

impl ActivationKind {
    /// Applies the activation function to `x`.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::SteepSigmoid => 1.0 / (1.0 + (-STEEP_SIGMOID_SLOPE * x).exp()),
            Self::Tanh => x.tanh(),
            Self::TanhCubic => x.powi(3).tanh(),
            Self::Step => {
                if x < 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Self::SignedStep => {
                if x < 0.0 {
                    -1.0
                } else {
                    1.0
                }
            }
            Self::ClampedLinear => x.clamp(0.0, 1.0),
            Self::SignedClampedLinear => x.clamp(-1.0, 1.0),
        }
    }

    /// Returns the lower bound of the function's output range.
    pub fn min_value(self) -> f64 {
        match self {
            Self::Linear => f64::MIN,
            Self::Sigmoid | Self::SteepSigmoid | Self::Step | Self::ClampedLinear => 0.0,
            Self::Tanh | Self::TanhCubic | Self::SignedStep | Self::SignedClampedLinear => -1.0,
        }
    }

    /// Returns the upper bound of the function's output range.
    pub fn max_value(self) -> f64 {
        match self {
            Self::Linear => f64::MAX,
            _ => 1.0,
        }
    }

    /// Relative computational cost of one application, usable by
    /// evaluators that penalize expensive topologies.
    pub fn cost(self) -> u64 {
        match self {
            Self::Linear => 42,
            Self::Sigmoid | Self::SteepSigmoid => 497,
            Self::Tanh => 385,
            Self::TanhCubic => 1231,
            Self::Step | Self::SignedStep => 40,
            Self::ClampedLinear | Self::SignedClampedLinear => 50,
        }
    }

    /// Stable identifier for the configuration/serialization boundary.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Sigmoid => "sigmoid",
            Self::SteepSigmoid => "steep-sigmoid",
            Self::Tanh => "tanh",
            Self::TanhCubic => "tanh-cubic",
            Self::Step => "step",
            Self::SignedStep => "signed-step",
            Self::ClampedLinear => "clamped-linear",
            Self::SignedClampedLinear => "signed-clamped-linear",
        }
    }

    /// Resolves a stable identifier back into a registry entry.
    pub fn from_name(name: &str) -> Option<ActivationKind> {
        ALL_ACTIVATION_KINDS.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for ActivationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
