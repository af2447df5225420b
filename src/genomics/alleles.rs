use crate::activation::ActivationKind;
use crate::Marking;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Sentinel distance between alleles with different historical markings:
/// topologically unrelated genes are maximally distant.
pub const ALLELE_DISTANCE_MAX: f64 = f64::MAX;

/// Distance between two same-marked neuron alleles whose values differ.
const NEURON_VALUE_DISTANCE: f64 = 1.0;

/// A NeuronRole indicates the function of the
/// neuron's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronRole {
    /// Stimulus-receiving neurons.
    Input,
    /// Internal neurons.
    Hidden,
    /// Response-producing neurons.
    Output,
}

/// A neuron allele: one neuron descriptor within a genome.
///
/// Input and output role and cardinality are fixed for a run; all genomes
/// in a population share the same input and output neuron markings.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NeuronAllele {
    marking: Marking,
    role: NeuronRole,
    activation: ActivationKind,
}

impl NeuronAllele {
    /// Returns a new neuron allele with the specified parameters.
    /// The marking must come from the run's [`MarkingAllocator`] (or the
    /// fixed seed layout); it is preserved through cloning.
    ///
    /// [`MarkingAllocator`]: crate::genomics::MarkingAllocator
    pub fn new(marking: Marking, role: NeuronRole, activation: ActivationKind) -> NeuronAllele {
        NeuronAllele {
            marking,
            role,
            activation,
        }
    }

    /// Returns the allele's historical marking.
    pub fn marking(&self) -> Marking {
        self.marking
    }

    /// Returns the neuron's role.
    pub fn role(&self) -> NeuronRole {
        self.role
    }

    /// Returns the neuron's activation function.
    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    /// Distance to another neuron allele: 0 if value-equal, a unit penalty
    /// if same-marked but differing, and [`ALLELE_DISTANCE_MAX`] if the
    /// markings differ.
    pub fn distance_to(&self, other: &NeuronAllele) -> f64 {
        if self.marking != other.marking {
            ALLELE_DISTANCE_MAX
        } else if self == other {
            0.0
        } else {
            NEURON_VALUE_DISTANCE
        }
    }
}

impl fmt::Display for NeuronAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}, {}]", self.marking, self.role, self.activation)
    }
}

/// A connection allele: one weighted, directed connection descriptor
/// between two neurons of a genome.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ConnectionAllele {
    marking: Marking,
    source: Marking,
    target: Marking,
    weight: f64,
    recurrent: bool,
}

impl ConnectionAllele {
    /// Returns a new non-recurrent connection allele with the specified
    /// parameters. Weight bounds are enforced by every mutator that
    /// changes the weight, not here; topology invariants (existing
    /// endpoints, role rules) are checked on genome insertion, where the
    /// endpoint roles are known.
    pub fn new(marking: Marking, source: Marking, target: Marking, weight: f64) -> ConnectionAllele {
        ConnectionAllele {
            marking,
            source,
            target,
            weight,
            recurrent: false,
        }
    }

    /// Returns a copy of this allele flagged as recurrent.
    pub fn recurrent(mut self) -> ConnectionAllele {
        self.recurrent = true;
        self
    }

    /// Returns a copy of this allele carrying `weight`, with the same
    /// historical marking: a weight change perturbs the same gene rather
    /// than minting a new one.
    pub fn with_weight(&self, weight: f64) -> ConnectionAllele {
        ConnectionAllele {
            weight,
            ..self.clone()
        }
    }

    /// Returns the allele's historical marking.
    pub fn marking(&self) -> Marking {
        self.marking
    }

    /// Returns the source neuron's marking.
    pub fn source(&self) -> Marking {
        self.source
    }

    /// Returns the target neuron's marking.
    pub fn target(&self) -> Marking {
        self.target
    }

    /// Returns the connection's weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns whether the connection is explicitly flagged recurrent.
    pub fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    /// Distance to another connection allele: the absolute weight
    /// difference when the markings match, [`ALLELE_DISTANCE_MAX`]
    /// otherwise.
    pub fn distance_to(&self, other: &ConnectionAllele) -> f64 {
        if self.marking != other.marking {
            ALLELE_DISTANCE_MAX
        } else {
            (self.weight - other.weight).abs()
        }
    }
}

impl fmt::Display for ConnectionAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}->{}, {:.3}]{}",
            self.marking,
            self.source,
            self.target,
            self.weight,
            if self.recurrent { "r" } else { "" },
        )
    }
}

/// Either kind of allele, as carried by mutation deltas.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Allele {
    Neuron(NeuronAllele),
    Connection(ConnectionAllele),
}

impl Allele {
    /// Returns the allele's historical marking.
    pub fn marking(&self) -> Marking {
        match self {
            Allele::Neuron(n) => n.marking(),
            Allele::Connection(c) => c.marking(),
        }
    }

    /// Distance between two alleles: 0 if value-equal, finite and positive
    /// if same-marked but differing in value, [`ALLELE_DISTANCE_MAX`] if
    /// the markings differ or the alleles are of different kinds.
    pub fn distance_to(&self, other: &Allele) -> f64 {
        match (self, other) {
            (Allele::Neuron(a), Allele::Neuron(b)) => a.distance_to(b),
            (Allele::Connection(a), Allele::Connection(b)) => a.distance_to(b),
            _ => ALLELE_DISTANCE_MAX,
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allele::Neuron(n) => n.fmt(f),
            Allele::Connection(c) => c.fmt(f),
        }
    }
}
