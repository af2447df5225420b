use crate::activation::ActivationKind;
use crate::genomics::{
    Allele, ConnectionAllele, GeneticConfig, GenomeError, NeuronAllele, NeuronRole,
};
use crate::mutation::MutationDelta;
use crate::{GenomeId, Marking};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;

/// A genome: the chromosome material of one individual.
///
/// Alleles are kept ordered by historical marking and unique by marking.
/// Fitness starts unset and is assigned by the fitness evaluator; the
/// speciated fitness is derived from it during selection.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Genome {
    id: GenomeId,
    neurons: BTreeMap<Marking, NeuronAllele>,
    connections: BTreeMap<Marking, ConnectionAllele>,
    fitness: Option<f64>,
    speciated_fitness: Option<f64>,
}

impl Genome {
    /// Returns a new, empty genome with the given identifier.
    pub fn new(id: GenomeId) -> Genome {
        Genome {
            id,
            neurons: BTreeMap::new(),
            connections: BTreeMap::new(),
            fitness: None,
            speciated_fitness: None,
        }
    }

    /// Returns the classic fully-connected seed genome: one input neuron
    /// per stimulus component, one output neuron per response component,
    /// and a connection from every input to every output with a uniform
    /// random weight within the configured bounds.
    ///
    /// The marking layout is fixed: neuron markings `0..inputs+outputs`
    /// (inputs first), connection markings following in input-major order.
    /// Every genome in a population therefore shares the same markings
    /// for the same structural elements; [`MarkingAllocator::new`] starts
    /// minting after this layout.
    ///
    /// [`MarkingAllocator::new`]: crate::genomics::MarkingAllocator::new
    pub fn minimal<R: Rng + ?Sized>(id: GenomeId, config: &GeneticConfig, rng: &mut R) -> Genome {
        let inputs = config.input_count.get();
        let outputs = config.output_count.get();

        let mut neurons = BTreeMap::new();
        for i in 0..inputs {
            let marking = i as Marking;
            neurons.insert(
                marking,
                NeuronAllele::new(marking, NeuronRole::Input, ActivationKind::Linear),
            );
        }
        for o in 0..outputs {
            let marking = (inputs + o) as Marking;
            neurons.insert(
                marking,
                NeuronAllele::new(marking, NeuronRole::Output, config.output_activation),
            );
        }

        let base = (inputs + outputs) as Marking;
        let mut connections = BTreeMap::new();
        for i in 0..inputs {
            for o in 0..outputs {
                let marking = base + (i * outputs + o) as Marking;
                let weight = rng.gen_range(config.weight_min..=config.weight_max);
                connections.insert(
                    marking,
                    ConnectionAllele::new(marking, i as Marking, (inputs + o) as Marking, weight),
                );
            }
        }

        Genome {
            id,
            neurons,
            connections,
            fitness: None,
            speciated_fitness: None,
        }
    }

    /// Adds a neuron allele to the genome.
    ///
    /// # Errors
    /// Fails if an allele with the same marking is already present.
    pub fn insert_neuron(&mut self, allele: NeuronAllele) -> Result<(), GenomeError> {
        let marking = allele.marking();
        if self.neurons.contains_key(&marking) || self.connections.contains_key(&marking) {
            return Err(GenomeError::DuplicateMarking(marking));
        }
        self.neurons.insert(marking, allele);
        Ok(())
    }

    /// Adds a connection allele to the genome.
    ///
    /// # Errors
    /// Fails if the marking is a duplicate, either endpoint neuron does
    /// not exist, the target is an input neuron, the source is an output
    /// neuron, or a connection with the same endpoints already exists.
    pub fn insert_connection(&mut self, allele: ConnectionAllele) -> Result<(), GenomeError> {
        let marking = allele.marking();
        if self.neurons.contains_key(&marking) || self.connections.contains_key(&marking) {
            return Err(GenomeError::DuplicateMarking(marking));
        }
        let source = self
            .neurons
            .get(&allele.source())
            .ok_or(GenomeError::UnknownEndpoint {
                connection: marking,
                endpoint: allele.source(),
            })?;
        let target = self
            .neurons
            .get(&allele.target())
            .ok_or(GenomeError::UnknownEndpoint {
                connection: marking,
                endpoint: allele.target(),
            })?;
        if source.role() == NeuronRole::Output {
            return Err(GenomeError::OutputAsSource {
                connection: marking,
                neuron: allele.source(),
            });
        }
        if target.role() == NeuronRole::Input {
            return Err(GenomeError::InputAsTarget {
                connection: marking,
                neuron: allele.target(),
            });
        }
        if let Some(existing) = self.connection_between(allele.source(), allele.target()) {
            return Err(GenomeError::DuplicateEndpoints {
                connection: marking,
                existing,
                source: allele.source(),
                target: allele.target(),
            });
        }
        self.connections.insert(marking, allele);
        Ok(())
    }

    /// Removes the allele with the given marking.
    ///
    /// # Errors
    /// Fails if no allele carries the marking.
    pub fn remove_allele(&mut self, marking: Marking) -> Result<Allele, GenomeError> {
        if let Some(neuron) = self.neurons.remove(&marking) {
            return Ok(Allele::Neuron(neuron));
        }
        if let Some(connection) = self.connections.remove(&marking) {
            return Ok(Allele::Connection(connection));
        }
        Err(GenomeError::AbsentAllele(marking))
    }

    /// Builds a child genome from this one and a mutation delta: the
    /// delta's removals are taken out and its additions inserted, under
    /// the same validation as direct insertion. The parent is untouched
    /// and the child's fitness starts unset.
    pub fn apply_delta(
        &self,
        delta: &MutationDelta,
        child_id: GenomeId,
    ) -> Result<Genome, GenomeError> {
        let mut child = self.clone_as(child_id);
        for removed in &delta.removed {
            child.remove_allele(removed.marking())?;
        }
        // Neurons first, so connections referencing them validate.
        for added in &delta.added {
            if let Allele::Neuron(neuron) = added {
                child.insert_neuron(neuron.clone())?;
            }
        }
        for added in &delta.added {
            if let Allele::Connection(connection) = added {
                child.insert_connection(connection.clone())?;
            }
        }
        Ok(child)
    }

    /// Returns a copy of this genome's chromosome material under a new
    /// identifier, with fitness unset.
    pub fn clone_as(&self, id: GenomeId) -> Genome {
        Genome {
            id,
            neurons: self.neurons.clone(),
            connections: self.connections.clone(),
            fitness: None,
            speciated_fitness: None,
        }
    }

    /// Returns the genome's identifier.
    pub fn id(&self) -> GenomeId {
        self.id
    }

    /// Returns the genome's fitness, or `None` if it has not been
    /// evaluated.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Sets the genome's fitness value. Should be ≥ 0.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Returns the species-size-adjusted fitness, set during selection.
    pub fn speciated_fitness(&self) -> Option<f64> {
        self.speciated_fitness
    }

    pub(crate) fn set_speciated_fitness(&mut self, fitness: f64) {
        self.speciated_fitness = Some(fitness);
    }

    pub(crate) fn clear_fitness(&mut self) {
        self.fitness = None;
        self.speciated_fitness = None;
    }

    /// Returns an iterator over the genome's neuron alleles, ordered by
    /// marking.
    pub fn neurons(&self) -> impl Iterator<Item = &NeuronAllele> {
        self.neurons.values()
    }

    /// Returns an iterator over the genome's connection alleles, ordered
    /// by marking.
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionAllele> {
        self.connections.values()
    }

    /// Looks up a neuron allele by marking.
    pub fn neuron(&self, marking: Marking) -> Option<&NeuronAllele> {
        self.neurons.get(&marking)
    }

    /// Looks up a connection allele by marking.
    pub fn connection(&self, marking: Marking) -> Option<&ConnectionAllele> {
        self.connections.get(&marking)
    }

    /// Returns the marking of the connection between the given endpoints,
    /// if one exists.
    pub fn connection_between(&self, source: Marking, target: Marking) -> Option<Marking> {
        self.connections
            .values()
            .find(|c| c.source() == source && c.target() == target)
            .map(|c| c.marking())
    }

    /// Number of neuron alleles.
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of connection alleles.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Highest connection-allele marking, if any connections exist.
    pub fn max_connection_marking(&self) -> Option<Marking> {
        self.connections.keys().next_back().copied()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome {}[", self.id)?;
        for neuron in self.neurons.values() {
            write!(f, "{} ", neuron)?;
        }
        write!(f, "| ")?;
        for connection in self.connections.values() {
            write!(f, "{} ", connection)?;
        }
        write!(f, "]")
    }
}
