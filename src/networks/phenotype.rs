use crate::activation::ActivationKind;
use crate::genomics::{GeneticConfig, Genome, NeuronRole, RecurrencyPolicy};
use crate::networks::TranscriptionError;
use crate::Marking;

use ahash::RandomState;

use std::collections::{HashMap, VecDeque};

/// One incoming weighted edge of a phenotype node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Edge {
    pub(crate) source: usize,
    pub(crate) weight: f64,
}

/// One node of a phenotype's arena.
#[derive(Clone, Debug)]
pub(crate) struct PhenotypeNode {
    pub(crate) activation: ActivationKind,
    pub(crate) incoming: Vec<Edge>,
}

/// An executable network transcribed from a genome.
///
/// Nodes are laid out inputs first, then outputs, then hidden neurons,
/// each kept in marking order; values are stored externally by the
/// [`Activator`], so a phenotype is immutable once transcribed.
///
/// [`Activator`]: crate::networks::Activator
#[derive(Clone, Debug)]
pub struct Phenotype {
    pub(crate) nodes: Vec<PhenotypeNode>,
    pub(crate) input_count: usize,
    pub(crate) output_count: usize,
    /// Non-input node evaluation order; topological when the graph is
    /// acyclic.
    pub(crate) order: Vec<usize>,
    pub(crate) recurrent: bool,
}

impl Phenotype {
    /// Number of input nodes (stimulus dimension).
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Number of output nodes (response dimension).
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether activation requires multi-cycle settling.
    pub fn is_recurrent(&self) -> bool {
        self.recurrent
    }

    /// Summed relative cost of one full activation pass, usable for
    /// computational-cost-aware fitness penalties.
    pub fn activation_cost(&self) -> u64 {
        self.nodes[self.input_count..]
            .iter()
            .map(|n| n.activation.cost())
            .sum()
    }
}

/// Converts genomes into phenotypes.
///
/// Transcription is deterministic given the genome: the same genome
/// always produces the same phenotype, node for node.
#[derive(Clone, Debug)]
pub struct Transcriber {
    policy: RecurrencyPolicy,
}

impl Transcriber {
    pub fn new(config: &GeneticConfig) -> Transcriber {
        Transcriber {
            policy: config.recurrency_policy,
        }
    }

    /// Transcribes `genome` into an executable phenotype.
    ///
    /// Creates one node per neuron allele and one weighted edge per
    /// connection allele, and computes once whether the topology is
    /// recurrent; that flag drives the activator's execution mode.
    ///
    /// # Errors
    /// Fails on malformed genomes: a connection referencing a marking
    /// with no neuron, zero input or zero output neurons, or a cyclic
    /// topology under [`RecurrencyPolicy::Disallowed`].
    pub fn transcribe(&self, genome: &Genome) -> Result<Phenotype, TranscriptionError> {
        let mut index: HashMap<Marking, usize, RandomState> = HashMap::default();
        let mut nodes = Vec::with_capacity(genome.neuron_count());
        for role in [NeuronRole::Input, NeuronRole::Output, NeuronRole::Hidden] {
            for neuron in genome.neurons().filter(|n| n.role() == role) {
                index.insert(neuron.marking(), nodes.len());
                nodes.push(PhenotypeNode {
                    activation: neuron.activation(),
                    incoming: vec![],
                });
            }
        }

        let input_count = genome
            .neurons()
            .filter(|n| n.role() == NeuronRole::Input)
            .count();
        let output_count = genome
            .neurons()
            .filter(|n| n.role() == NeuronRole::Output)
            .count();
        if input_count == 0 {
            return Err(TranscriptionError::NoInputNeurons(genome.id()));
        }
        if output_count == 0 {
            return Err(TranscriptionError::NoOutputNeurons(genome.id()));
        }

        for connection in genome.connections() {
            let source = *index.get(&connection.source()).ok_or(
                TranscriptionError::DanglingEndpoint {
                    connection: connection.marking(),
                    endpoint: connection.source(),
                },
            )?;
            let target = *index.get(&connection.target()).ok_or(
                TranscriptionError::DanglingEndpoint {
                    connection: connection.marking(),
                    endpoint: connection.target(),
                },
            )?;
            nodes[target].incoming.push(Edge {
                source,
                weight: connection.weight(),
            });
        }

        let topological = topological_order(&nodes);
        let cyclic = topological.is_none();
        if cyclic && self.policy == RecurrencyPolicy::Disallowed {
            return Err(TranscriptionError::RecurrencyDisallowed(genome.id()));
        }

        // A phenotype settles over multiple cycles when the graph is
        // cyclic or any connection is explicitly flagged recurrent.
        let recurrent = cyclic || genome.connections().any(|c| c.is_recurrent());

        let order: Vec<usize> = match topological {
            Some(sorted) => sorted.into_iter().filter(|&i| i >= input_count).collect(),
            None => (input_count..nodes.len()).collect(),
        };

        Ok(Phenotype {
            nodes,
            input_count,
            output_count,
            order,
            recurrent,
        })
    }
}

/// Kahn's algorithm: `Some(order)` over all nodes when the edge set is
/// acyclic, `None` otherwise.
fn topological_order(nodes: &[PhenotypeNode]) -> Option<Vec<usize>> {
    let mut indegree = vec![0usize; nodes.len()];
    let mut outgoing = vec![Vec::new(); nodes.len()];
    for (target, node) in nodes.iter().enumerate() {
        indegree[target] = node.incoming.len();
        for edge in &node.incoming {
            outgoing[edge.source].push(target);
        }
    }

    let mut ready: VecDeque<usize> = (0..nodes.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(nodes.len());
    while let Some(current) = ready.pop_front() {
        order.push(current);
        for &next in &outgoing[current] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push_back(next);
            }
        }
    }

    (order.len() == nodes.len()).then_some(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{ConnectionAllele, NeuronAllele};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn transcriber(policy: RecurrencyPolicy) -> Transcriber {
        Transcriber::new(&GeneticConfig {
            recurrency_policy: policy,
            ..GeneticConfig::default()
        })
    }

    fn chain_genome() -> Genome {
        // in(0) -> hidden(2) -> out(1)
        let mut genome = Genome::new(0);
        genome
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(1, NeuronRole::Output, ActivationKind::Tanh))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(2, NeuronRole::Hidden, ActivationKind::Tanh))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(3, 0, 2, 0.5))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(4, 2, 1, -0.5))
            .unwrap();
        genome
    }

    #[test]
    fn transcription_is_deterministic() {
        let config = GeneticConfig::for_test(3, 2);
        let mut rng = StdRng::seed_from_u64(99);
        let genome = Genome::minimal(0, &config, &mut rng);
        let transcriber = Transcriber::new(&config);

        let a = transcriber.transcribe(&genome).unwrap();
        let b = transcriber.transcribe(&genome).unwrap();
        assert_eq!(a.order, b.order);
        assert_eq!(a.node_count(), b.node_count());
        for (na, nb) in a.nodes.iter().zip(&b.nodes) {
            assert_eq!(na.incoming, nb.incoming);
        }
    }

    #[test]
    fn acyclic_genomes_get_a_topological_order() {
        let phenotype = transcriber(RecurrencyPolicy::BestGuess)
            .transcribe(&chain_genome())
            .unwrap();
        assert!(!phenotype.is_recurrent());
        // Hidden node (index 2) must be evaluated before the output (index 1).
        let hidden_pos = phenotype.order.iter().position(|&i| i == 2).unwrap();
        let output_pos = phenotype.order.iter().position(|&i| i == 1).unwrap();
        assert!(hidden_pos < output_pos);
    }

    #[test]
    fn cycles_set_the_recurrent_flag() {
        let mut genome = chain_genome();
        // 2 -> 5 and 5 -> 2 close a cycle through a second hidden node.
        genome
            .insert_neuron(NeuronAllele::new(5, NeuronRole::Hidden, ActivationKind::Tanh))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(6, 2, 5, 1.0))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(7, 5, 2, 1.0))
            .unwrap();

        let phenotype = transcriber(RecurrencyPolicy::BestGuess)
            .transcribe(&genome)
            .unwrap();
        assert!(phenotype.is_recurrent());

        assert_eq!(
            transcriber(RecurrencyPolicy::Disallowed)
                .transcribe(&genome)
                .unwrap_err(),
            TranscriptionError::RecurrencyDisallowed(0)
        );
    }

    #[test]
    fn missing_inputs_or_outputs_are_fatal() {
        let mut no_inputs = Genome::new(7);
        no_inputs
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Output, ActivationKind::Tanh))
            .unwrap();
        assert_eq!(
            transcriber(RecurrencyPolicy::BestGuess)
                .transcribe(&no_inputs)
                .unwrap_err(),
            TranscriptionError::NoInputNeurons(7)
        );

        let mut no_outputs = Genome::new(8);
        no_outputs
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        assert_eq!(
            transcriber(RecurrencyPolicy::BestGuess)
                .transcribe(&no_outputs)
                .unwrap_err(),
            TranscriptionError::NoOutputNeurons(8)
        );
    }
}
