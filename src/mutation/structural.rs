use crate::genomics::{
    Allele, ConnectionAllele, GeneticConfig, Genome, MarkingAllocator, NeuronAllele, NeuronRole,
    RecurrencyPolicy,
};
use crate::mutation::{MutationDelta, MutationError, Mutator};
use crate::Marking;

use ahash::RandomState;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use std::collections::{HashMap, HashSet, VecDeque};

/// Adds one new connection between a random viable neuron pair.
///
/// Source candidates exclude output neurons and target candidates
/// exclude input neurons; pairs already connected are skipped. The new
/// allele receives a fresh historical marking and a uniform random
/// weight within the configured bounds. After `max_attempts` failed
/// pair draws the operator gives up and returns an empty delta.
#[derive(Clone, Debug)]
pub struct AddConnectionMutator {
    max_attempts: usize,
}

impl Default for AddConnectionMutator {
    fn default() -> AddConnectionMutator {
        AddConnectionMutator { max_attempts: 20 }
    }
}

impl AddConnectionMutator {
    pub fn new(max_attempts: usize) -> AddConnectionMutator {
        AddConnectionMutator { max_attempts }
    }
}

impl Mutator for AddConnectionMutator {
    fn mutate(
        &self,
        genome: &Genome,
        markings: &MarkingAllocator,
        config: &GeneticConfig,
        rng: &mut dyn RngCore,
    ) -> Result<MutationDelta, MutationError> {
        let sources: Vec<Marking> = genome
            .neurons()
            .filter(|n| n.role() != NeuronRole::Output)
            .map(|n| n.marking())
            .collect();
        let targets: Vec<Marking> = genome
            .neurons()
            .filter(|n| n.role() != NeuronRole::Input)
            .map(|n| n.marking())
            .collect();
        if sources.is_empty() || targets.is_empty() {
            return Ok(MutationDelta::default());
        }

        for _ in 0..self.max_attempts {
            let source = *sources.choose(rng).expect("sources are non-empty");
            let target = *targets.choose(rng).expect("targets are non-empty");
            if genome.connection_between(source, target).is_some() {
                continue;
            }

            let closes_cycle = source == target || path_exists(genome, target, source);
            let recurrent = match config.recurrency_policy {
                RecurrencyPolicy::Disallowed => {
                    if closes_cycle {
                        continue;
                    }
                    false
                }
                RecurrencyPolicy::BestGuess => closes_cycle,
                RecurrencyPolicy::Lazy => false,
            };

            let weight = rng.gen_range(config.weight_min..=config.weight_max);
            let mut allele =
                ConnectionAllele::new(markings.next_marking(), source, target, weight);
            if recurrent {
                allele = allele.recurrent();
            }
            return Ok(MutationDelta {
                removed: vec![],
                added: vec![Allele::Connection(allele)],
            });
        }
        Ok(MutationDelta::default())
    }
}

/// Splits one random connection with a new hidden neuron.
///
/// The split connection is removed and replaced by the new neuron plus
/// two connections: source → neuron with weight 1.0, and neuron → target
/// carrying the old weight (and recurrence flag). All three new elements
/// mint fresh historical markings.
#[derive(Clone, Debug, Default)]
pub struct AddNeuronMutator;

impl Mutator for AddNeuronMutator {
    fn mutate(
        &self,
        genome: &Genome,
        markings: &MarkingAllocator,
        config: &GeneticConfig,
        rng: &mut dyn RngCore,
    ) -> Result<MutationDelta, MutationError> {
        let connections: Vec<&ConnectionAllele> = genome.connections().collect();
        let Some(split) = connections.choose(rng) else {
            return Ok(MutationDelta::default());
        };

        let neuron_marking = markings.next_marking();
        let incoming_marking = markings.next_marking();
        let outgoing_marking = markings.next_marking();

        let neuron = NeuronAllele::new(
            neuron_marking,
            NeuronRole::Hidden,
            config.hidden_activation,
        );
        let incoming =
            ConnectionAllele::new(incoming_marking, split.source(), neuron_marking, 1.0);
        let mut outgoing = ConnectionAllele::new(
            outgoing_marking,
            neuron_marking,
            split.target(),
            split.weight(),
        );
        if split.is_recurrent() {
            outgoing = outgoing.recurrent();
        }

        Ok(MutationDelta {
            removed: vec![Allele::Connection((*split).clone())],
            added: vec![
                Allele::Neuron(neuron),
                Allele::Connection(incoming),
                Allele::Connection(outgoing),
            ],
        })
    }
}

/// Removes one random connection. A genome's last connection is never
/// removed, so mutated material always keeps some expressed topology.
#[derive(Clone, Debug, Default)]
pub struct RemoveConnectionMutator;

impl Mutator for RemoveConnectionMutator {
    fn mutate(
        &self,
        genome: &Genome,
        _markings: &MarkingAllocator,
        _config: &GeneticConfig,
        rng: &mut dyn RngCore,
    ) -> Result<MutationDelta, MutationError> {
        if genome.connection_count() <= 1 {
            return Ok(MutationDelta::default());
        }
        let connections: Vec<&ConnectionAllele> = genome.connections().collect();
        let removed = connections.choose(rng).expect("connections are non-empty");
        Ok(MutationDelta {
            removed: vec![Allele::Connection((*removed).clone())],
            added: vec![],
        })
    }
}

/// Whether any directed path of connections leads from `from` to `to`.
fn path_exists(genome: &Genome, from: Marking, to: Marking) -> bool {
    let mut forward: HashMap<Marking, Vec<Marking>, RandomState> = HashMap::default();
    for connection in genome.connections() {
        forward
            .entry(connection.source())
            .or_default()
            .push(connection.target());
    }

    let mut visited: HashSet<Marking, RandomState> = HashSet::default();
    let mut frontier = VecDeque::from([from]);
    while let Some(current) = frontier.pop_front() {
        if current == to {
            return true;
        }
        if let Some(nexts) = forward.get(&current) {
            for &next in nexts {
                if visited.insert(next) {
                    frontier.push_back(next);
                }
            }
        }
    }
    false
}
