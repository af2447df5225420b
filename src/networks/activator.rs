use crate::networks::{ActivationError, Phenotype};

use std::num::NonZeroUsize;

/// Executes a [`Phenotype`] against stimulus vectors.
///
/// The activator owns the phenotype and a flat value array indexed by
/// node position. Non-recurrent phenotypes are evaluated in one pass
/// over the topological order; recurrent ones settle over the
/// configured number of synchronous cycles, every node reading the
/// previous cycle's values. Node values persist between calls to
/// [`next`](Activator::next), so recurrent networks carry state across
/// a stimulus sequence until [`reset`](Activator::reset).
#[derive(Clone, Debug)]
pub struct Activator {
    phenotype: Phenotype,
    cycles: usize,
    values: Vec<f64>,
    previous: Vec<f64>,
    min_response: f64,
    max_response: f64,
}

impl Activator {
    /// Wraps `phenotype` for execution, settling recurrent topologies
    /// over `recurrent_cycles` synchronous cycles per stimulus.
    ///
    /// # Errors
    /// Fails if the phenotype's output nodes carry activation functions
    /// with differing value ranges, since a single response range could
    /// not be reported for the network.
    pub fn new(
        phenotype: Phenotype,
        recurrent_cycles: NonZeroUsize,
    ) -> Result<Activator, ActivationError> {
        let outputs =
            &phenotype.nodes[phenotype.input_count..phenotype.input_count + phenotype.output_count];
        let first = outputs[0].activation;
        for node in &outputs[1..] {
            if node.activation.min_value() != first.min_value()
                || node.activation.max_value() != first.max_value()
            {
                return Err(ActivationError::MixedOutputRanges {
                    first_min: first.min_value(),
                    first_max: first.max_value(),
                    other_min: node.activation.min_value(),
                    other_max: node.activation.max_value(),
                });
            }
        }

        let node_count = phenotype.nodes.len();
        Ok(Activator {
            cycles: recurrent_cycles.get(),
            values: vec![0.0; node_count],
            previous: vec![0.0; node_count],
            min_response: first.min_value(),
            max_response: first.max_value(),
            phenotype,
        })
    }

    /// Feeds one stimulus vector through the network and returns the
    /// output node values.
    ///
    /// # Errors
    /// Fails if `stimuli` does not match the phenotype's input
    /// dimension.
    pub fn next(&mut self, stimuli: &[f64]) -> Result<Vec<f64>, ActivationError> {
        let input_count = self.phenotype.input_count;
        if stimuli.len() != input_count {
            return Err(ActivationError::StimulusDimension {
                got: stimuli.len(),
                expected: input_count,
            });
        }
        self.values[..input_count].copy_from_slice(stimuli);

        if self.phenotype.recurrent {
            for _ in 0..self.cycles {
                self.step_synchronous();
            }
        } else {
            for position in 0..self.phenotype.order.len() {
                let node = self.phenotype.order[position];
                let sum: f64 = self.phenotype.nodes[node]
                    .incoming
                    .iter()
                    .map(|edge| self.values[edge.source] * edge.weight)
                    .sum();
                self.values[node] = self.phenotype.nodes[node].activation.apply(sum);
            }
        }

        Ok(self.values[input_count..input_count + self.phenotype.output_count].to_vec())
    }

    /// One synchronous cycle: every non-input node is recomputed from
    /// the previous cycle's values.
    fn step_synchronous(&mut self) {
        self.previous.copy_from_slice(&self.values);
        for node in self.phenotype.input_count..self.phenotype.nodes.len() {
            let sum: f64 = self.phenotype.nodes[node]
                .incoming
                .iter()
                .map(|edge| self.previous[edge.source] * edge.weight)
                .sum();
            self.values[node] = self.phenotype.nodes[node].activation.apply(sum);
        }
    }

    /// Zeroes all node values, forgetting any recurrent state.
    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.previous.fill(0.0);
    }

    /// Stimulus dimension the network expects.
    pub fn input_count(&self) -> usize {
        self.phenotype.input_count
    }

    /// Response dimension the network produces.
    pub fn output_count(&self) -> usize {
        self.phenotype.output_count
    }

    /// Lower bound of every output value.
    pub fn min_response(&self) -> f64 {
        self.min_response
    }

    /// Upper bound of every output value.
    pub fn max_response(&self) -> f64 {
        self.max_response
    }

    /// Whether the wrapped phenotype settles recurrently.
    pub fn is_recurrent(&self) -> bool {
        self.phenotype.recurrent
    }

    pub fn phenotype(&self) -> &Phenotype {
        &self.phenotype
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationKind;
    use crate::genomics::{ConnectionAllele, GeneticConfig, Genome, NeuronAllele, NeuronRole};
    use crate::networks::Transcriber;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use std::num::NonZeroUsize;

    fn cycles(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn transcribe(genome: &Genome) -> Phenotype {
        Transcriber::new(&GeneticConfig::default())
            .transcribe(genome)
            .unwrap()
    }

    /// 3 inputs feeding one signed-clamped output with weights
    /// 1.0, -1.0, 0.0.
    fn weighted_sum_genome() -> Genome {
        let mut genome = Genome::new(0);
        for marking in 0..3 {
            genome
                .insert_neuron(NeuronAllele::new(
                    marking,
                    NeuronRole::Input,
                    ActivationKind::Linear,
                ))
                .unwrap();
        }
        genome
            .insert_neuron(NeuronAllele::new(
                3,
                NeuronRole::Output,
                ActivationKind::SignedClampedLinear,
            ))
            .unwrap();
        for (offset, (source, weight)) in [(0u64, 1.0), (1, -1.0), (2, 0.0)].iter().enumerate() {
            genome
                .insert_connection(ConnectionAllele::new(4 + offset as u64, *source, 3, *weight))
                .unwrap();
        }
        genome
    }

    #[test]
    fn computes_the_weighted_sum_of_stimuli() {
        let mut activator = Activator::new(transcribe(&weighted_sum_genome()), cycles(1)).unwrap();
        assert_eq!(activator.next(&[1.0, 1.0, 1.0]).unwrap(), vec![0.0]);
        assert_eq!(activator.next(&[1.0, 0.0, 1.0]).unwrap(), vec![1.0]);
        assert_eq!(activator.next(&[0.0, 1.0, 0.0]).unwrap(), vec![-1.0]);
    }

    #[test]
    fn same_stimuli_always_produce_the_same_responses() {
        let config = GeneticConfig::for_test(2, 2);
        let mut rng = StdRng::seed_from_u64(17);
        let genome = Genome::minimal(0, &config, &mut rng);
        let transcriber = Transcriber::new(&config);

        let mut a = Activator::new(transcriber.transcribe(&genome).unwrap(), cycles(1)).unwrap();
        let mut b = Activator::new(transcriber.transcribe(&genome).unwrap(), cycles(1)).unwrap();
        for _ in 0..10 {
            assert_eq!(
                a.next(&[0.25, -0.75]).unwrap(),
                b.next(&[0.25, -0.75]).unwrap()
            );
        }
    }

    #[test]
    fn cycle_count_does_not_affect_non_recurrent_networks() {
        let genome = weighted_sum_genome();
        let mut single = Activator::new(transcribe(&genome), cycles(1)).unwrap();
        let mut settled = Activator::new(transcribe(&genome), cycles(5)).unwrap();
        for stimuli in [[1.0, 1.0, 1.0], [1.0, 0.0, 1.0], [-0.5, 0.25, 3.0]] {
            assert_eq!(single.next(&stimuli).unwrap(), settled.next(&stimuli).unwrap());
        }
    }

    #[test]
    fn recurrent_state_persists_and_reset_clears_it() {
        // A hidden accumulator: in -> hidden, hidden -> hidden
        // (self-loop), hidden -> out, all weight 1.0 and linear.
        let mut genome = Genome::new(0);
        genome
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(1, NeuronRole::Output, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(2, NeuronRole::Hidden, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(3, 0, 2, 1.0))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(4, 2, 2, 1.0).recurrent())
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(5, 2, 1, 1.0))
            .unwrap();

        let phenotype = transcribe(&genome);
        assert!(phenotype.is_recurrent());
        let mut activator = Activator::new(phenotype, cycles(1)).unwrap();

        // Each cycle the output reports the previous cycle's
        // accumulator value.
        assert_eq!(activator.next(&[1.0]).unwrap(), vec![0.0]);
        assert_eq!(activator.next(&[1.0]).unwrap(), vec![1.0]);
        assert_eq!(activator.next(&[1.0]).unwrap(), vec![2.0]);

        activator.reset();
        assert_eq!(activator.next(&[1.0]).unwrap(), vec![0.0]);
    }

    #[test]
    fn recurrent_settling_runs_the_configured_cycle_count() {
        // Two-step chain in -> hidden -> out with a recurrent marker so
        // the activator settles instead of following topological order.
        let mut genome = Genome::new(0);
        genome
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(1, NeuronRole::Output, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(2, NeuronRole::Hidden, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(3, 0, 2, 1.0).recurrent())
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(4, 2, 1, 1.0))
            .unwrap();

        // One cycle only propagates the stimulus into the hidden node;
        // two cycles carry it through to the output.
        let mut one = Activator::new(transcribe(&genome), cycles(1)).unwrap();
        assert_eq!(one.next(&[1.0]).unwrap(), vec![0.0]);

        let mut two = Activator::new(transcribe(&genome), cycles(2)).unwrap();
        assert_eq!(two.next(&[1.0]).unwrap(), vec![1.0]);
    }

    #[test]
    fn rejects_mismatched_stimulus_dimension() {
        let mut activator = Activator::new(transcribe(&weighted_sum_genome()), cycles(1)).unwrap();
        assert_eq!(
            activator.next(&[1.0]).unwrap_err(),
            ActivationError::StimulusDimension { got: 1, expected: 3 }
        );
    }

    #[test]
    fn rejects_mixed_output_activation_ranges() {
        let mut genome = Genome::new(0);
        genome
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(1, NeuronRole::Output, ActivationKind::Sigmoid))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(2, NeuronRole::Output, ActivationKind::Tanh))
            .unwrap();

        let error = Activator::new(transcribe(&genome), cycles(1)).unwrap_err();
        assert!(matches!(error, ActivationError::MixedOutputRanges { .. }));
    }

    #[test]
    fn reports_the_output_activation_range() {
        let activator = Activator::new(transcribe(&weighted_sum_genome()), cycles(1)).unwrap();
        assert_eq!(activator.min_response(), -1.0);
        assert_eq!(activator.max_response(), 1.0);
        assert_eq!(activator.input_count(), 3);
        assert_eq!(activator.output_count(), 1);
    }
}
