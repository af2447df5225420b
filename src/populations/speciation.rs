use crate::genomics::{GeneticConfig, Genome};
use crate::populations::{PopulationConfig, Species, SpeciesId};

/// Computes the compatibility distance between two genomes.
///
/// The distance is taken over connection alleles only:
///
/// ```text
/// excess·E/N + disjoint·D/N + common·W̄
/// ```
///
/// where `E` counts markings beyond the other genome's highest, `D`
/// counts markings absent from the other genome but within its range,
/// `W̄` is the mean absolute weight difference over shared markings,
/// and `N = max(|connections a|, |connections b|, 1)`. Symmetric, and
/// zero between a genome and itself.
pub fn compatibility_distance(a: &Genome, b: &Genome, config: &GeneticConfig) -> f64 {
    let max_a = a.max_connection_marking();
    let max_b = b.max_connection_marking();

    let mut excess = 0usize;
    let mut disjoint = 0usize;
    let mut common = 0usize;
    let mut weight_difference = 0.0;

    let mut connections_a = a.connections().peekable();
    let mut connections_b = b.connections().peekable();
    loop {
        match (connections_a.peek(), connections_b.peek()) {
            (Some(ca), Some(cb)) if ca.marking() == cb.marking() => {
                common += 1;
                weight_difference += (ca.weight() - cb.weight()).abs();
                connections_a.next();
                connections_b.next();
            }
            (Some(ca), Some(cb)) if ca.marking() < cb.marking() => {
                if max_b.map_or(true, |m| ca.marking() > m) {
                    excess += 1;
                } else {
                    disjoint += 1;
                }
                connections_a.next();
            }
            (Some(_), Some(_)) | (None, Some(_)) => {
                let cb = connections_b.next().expect("peeked connection");
                if max_a.map_or(true, |m| cb.marking() > m) {
                    excess += 1;
                } else {
                    disjoint += 1;
                }
            }
            (Some(_), None) => {
                let ca = connections_a.next().expect("peeked connection");
                if max_b.map_or(true, |m| ca.marking() > m) {
                    excess += 1;
                } else {
                    disjoint += 1;
                }
            }
            (None, None) => break,
        }
    }

    let n = a.connection_count().max(b.connection_count()).max(1) as f64;
    let mean_weight_difference = if common > 0 {
        weight_difference / common as f64
    } else {
        0.0
    };

    config.excess_coefficient * excess as f64 / n
        + config.disjoint_coefficient * disjoint as f64 / n
        + config.common_weight_coefficient * mean_weight_difference
}

/// Re-partitions `genomes` into `species` by first fit.
///
/// Existing species keep their representatives and are offered
/// genomes, in population order, before any new species is founded;
/// species left without members are dropped. The partition is
/// order-dependent: an earlier genome may found the species a later
/// one joins.
pub(super) fn speciate(
    genomes: &[Genome],
    species: &mut Vec<Species>,
    generation: usize,
    population: &PopulationConfig,
    genetic: &GeneticConfig,
) {
    for existing in species.iter_mut() {
        existing.clear_members();
    }

    let mut born = 0;
    for (index, genome) in genomes.iter().enumerate() {
        let home = species.iter_mut().find(|s| {
            compatibility_distance(genome, s.representative(), genetic)
                < population.speciation_threshold
        });
        match home {
            Some(home) => home.add_member(index),
            None => {
                species.push(Species::new(
                    SpeciesId(generation, born),
                    genome.clone(),
                    index,
                ));
                born += 1;
            }
        }
    }

    species.retain(|s| !s.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationKind;
    use crate::genomics::{ConnectionAllele, NeuronAllele, NeuronRole};

    /// 1-input/1-output genome with a single connection of the given
    /// weight.
    fn single_connection_genome(id: u64, weight: f64) -> Genome {
        let mut genome = Genome::new(id);
        genome
            .insert_neuron(NeuronAllele::new(0, NeuronRole::Input, ActivationKind::Linear))
            .unwrap();
        genome
            .insert_neuron(NeuronAllele::new(
                1,
                NeuronRole::Output,
                ActivationKind::SteepSigmoid,
            ))
            .unwrap();
        genome
            .insert_connection(ConnectionAllele::new(2, 0, 1, weight))
            .unwrap();
        genome
    }

    #[test]
    fn distance_to_self_is_zero() {
        let config = GeneticConfig::default();
        let genome = single_connection_genome(0, 1.25);
        assert_eq!(compatibility_distance(&genome, &genome, &config), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let config = GeneticConfig::default();
        let a = single_connection_genome(0, 1.25);
        let mut b = single_connection_genome(1, -0.75);
        b.insert_neuron(NeuronAllele::new(3, NeuronRole::Hidden, ActivationKind::Tanh))
            .unwrap();
        b.insert_connection(ConnectionAllele::new(4, 0, 3, 2.0))
            .unwrap();
        b.insert_connection(ConnectionAllele::new(5, 3, 1, 2.0))
            .unwrap();

        assert_eq!(
            compatibility_distance(&a, &b, &config),
            compatibility_distance(&b, &a, &config),
        );
    }

    #[test]
    fn single_weight_difference_scales_by_the_common_coefficient() {
        let config = GeneticConfig::default();
        let a = single_connection_genome(0, 1.0);
        let b = single_connection_genome(1, 3.5);
        assert_eq!(
            compatibility_distance(&a, &b, &config),
            config.common_weight_coefficient * 2.5,
        );
    }

    #[test]
    fn unshared_markings_count_as_excess_or_disjoint() {
        let config = GeneticConfig::default();
        let a = single_connection_genome(0, 1.0);
        let mut b = single_connection_genome(1, 1.0);
        b.insert_neuron(NeuronAllele::new(3, NeuronRole::Hidden, ActivationKind::Tanh))
            .unwrap();
        b.insert_connection(ConnectionAllele::new(4, 0, 3, 2.0))
            .unwrap();
        b.insert_connection(ConnectionAllele::new(5, 3, 1, 2.0))
            .unwrap();

        // Markings 4 and 5 lie beyond a's highest marking: both excess,
        // none disjoint, over N = 3 connections.
        assert_eq!(
            compatibility_distance(&a, &b, &config),
            config.excess_coefficient * 2.0 / 3.0,
        );
    }

    #[test]
    fn speciation_is_first_fit_in_population_order() {
        // Weight gaps chosen so near joins the founder's species and
        // far exceeds the threshold from the founder but not from near.
        let genetic = GeneticConfig::default();
        let population = PopulationConfig::default();
        let founder = single_connection_genome(0, 0.0);
        let near = single_connection_genome(1, 5.0);
        let far = single_connection_genome(2, 10.0);
        assert!(
            compatibility_distance(&founder, &near, &genetic)
                < population.speciation_threshold
        );
        assert!(
            compatibility_distance(&founder, &far, &genetic)
                >= population.speciation_threshold
        );
        assert!(
            compatibility_distance(&near, &far, &genetic) < population.speciation_threshold
        );

        let mut species = vec![];
        let genomes = vec![founder.clone(), near.clone(), far.clone()];
        speciate(&genomes, &mut species, 0, &population, &genetic);
        assert_eq!(species.len(), 2);
        assert_eq!(species[0].members(), &[0, 1]);
        assert_eq!(species[1].members(), &[2]);

        // The same genomes led by `near` fold into a single species.
        let mut species = vec![];
        let genomes = vec![near, far, founder];
        speciate(&genomes, &mut species, 0, &population, &genetic);
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].members(), &[0, 1, 2]);
    }

    #[test]
    fn representatives_persist_across_respeciation() {
        let genetic = GeneticConfig::default();
        let population = PopulationConfig::default();
        let genomes = vec![single_connection_genome(0, 0.0)];

        let mut species = vec![];
        speciate(&genomes, &mut species, 0, &population, &genetic);
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].id(), SpeciesId(0, 0));

        // A drifted population still speciates against the original
        // representative.
        let drifted = vec![single_connection_genome(1, 2.0)];
        speciate(&drifted, &mut species, 1, &population, &genetic);
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].id(), SpeciesId(0, 0));
        assert_eq!(species[0].representative().id(), 0);

        // Empty species are dropped.
        let alien = vec![single_connection_genome(2, 20.0)];
        speciate(&alien, &mut species, 2, &population, &genetic);
        assert_eq!(species.len(), 1);
        assert_eq!(species[0].id(), SpeciesId(2, 0));
    }
}
