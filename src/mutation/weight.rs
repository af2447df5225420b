use crate::genomics::{Allele, ConnectionAllele, GeneticConfig, Genome, MarkingAllocator};
use crate::mutation::{MutationDelta, MutationError, Mutator};

use rand::seq::SliceRandom;
use rand::RngCore;
use rand_distr::{Distribution, Normal};

/// The weight-perturbation operator.
///
/// Perturbs `round(rate × connection count)` connection weights (at
/// least one, when any connections exist) by a gaussian nudge, clamped
/// to the configured weight bounds. The perturbed alleles keep their
/// historical markings: a weight change is a perturbation of the same
/// gene, not a new one.
#[derive(Clone, Debug)]
pub struct WeightMutator {
    rate: f64,
    std_dev: f64,
}

impl WeightMutator {
    /// Creates a weight mutator with the given perturbation rate and
    /// gaussian standard deviation.
    ///
    /// # Errors
    /// Fails if `rate` is outside (0, 1] or `std_dev` is not positive.
    pub fn new(rate: f64, std_dev: f64) -> Result<WeightMutator, MutationError> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(MutationError::InvalidRate(rate));
        }
        if !(std_dev > 0.0) {
            return Err(MutationError::InvalidStdDev(std_dev));
        }
        Ok(WeightMutator { rate, std_dev })
    }

    /// Creates a weight mutator from an already-validated configuration.
    pub fn from_config(config: &GeneticConfig) -> WeightMutator {
        WeightMutator {
            rate: config.weight_mutation_rate,
            std_dev: config.weight_mutation_std_dev,
        }
    }
}

impl Mutator for WeightMutator {
    fn mutate(
        &self,
        genome: &Genome,
        _markings: &MarkingAllocator,
        config: &GeneticConfig,
        rng: &mut dyn RngCore,
    ) -> Result<MutationDelta, MutationError> {
        let connections: Vec<&ConnectionAllele> = genome.connections().collect();
        if connections.is_empty() {
            return Ok(MutationDelta::default());
        }

        let count = ((self.rate * connections.len() as f64).round() as usize)
            .max(1)
            .min(connections.len());

        let mut order: Vec<usize> = (0..connections.len()).collect();
        order.shuffle(rng);

        let normal = Normal::new(0.0, self.std_dev)
            .map_err(|_| MutationError::InvalidStdDev(self.std_dev))?;

        let mut delta = MutationDelta::default();
        for &i in order.iter().take(count) {
            let old = connections[i];
            let nudged = (old.weight() + normal.sample(rng))
                .clamp(config.weight_min, config.weight_max);
            delta.removed.push(Allele::Connection(old.clone()));
            delta.added.push(Allele::Connection(old.with_weight(nudged)));
        }
        Ok(delta)
    }
}
