use crate::GenomeId;

use std::fmt;

/// Basic statistical data over one generation's fitness values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence. An empty
    /// sequence yields all-zero statistics.
    ///
    /// # Examples
    /// ```
    /// use neuvo::populations::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        data.sort_unstable_by(|a, b| a.partial_cmp(b).expect("NaN fitness"));
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: max,
            minimum: min,
            mean: sum / data.len() as f64,
            median,
        }
    }
}

/// A snapshot of one completed generation.
#[derive(Clone, Debug)]
pub struct GenerationSummary {
    /// Generation number the snapshot describes (0 is the seed
    /// population's first evaluation).
    pub generation: usize,
    /// Species count after re-speciation.
    pub species_count: usize,
    /// The generation's fittest genome.
    pub champion_id: GenomeId,
    /// The champion's raw fitness.
    pub champion_fitness: f64,
    /// The champion's fitness divided by the evaluator's maximum, or
    /// the raw value when the evaluator is unbounded.
    pub champion_adjusted_fitness: f64,
    /// Raw fitness statistics over the whole generation.
    pub fitness: Stats,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GenerationSummary {{\n\
            \tgeneration: {:?}\n\
            \tspecies_count: {:?}\n\
            \tchampion_id: {:?}\n\
            \tchampion_fitness: {:?}\n\
            \tchampion_adjusted_fitness: {:?}\n\
            \tfitness: {:?}\n\
            }}",
            &self.generation,
            &self.species_count,
            &self.champion_id,
            &self.champion_fitness,
            &self.champion_adjusted_fitness,
            &self.fitness,
        )
    }
}
