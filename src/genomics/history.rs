use crate::genomics::GeneticConfig;
use crate::{GenomeId, Marking};

use std::sync::atomic::{AtomicU64, Ordering};

/// Allocates historical markings for a whole run.
///
/// Markings are minted by a single monotonically increasing counter:
/// every new structural element requests the next value, and callers must
/// never reuse or guess markings. The counter is atomic so that
/// reproduction for multiple species may run concurrently without two
/// structurally new genes receiving the same marking.
///
/// The allocator is an explicit object passed by reference, not a
/// process-wide singleton; tests and independent runs construct their own.
#[derive(Debug)]
pub struct MarkingAllocator {
    next_marking: AtomicU64,
    next_genome_id: AtomicU64,
}

impl MarkingAllocator {
    /// Creates an allocator whose markings start after the fixed seed
    /// layout of [`Genome::minimal`]: neuron markings `0..inputs+outputs`
    /// and the fully-connected initial connection markings after those.
    /// All genomes in a population therefore share the same input and
    /// output neuron markings.
    ///
    /// [`Genome::minimal`]: crate::genomics::Genome::minimal
    pub fn new(config: &GeneticConfig) -> MarkingAllocator {
        let inputs = config.input_count.get() as u64;
        let outputs = config.output_count.get() as u64;
        MarkingAllocator {
            next_marking: AtomicU64::new(inputs + outputs + inputs * outputs),
            next_genome_id: AtomicU64::new(0),
        }
    }

    /// Creates an allocator whose markings start at `base`. Useful for
    /// building genomes by hand.
    pub fn starting_at(base: Marking) -> MarkingAllocator {
        MarkingAllocator {
            next_marking: AtomicU64::new(base),
            next_genome_id: AtomicU64::new(0),
        }
    }

    /// Mints the next historical marking.
    pub fn next_marking(&self) -> Marking {
        self.next_marking.fetch_add(1, Ordering::Relaxed)
    }

    /// Mints the next genome identifier.
    pub fn next_genome_id(&self) -> GenomeId {
        self.next_genome_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the marking the next mint would produce, without minting.
    pub fn peek_marking(&self) -> Marking {
        self.next_marking.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn markings_are_monotonic_and_unique() {
        let allocator = MarkingAllocator::starting_at(10);
        let a = allocator.next_marking();
        let b = allocator.next_marking();
        let c = allocator.next_marking();
        assert_eq!((a, b, c), (10, 11, 12));
    }

    #[test]
    fn seeded_allocator_skips_the_minimal_genome_layout() {
        let config = GeneticConfig::for_test(3, 2);
        let allocator = MarkingAllocator::new(&config);
        // 5 neuron markings + 6 seed connection markings.
        assert_eq!(allocator.peek_marking(), 11);
    }

    #[test]
    fn concurrent_minting_never_duplicates() {
        let allocator = Arc::new(MarkingAllocator::starting_at(0));
        let mut handles = vec![];
        for _ in 0..4 {
            let allocator = Arc::clone(&allocator);
            handles.push(thread::spawn(move || {
                (0..1000).map(|_| allocator.next_marking()).collect::<Vec<_>>()
            }));
        }
        let mut all: Vec<Marking> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 4000);
    }
}
