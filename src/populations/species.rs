use crate::genomics::Genome;

use std::fmt;

/// Species identifier. Specifies the generation in which the species
/// was born, and the count of other species born in the _same
/// generation_ before the one identified (i.e. the third species born
/// in generation 5 is species [5, 2]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeciesId(pub usize, pub usize);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// A collection of reproductively compatible genomes.
///
/// Membership is determined by compatibility distance to a
/// _representative_: the genome that founded the species. The
/// representative persists across generations so species identity is
/// stable even as members churn; members are stored as indices into
/// the population's genome vector and are re-assigned every
/// generation.
#[derive(Debug, Clone)]
pub struct Species {
    id: SpeciesId,
    representative: Genome,
    members: Vec<usize>,
}

impl Species {
    /// Creates a new species founded by `representative`, which is
    /// also its first member.
    pub(super) fn new(id: SpeciesId, representative: Genome, first_member: usize) -> Species {
        Species {
            id,
            representative,
            members: vec![first_member],
        }
    }

    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// The genome distances are measured against. A clone of the
    /// founding genome, not a live population member.
    pub fn representative(&self) -> &Genome {
        &self.representative
    }

    /// Indices of the species' members in the population's genome
    /// vector.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(super) fn add_member(&mut self, index: usize) {
        self.members.push(index);
    }

    pub(super) fn clear_members(&mut self) {
        self.members.clear();
    }
}
