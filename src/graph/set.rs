//! Unordered set of triples with the set algebra the planner needs.

use std::collections::HashSet;
use std::collections::hash_set;

use oxigraph::model::NamedNode;

use super::Triple;

/// A set of triples. Duplicates collapse; iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleSet {
    triples: HashSet<Triple>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triples: HashSet::with_capacity(capacity),
        }
    }

    /// Insert a triple, returning `true` if it was not already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Triple> {
        self.triples.iter()
    }

    pub fn union(&self, other: &TripleSet) -> TripleSet {
        self.triples.union(&other.triples).cloned().collect()
    }

    /// Triples in `self` that are not in `other`.
    pub fn difference(&self, other: &TripleSet) -> TripleSet {
        self.triples.difference(&other.triples).cloned().collect()
    }

    pub fn intersection(&self, other: &TripleSet) -> TripleSet {
        self.triples.intersection(&other.triples).cloned().collect()
    }

    /// Every distinct subject in the set.
    pub fn subjects(&self) -> HashSet<NamedNode> {
        self.triples.iter().map(|t| t.subject.clone()).collect()
    }

    /// All triples about one subject.
    pub fn with_subject(&self, subject: &NamedNode) -> TripleSet {
        self.triples
            .iter()
            .filter(|t| &t.subject == subject)
            .cloned()
            .collect()
    }

    /// All triples whose subject is in `subjects`.
    pub fn restrict_to_subjects(&self, subjects: &HashSet<NamedNode>) -> TripleSet {
        self.triples
            .iter()
            .filter(|t| subjects.contains(&t.subject))
            .cloned()
            .collect()
    }

    /// Triples in a deterministic order, for output and chunking.
    pub fn to_sorted_vec(&self) -> Vec<Triple> {
        let mut v: Vec<Triple> = self.triples.iter().cloned().collect();
        v.sort_unstable();
        v
    }
}

impl FromIterator<Triple> for TripleSet {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl Extend<Triple> for TripleSet {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl IntoIterator for TripleSet {
    type Item = Triple;
    type IntoIter = hash_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a TripleSet {
    type Item = &'a Triple;
    type IntoIter = hash_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
