//! Three-way partition of a desired triple set against the existing one.

use super::TripleSet;

/// `desired ∩ existing`, `desired − existing` and `existing − desired`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub common: TripleSet,
    pub to_add: TripleSet,
    pub to_remove: TripleSet,
}

impl DiffResult {
    /// Nothing to add and nothing to remove.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff `desired` against `existing`. Pure and linear in the input sizes.
pub fn diff(desired: &TripleSet, existing: &TripleSet) -> DiffResult {
    let mut common = TripleSet::with_capacity(desired.len().min(existing.len()));
    let mut to_add = TripleSet::new();
    for triple in desired {
        if existing.contains(triple) {
            common.insert(triple.clone());
        } else {
            to_add.insert(triple.clone());
        }
    }
    let to_remove = existing
        .iter()
        .filter(|t| !desired.contains(t))
        .cloned()
        .collect();

    DiffResult {
        common,
        to_add,
        to_remove,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::literal(
            &format!("http://ex.org/{s}"),
            &format!("http://ex.org/{p}"),
            o,
        )
        .unwrap()
    }

    fn set(triples: &[Triple]) -> TripleSet {
        triples.iter().cloned().collect()
    }

    #[test]
    fn partitions_are_disjoint_and_cover_both_inputs() {
        let desired = set(&[t("A", "p", "1"), t("A", "q", "3"), t("C", "p", "5")]);
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let d = diff(&desired, &existing);

        assert_eq!(d.to_add, desired.difference(&existing));
        assert_eq!(d.to_remove, existing.difference(&desired));
        assert_eq!(d.common, desired.intersection(&existing));
        assert!(d.to_add.intersection(&d.to_remove).is_empty());

        let covered = d.to_add.union(&d.common).union(&d.to_remove);
        assert_eq!(covered, desired.union(&existing));
    }

    #[test]
    fn empty_desired_removes_everything() {
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let d = diff(&TripleSet::new(), &existing);
        assert!(d.to_add.is_empty());
        assert_eq!(d.to_remove, existing);
    }

    #[test]
    fn empty_existing_adds_everything() {
        let desired = set(&[t("A", "p", "1")]);
        let d = diff(&desired, &TripleSet::new());
        assert_eq!(d.to_add, desired);
        assert!(d.to_remove.is_empty());
    }

    #[test]
    fn identical_sets_are_noop() {
        let s = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let d = diff(&s, &s.clone());
        assert!(d.is_noop());
        assert_eq!(d.common, s);
    }
}
