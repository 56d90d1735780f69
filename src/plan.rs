//! Update planning: which triples to add and which to remove.
//!
//! The store has no replace primitive, so every run is reduced to one add-set
//! and one remove-set. How wide the remove-set may reach depends on what the
//! caller actually recomputed:
//!
//! - [`SyncPolicy::Full`]: the desired set is the complete truth for the scope;
//!   anything else in the scope goes.
//! - [`SyncPolicy::SubjectScoped`]: the desired set is complete only for the
//!   subjects it mentions; all other subjects are left exactly as they are.

use std::collections::HashSet;
use std::fmt;

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

use crate::graph::{TripleSet, diff};

/// Consistency policy for a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    Full,
    SubjectScoped,
}

impl fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPolicy::Full => write!(f, "full"),
            SyncPolicy::SubjectScoped => write!(f, "subject-scoped"),
        }
    }
}

/// The writes a run intends to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub policy: SyncPolicy,
    pub to_add: TripleSet,
    pub to_remove: TripleSet,
    /// Subjects whose existing triples were eligible for removal.
    /// Empty under [`SyncPolicy::Full`], where every subject is.
    pub touched_subjects: HashSet<NamedNode>,
}

impl UpdatePlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

impl fmt::Display for UpdatePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} plan: +{} -{}",
            self.policy,
            self.to_add.len(),
            self.to_remove.len()
        )?;
        if self.policy == SyncPolicy::SubjectScoped {
            write!(f, " over {} subject(s)", self.touched_subjects.len())?;
        }
        Ok(())
    }
}

/// Full-graph plan: add `desired − existing`, remove `existing − desired`.
pub fn plan_full(desired: &TripleSet, existing: &TripleSet) -> UpdatePlan {
    let d = diff(desired, existing);
    UpdatePlan {
        policy: SyncPolicy::Full,
        to_add: d.to_add,
        to_remove: d.to_remove,
        touched_subjects: HashSet::new(),
    }
}

/// Subject-scoped plan.
///
/// Only existing triples whose subject appears in `desired` are candidates for
/// removal. `explicit_removals` are added to the remove-set verbatim, whatever
/// their subject.
pub fn plan_scoped(
    desired: &TripleSet,
    existing: &TripleSet,
    explicit_removals: &TripleSet,
) -> UpdatePlan {
    let touched_subjects = desired.subjects();
    let candidates = existing.restrict_to_subjects(&touched_subjects);
    let d = diff(desired, &candidates);

    let mut to_remove = d.to_remove;
    to_remove.extend(explicit_removals.iter().cloned());

    UpdatePlan {
        policy: SyncPolicy::SubjectScoped,
        to_add: d.to_add,
        to_remove,
        touched_subjects,
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
    fn full_plan_removes_untouched_subjects() {
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let desired = set(&[t("A", "p", "1"), t("A", "q", "3")]);
        let plan = plan_full(&desired, &existing);
        assert_eq!(plan.to_add, set(&[t("A", "q", "3")]));
        assert_eq!(plan.to_remove, set(&[t("B", "p", "2")]));
    }

    #[test]
    fn scoped_plan_leaves_untouched_subjects_alone() {
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let desired = set(&[t("A", "p", "1"), t("A", "q", "3")]);
        let plan = plan_scoped(&desired, &existing, &TripleSet::new());
        assert_eq!(plan.to_add, set(&[t("A", "q", "3")]));
        assert!(plan.to_remove.is_empty());
        assert_eq!(plan.touched_subjects.len(), 1);
    }

    #[test]
    fn scoped_plan_replaces_stale_facts_of_touched_subjects() {
        let existing = set(&[t("A", "p", "old"), t("A", "r", "keep?"), t("B", "p", "2")]);
        let desired = set(&[t("A", "p", "new")]);
        let plan = plan_scoped(&desired, &existing, &TripleSet::new());
        assert_eq!(plan.to_add, set(&[t("A", "p", "new")]));
        assert_eq!(plan.to_remove, set(&[t("A", "p", "old"), t("A", "r", "keep?")]));
    }

    #[test]
    fn explicit_removals_are_unioned_verbatim() {
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let desired = set(&[t("A", "p", "1")]);
        // Removal for a subject that is not in `desired`, and one that is not even stored.
        let retracted = set(&[t("B", "p", "2"), t("C", "p", "9")]);
        let plan = plan_scoped(&desired, &existing, &retracted);
        assert!(plan.to_add.is_empty());
        assert_eq!(plan.to_remove, retracted);
    }

    #[test]
    fn empty_input_diverges_between_policies() {
        let existing = set(&[t("A", "p", "1"), t("B", "p", "2")]);
        let empty = TripleSet::new();

        let full = plan_full(&empty, &existing);
        assert_eq!(full.to_remove, existing);

        let scoped = plan_scoped(&empty, &existing, &empty);
        assert!(scoped.is_noop());
    }

    #[test]
    fn display_summarizes_plan() {
        let plan = plan_scoped(&set(&[t("A", "q", "3")]), &TripleSet::new(), &TripleSet::new());
        assert_eq!(plan.to_string(), "subject-scoped plan: +1 -0 over 1 subject(s)");
    }
}
