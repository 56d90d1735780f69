//! Sync orchestrator: fetch, plan, apply, report.
//!
//! [`GraphSync`] owns a [`GraphStore`] and runs one complete, independent pass
//! per call. Nothing is cached between calls.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::batch::{BatchExecutor, BatchFailure, BatchMode, BatchOp};
use crate::config::SyncSettings;
use crate::error::{SyncError, SyncResult};
use crate::graph::{Scope, TripleSet};
use crate::plan::{SyncPolicy, UpdatePlan, plan_full, plan_scoped};
use crate::store::GraphStore;

/// What to do when the current contents of a scope cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchFailurePolicy {
    /// Treat the scope as empty: desired triples are (re-)added and nothing
    /// is removed.
    #[default]
    Degrade,
    /// Fail the run before any write.
    Abort,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub scope: String,
    pub policy: SyncPolicy,
    /// Triples the store confirmed as inserted.
    pub added: usize,
    /// Triples the store confirmed as removed.
    pub removed: usize,
    pub planned_add: usize,
    pub planned_remove: usize,
    pub failed_batches: Vec<BatchFailure>,
    /// The existing state could not be fetched and was taken as empty.
    pub fetch_degraded: bool,
}

impl SyncReport {
    /// Every planned write was confirmed and the existing state was known.
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty() && !self.fetch_degraded
    }
}

/// A plan computed without writing.
#[derive(Debug, Clone)]
pub struct Preview {
    pub plan: UpdatePlan,
    /// The existing state could not be fetched; `plan` assumes an empty scope.
    pub fetch_degraded: bool,
}

/// Synchronizes desired triple sets into a store, one scope per call.
pub struct GraphSync<S> {
    store: S,
    executor: BatchExecutor,
    fetch_policy: FetchFailurePolicy,
}

impl<S: GraphStore> GraphSync<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            executor: BatchExecutor::default(),
            fetch_policy: FetchFailurePolicy::default(),
        }
    }

    pub fn from_settings(store: S, settings: &SyncSettings) -> SyncResult<Self> {
        let mode = if settings.parallel {
            BatchMode::Parallel
        } else {
            BatchMode::Sequential
        };
        Ok(Self::new(store)
            .with_batch_size(settings.batch_size()?)
            .with_mode(mode)
            .with_fetch_policy(settings.on_fetch_failure))
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.executor = BatchExecutor::new(batch_size).with_mode(self.executor.mode());
        self
    }

    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.executor = self.executor.with_mode(mode);
        self
    }

    pub fn with_fetch_policy(mut self, policy: FetchFailurePolicy) -> Self {
        self.fetch_policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn executor(&self) -> &BatchExecutor {
        &self.executor
    }

    /// Read the scope, applying the fetch failure policy.
    /// The flag is `true` when the result was substituted by an empty set.
    fn fetch_existing(&self, scope: &Scope) -> SyncResult<(TripleSet, bool)> {
        match self.store.fetch_all(scope) {
            Ok(existing) => {
                tracing::debug!(scope = %scope, count = existing.len(), "existing triples");
                Ok((existing, false))
            }
            Err(source) => match self.fetch_policy {
                FetchFailurePolicy::Degrade => {
                    tracing::warn!(
                        scope = %scope,
                        store = self.store.name(),
                        error = %source,
                        "could not fetch existing triples, treating scope as empty"
                    );
                    Ok((TripleSet::new(), true))
                }
                FetchFailurePolicy::Abort => Err(SyncError::FetchFailed {
                    scope: scope.to_string(),
                    source,
                }),
            },
        }
    }

    /// Plan a full sync without writing.
    pub fn preview_full(&self, scope: &Scope, desired: &TripleSet) -> SyncResult<Preview> {
        let (existing, fetch_degraded) = self.fetch_existing(scope)?;
        Ok(Preview {
            plan: plan_full(desired, &existing),
            fetch_degraded,
        })
    }

    /// Plan a subject-scoped sync without writing.
    pub fn preview_scoped(
        &self,
        scope: &Scope,
        desired: &TripleSet,
        explicit_removals: &TripleSet,
    ) -> SyncResult<Preview> {
        let (existing, fetch_degraded) = self.fetch_existing(scope)?;
        Ok(Preview {
            plan: plan_scoped(desired, &existing, explicit_removals),
            fetch_degraded,
        })
    }

    /// Make `scope` hold exactly `desired`.
    pub fn sync_full(&self, scope: &Scope, desired: &TripleSet) -> SyncResult<SyncReport> {
        tracing::info!(scope = %scope, desired = desired.len(), "syncing (full)");
        let (existing, degraded) = self.fetch_existing(scope)?;
        let plan = plan_full(desired, &existing);
        Ok(self.apply_plan(scope, &plan, degraded))
    }

    /// Replace the facts of the subjects in `desired`, leave every other
    /// subject untouched, and retract `explicit_removals`.
    pub fn sync_scoped(
        &self,
        scope: &Scope,
        desired: &TripleSet,
        explicit_removals: &TripleSet,
    ) -> SyncResult<SyncReport> {
        tracing::info!(
            scope = %scope,
            desired = desired.len(),
            explicit_removals = explicit_removals.len(),
            "syncing (subject-scoped)"
        );
        let (existing, degraded) = self.fetch_existing(scope)?;
        let plan = plan_scoped(desired, &existing, explicit_removals);
        Ok(self.apply_plan(scope, &plan, degraded))
    }

    /// Execute a plan: additions first, then removals.
    pub fn apply_plan(&self, scope: &Scope, plan: &UpdatePlan, fetch_degraded: bool) -> SyncReport {
        let mut report = SyncReport {
            scope: scope.as_str().to_string(),
            policy: plan.policy,
            added: 0,
            removed: 0,
            planned_add: plan.to_add.len(),
            planned_remove: plan.to_remove.len(),
            failed_batches: Vec::new(),
            fetch_degraded,
        };

        if plan.is_noop() {
            tracing::info!(scope = %scope, "no updates");
            return report;
        }

        if !plan.to_add.is_empty() {
            tracing::info!(scope = %scope, count = plan.to_add.len(), "will add triples");
            let outcome = self
                .executor
                .apply(&self.store, scope, &plan.to_add, BatchOp::Insert);
            report.added = outcome.applied;
            report.failed_batches.extend(outcome.failures);
            tracing::info!(scope = %scope, count = report.added, "added triples");
        }

        if !plan.to_remove.is_empty() {
            tracing::info!(scope = %scope, count = plan.to_remove.len(), "will remove triples");
            let outcome = self
                .executor
                .apply(&self.store, scope, &plan.to_remove, BatchOp::Remove);
            report.removed = outcome.applied;
            report.failed_batches.extend(outcome.failures);
            tracing::info!(scope = %scope, count = report.removed, "removed triples");
        }

        if !report.failed_batches.is_empty() {
            tracing::warn!(
                scope = %scope,
                failed = report.failed_batches.len(),
                added = report.added,
                planned_add = report.planned_add,
                removed = report.removed,
                planned_remove = report.planned_remove,
                "sync finished with failed batches"
            );
        }
        report
    }
}
