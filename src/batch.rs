//! Size-bounded batch execution of inserts and removes.
//!
//! A change set is split into chunks of at most `batch_size` triples and each
//! chunk is one store call. Chunks are independent: a failed chunk is logged,
//! counted and not retried, and the remaining chunks still run. Counts only
//! include chunks the store accepted.

use std::fmt;
use std::num::NonZeroUsize;

use rayon::prelude::*;
use serde::Serialize;

use crate::graph::{Scope, Triple, TripleSet};
use crate::store::GraphStore;

/// Default number of triples per store call.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(n) => n,
    None => unreachable!(),
};

/// Which write a batch performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOp {
    Insert,
    Remove,
}

impl fmt::Display for BatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOp::Insert => write!(f, "insert"),
            BatchOp::Remove => write!(f, "remove"),
        }
    }
}

/// How chunks are dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// One chunk at a time, in order.
    #[default]
    Sequential,
    /// Chunks are dispatched on the rayon thread pool.
    Parallel,
}

/// A chunk the store rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub op: BatchOp,
    pub index: usize,
    pub size: usize,
    pub message: String,
}

/// Accounting for one [`BatchExecutor::apply`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Triples handed to the executor.
    pub attempted: usize,
    /// Triples the store confirmed, summed over successful chunks.
    pub applied: usize,
    /// Chunks issued.
    pub batches: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    fn merge(mut self, other: BatchOutcome) -> BatchOutcome {
        self.attempted += other.attempted;
        self.applied += other.applied;
        self.batches += other.batches;
        self.failures.extend(other.failures);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Splits change sets into chunks and issues one store call per chunk.
#[derive(Debug, Clone, Copy)]
pub struct BatchExecutor {
    batch_size: NonZeroUsize,
    mode: BatchMode,
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchExecutor {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            mode: BatchMode::Sequential,
        }
    }

    pub fn with_mode(mut self, mode: BatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Apply `op` for every triple of `triples` in `scope`.
    ///
    /// Triples are sorted first so chunk boundaries are reproducible across
    /// runs. An empty set makes no store call.
    pub fn apply<S: GraphStore + ?Sized>(
        &self,
        store: &S,
        scope: &Scope,
        triples: &TripleSet,
        op: BatchOp,
    ) -> BatchOutcome {
        if triples.is_empty() {
            return BatchOutcome::default();
        }
        let ordered = triples.to_sorted_vec();
        let size = self.batch_size.get();

        let outcome = match self.mode {
            BatchMode::Sequential => ordered
                .chunks(size)
                .enumerate()
                .map(|(index, chunk)| run_chunk(store, scope, op, index, chunk))
                .fold(BatchOutcome::default(), BatchOutcome::merge),
            BatchMode::Parallel => ordered
                .par_chunks(size)
                .enumerate()
                .map(|(index, chunk)| run_chunk(store, scope, op, index, chunk))
                .reduce(BatchOutcome::default, BatchOutcome::merge),
        };

        tracing::debug!(
            scope = %scope,
            %op,
            attempted = outcome.attempted,
            applied = outcome.applied,
            batches = outcome.batches,
            failed = outcome.failures.len(),
            "batches applied"
        );
        outcome
    }
}

fn run_chunk<S: GraphStore + ?Sized>(
    store: &S,
    scope: &Scope,
    op: BatchOp,
    index: usize,
    chunk: &[Triple],
) -> BatchOutcome {
    let result = match op {
        BatchOp::Insert => store.bulk_insert(scope, chunk),
        BatchOp::Remove => store.bulk_remove(scope, chunk),
    };
    match result {
        Ok(applied) => BatchOutcome {
            attempted: chunk.len(),
            applied,
            batches: 1,
            failures: Vec::new(),
        },
        Err(e) => {
            tracing::warn!(
                scope = %scope,
                %op,
                batch = index,
                size = chunk.len(),
                error = %e,
                "batch failed, continuing with remaining batches"
            );
            BatchOutcome {
                attempted: chunk.len(),
                applied: 0,
                batches: 1,
                failures: vec![BatchFailure {
                    op,
                    index,
                    size: chunk.len(),
                    message: e.to_string(),
                }],
            }
        }
    }
}
