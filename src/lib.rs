// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ngsync
//!
//! Keeps a named graph in a SPARQL triple store in line with a locally computed
//! set of triples. The store has no replace operation, so every run fetches
//! the graph, diffs it against the desired set, and issues the additions and
//! removals as size-bounded `INSERT DATA` / `DELETE DATA` batches.
//!
//! ## Architecture
//!
//! - **Graph model** (`graph`): `Triple`, `TripleSet`, `Scope`, diffing, N-Triples I/O
//! - **Stores** (`store`): `GraphStore` trait with HTTP and oxigraph backends
//! - **Planning** (`plan`): full-graph and subject-scoped policies
//! - **Batching** (`batch`): chunked writes with per-chunk failure isolation
//! - **Orchestration** (`sync`): `GraphSync`, one independent pass per call
//!
//! ## Library usage
//!
//! ```no_run
//! use ngsync::graph::{Scope, Triple, TripleSet};
//! use ngsync::store::{HttpStore, HttpStoreConfig};
//! use ngsync::sync::GraphSync;
//!
//! let store = HttpStore::new(
//!     HttpStoreConfig::vivo("https://vivo.example.edu")
//!         .with_credentials("root@example.edu", "pw"),
//! );
//! let scope = Scope::new("http://localhost/data/incites").unwrap();
//! let desired: TripleSet = [Triple::literal(
//!     "https://vivo.example.edu/individual/pub1",
//!     "http://webofscience.com/ontology/wos#hotPaper",
//!     "true",
//! )
//! .unwrap()]
//! .into_iter()
//! .collect();
//!
//! let report = GraphSync::new(store).sync_scoped(&scope, &desired, &TripleSet::new()).unwrap();
//! println!("added {} removed {}", report.added, report.removed);
//! ```

pub mod audit;
pub mod batch;
pub mod config;
pub mod error;
pub mod graph;
pub mod paths;
pub mod plan;
pub mod store;
pub mod sync;
