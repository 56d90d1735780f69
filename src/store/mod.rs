//! Triple-store access confined to a single named graph.
//!
//! [`GraphStore`] is the narrow contract the sync engine depends on: read every
//! triple of a scope, insert a batch into it, remove a batch from it. Whatever
//! richer query surface a backend has stays behind this trait.
//!
//! - [`http::HttpStore`]: remote SPARQL query/update API over HTTP (`ureq`)
//! - [`memory::MemoryStore`]: in-process oxigraph store
//!
//! Both render their writes through [`update`], which only ever names the
//! scope it was given.

pub mod http;
pub mod memory;
pub mod results;
pub mod update;

use crate::error::StoreResult;
use crate::graph::{Scope, Triple, TripleSet};

pub use http::{HttpStore, HttpStoreConfig};
pub use memory::MemoryStore;

/// Read/write access to one named graph at a time.
pub trait GraphStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Every triple currently asserted in `scope`.
    fn fetch_all(&self, scope: &Scope) -> StoreResult<TripleSet>;

    /// Assert `triples` in `scope`, returning how many were sent.
    /// An empty slice returns `Ok(0)` without contacting the store.
    fn bulk_insert(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize>;

    /// Retract `triples` from `scope`, returning how many were sent.
    /// An empty slice returns `Ok(0)` without contacting the store.
    fn bulk_remove(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize>;
}

impl<S: GraphStore + ?Sized> GraphStore for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_all(&self, scope: &Scope) -> StoreResult<TripleSet> {
        (**self).fetch_all(scope)
    }

    fn bulk_insert(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        (**self).bulk_insert(scope, triples)
    }

    fn bulk_remove(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        (**self).bulk_remove(scope, triples)
    }
}

impl<S: GraphStore + ?Sized> GraphStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_all(&self, scope: &Scope) -> StoreResult<TripleSet> {
        (**self).fetch_all(scope)
    }

    fn bulk_insert(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        (**self).bulk_insert(scope, triples)
    }

    fn bulk_remove(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        (**self).bulk_remove(scope, triples)
    }
}
