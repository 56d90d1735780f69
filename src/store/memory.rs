//! In-process triple store backed by oxigraph.
//!
//! Reads go straight to the quads of the scope's named graph; writes execute
//! the same `INSERT DATA` / `DELETE DATA` text the HTTP client sends, so both
//! backends share one rendering path.

use oxigraph::model::GraphNameRef;
use oxigraph::store::Store;

use crate::error::{StoreError, StoreResult};
use crate::graph::{Scope, Triple, TripleSet};

use super::GraphStore;
use super::update;

/// oxigraph-backed [`GraphStore`], in memory or on disk.
#[derive(Clone)]
pub struct MemoryStore {
    store: Store,
}

impl MemoryStore {
    /// Create a new in-memory store (no persistence).
    pub fn in_memory() -> StoreResult<Self> {
        let store = Store::new().map_err(|e| StoreError::Backend {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Open or create a persistent store at the given path.
    pub fn open(path: &std::path::Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path).map_err(|e| StoreError::Backend {
            message: format!("failed to create oxigraph directory: {e}"),
        })?;
        let store = Store::open(path).map_err(|e| StoreError::Backend {
            message: format!("failed to open oxigraph store at {}: {e}", path.display()),
        })?;
        Ok(Self { store })
    }

    /// Insert a set directly, bypassing SPARQL.
    pub fn load(&self, scope: &Scope, triples: &TripleSet) -> StoreResult<()> {
        for triple in triples {
            self.store
                .insert(&triple.to_quad(scope))
                .map_err(|e| StoreError::Backend {
                    message: format!("insert failed: {e}"),
                })?;
        }
        Ok(())
    }

    /// Current contents of a scope.
    pub fn triples(&self, scope: &Scope) -> StoreResult<TripleSet> {
        let graph = GraphNameRef::NamedNode(scope.node().as_ref());
        let mut set = TripleSet::new();
        for quad in self.store.quads_for_pattern(None, None, None, Some(graph)) {
            let quad = quad.map_err(|e| StoreError::Backend {
                message: format!("quad scan failed: {e}"),
            })?;
            match Triple::from_quad(quad) {
                Ok(triple) => {
                    set.insert(triple);
                }
                Err(e) => tracing::debug!(error = %e, "skipping stored quad"),
            }
        }
        Ok(set)
    }

    /// Number of quads across all graphs.
    pub fn len(&self) -> StoreResult<usize> {
        self.store.len().map_err(|e| StoreError::Backend {
            message: format!("len failed: {e}"),
        })
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|n| n == 0)
    }

    fn run_update(&self, text: &str) -> StoreResult<()> {
        self.store.update(text).map_err(|e| StoreError::Backend {
            message: format!("SPARQL update failed: {e}"),
        })
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish()
    }
}

impl GraphStore for MemoryStore {
    fn name(&self) -> &'static str {
        "oxigraph"
    }

    fn fetch_all(&self, scope: &Scope) -> StoreResult<TripleSet> {
        self.triples(scope)
    }

    fn bulk_insert(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        if triples.is_empty() {
            return Ok(0);
        }
        self.run_update(&update::insert_data(scope, triples))?;
        Ok(triples.len())
    }

    fn bulk_remove(&self, scope: &Scope, triples: &[Triple]) -> StoreResult<usize> {
        if triples.is_empty() {
            return Ok(0);
        }
        self.run_update(&update::delete_data(scope, triples))?;
        Ok(triples.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, p: &str, o: &str) -> Triple {
        Triple::literal(
            &format!("http://ex.org/{s}"),
            &format!("http://ex.org/{p}"),
            o,
        )
        .unwrap()
    }

    #[test]
    fn writes_stay_inside_their_scope() {
        let store = MemoryStore::in_memory().unwrap();
        let ours = Scope::new("http://ex.org/graph/ours").unwrap();
        let theirs = Scope::new("http://ex.org/graph/theirs").unwrap();

        let shared = t("A", "p", "1");
        store
            .load(&theirs, &[shared.clone()].into_iter().collect())
            .unwrap();

        assert_eq!(store.bulk_insert(&ours, &[shared.clone(), t("A", "q", "3")]).unwrap(), 2);
        assert_eq!(store.bulk_remove(&ours, &[shared.clone()]).unwrap(), 1);

        assert_eq!(store.fetch_all(&ours).unwrap().to_sorted_vec(), vec![t("A", "q", "3")]);
        assert_eq!(store.fetch_all(&theirs).unwrap().to_sorted_vec(), vec![shared]);
    }

    #[test]
    fn empty_scope_fetches_empty_set() {
        let store = MemoryStore::in_memory().unwrap();
        let scope = Scope::new("http://ex.org/graph/none").unwrap();
        assert!(store.fetch_all(&scope).unwrap().is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn persistent_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let scope = Scope::new("http://ex.org/graph").unwrap();
        {
            let store = MemoryStore::open(dir.path()).unwrap();
            store.bulk_insert(&scope, &[t("A", "p", "1")]).unwrap();
        }
        let store = MemoryStore::open(dir.path()).unwrap();
        assert_eq!(store.fetch_all(&scope).unwrap().len(), 1);
    }
}
