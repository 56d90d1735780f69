//! SPARQL text for reading and writing one scope.
//!
//! Terms are rendered with oxigraph's N-Triples display, which is valid
//! SPARQL term syntax, so no escaping is done here. Each function names exactly
//! one graph: the scope passed in.

use std::fmt::Write;

use crate::graph::{Scope, Triple};

/// `SELECT` every statement of the scope's graph.
pub fn select_all(scope: &Scope) -> String {
    format!("SELECT ?s ?p ?o WHERE {{ GRAPH {scope} {{ ?s ?p ?o }} }}")
}

/// `INSERT DATA` the triples into the scope's graph.
pub fn insert_data(scope: &Scope, triples: &[Triple]) -> String {
    data_block("INSERT DATA", scope, triples)
}

/// `DELETE DATA` the triples from the scope's graph.
pub fn delete_data(scope: &Scope, triples: &[Triple]) -> String {
    data_block("DELETE DATA", scope, triples)
}

fn data_block(verb: &str, scope: &Scope, triples: &[Triple]) -> String {
    // ~120 bytes per statement is typical for VIVO data.
    let mut out = String::with_capacity(64 + triples.len() * 120);
    let _ = writeln!(out, "{verb} {{");
    let _ = writeln!(out, "  GRAPH {scope} {{");
    for triple in triples {
        let _ = writeln!(out, "    {triple}");
    }
    out.push_str("  }\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope::new("http://localhost/data/incites").unwrap()
    }

    #[test]
    fn select_is_confined_to_scope() {
        let q = select_all(&scope());
        assert_eq!(
            q,
            "SELECT ?s ?p ?o WHERE { GRAPH <http://localhost/data/incites> { ?s ?p ?o } }"
        );
    }

    #[test]
    fn insert_wraps_statements_in_graph() {
        let triples = vec![
            Triple::literal("http://ex.org/A", "http://ex.org/p", "1").unwrap(),
            Triple::iri("http://ex.org/A", "http://ex.org/q", "http://ex.org/B").unwrap(),
        ];
        let u = insert_data(&scope(), &triples);
        assert!(u.starts_with("INSERT DATA {\n  GRAPH <http://localhost/data/incites> {\n"));
        assert!(u.contains("    <http://ex.org/A> <http://ex.org/p> \"1\" .\n"));
        assert!(u.contains("    <http://ex.org/A> <http://ex.org/q> <http://ex.org/B> .\n"));
        assert!(u.ends_with("  }\n}\n"));
        assert_eq!(u.matches("GRAPH").count(), 1);
    }

    #[test]
    fn delete_escapes_literals_through_oxigraph() {
        let triple =
            Triple::literal("http://ex.org/A", "http://ex.org/p", "a \"quoted\"\nline").unwrap();
        let triples = vec![triple];
        let u = delete_data(&scope(), &triples);
        assert!(u.starts_with("DELETE DATA {"));
        assert!(u.contains(r#""a \"quoted\"\nline""#));
    }
}
