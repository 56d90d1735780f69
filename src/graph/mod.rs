//! RDF data model for synchronization.
//!
//! A [`Triple`] is an immutable (subject, predicate, object) fact whose terms are
//! oxigraph model values, so IRIs are validated once at construction and literal
//! escaping is always delegated to oxigraph. A [`Scope`] names the graph an
//! operation is confined to.
//!
//! Typed literals entering an [`Object`] through `From` are rewritten to their
//! value-canonical form (see [`canonical`]), so a fact compares equal to the one
//! a store reads back after inserting it.
//!
//! - [`set::TripleSet`]: unordered set of triples with set algebra
//! - [`diff`]: three-way partition of desired vs existing sets
//! - [`ntriples`]: N-Triples input/output

pub mod canonical;
pub mod diff;
pub mod ntriples;
pub mod set;

use std::cmp::Ordering;
use std::fmt;

use oxigraph::model::{GraphName, Literal, NamedNode, Quad, Term};

use crate::error::{GraphError, GraphResult};

pub use canonical::canonical_literal;
pub use diff::{DiffResult, diff};
pub use set::TripleSet;

/// Parse and validate an absolute IRI.
pub fn iri(value: impl Into<String>) -> GraphResult<NamedNode> {
    let value = value.into();
    NamedNode::new(value.clone()).map_err(|e| GraphError::InvalidIri {
        iri: value,
        message: e.to_string(),
    })
}

/// The named graph a synchronization operation reads from and writes to.
///
/// Every store call takes a `&Scope`; there is no way to address the default
/// graph or several graphs at once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(NamedNode);

impl Scope {
    pub fn new(value: impl Into<String>) -> GraphResult<Self> {
        iri(value).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn node(&self) -> &NamedNode {
        &self.0
    }

    pub fn graph_name(&self) -> GraphName {
        GraphName::from(self.0.clone())
    }
}

impl From<NamedNode> for Scope {
    fn from(node: NamedNode) -> Self {
        Self(node)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Object position of a triple: an IRI or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Iri(NamedNode),
    Literal(Literal),
}

impl Object {
    fn sort_key(&self) -> (u8, &str, &str, &str) {
        match self {
            Object::Iri(node) => (0, node.as_str(), "", ""),
            Object::Literal(lit) => (
                1,
                lit.value(),
                lit.datatype().as_str(),
                lit.language().unwrap_or(""),
            ),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Object::Iri(node) => Term::from(node.clone()),
            Object::Literal(lit) => Term::from(lit.clone()),
        }
    }
}

impl Ord for Object {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Object {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<NamedNode> for Object {
    fn from(node: NamedNode) -> Self {
        Object::Iri(node)
    }
}

impl From<Literal> for Object {
    fn from(lit: Literal) -> Self {
        Object::Literal(canonical_literal(lit))
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Iri(node) => write!(f, "{node}"),
            Object::Literal(lit) => write!(f, "{lit}"),
        }
    }
}

/// A single fact. Equality and hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: NamedNode,
    pub predicate: NamedNode,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: NamedNode, predicate: NamedNode, object: impl Into<Object>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }

    /// Build a triple whose three positions are IRIs.
    pub fn iri(subject: &str, predicate: &str, object: &str) -> GraphResult<Self> {
        Ok(Self::new(iri(subject)?, iri(predicate)?, iri(object)?))
    }

    /// Build a triple with a plain (`xsd:string`) literal object.
    pub fn literal(subject: &str, predicate: &str, value: &str) -> GraphResult<Self> {
        Ok(Self::new(
            iri(subject)?,
            iri(predicate)?,
            Literal::new_simple_literal(value),
        ))
    }

    /// Convert oxigraph terms, rejecting blank nodes and nested triples.
    pub fn from_terms(subject: Term, predicate: NamedNode, object: Term) -> GraphResult<Self> {
        let subject = match subject {
            Term::NamedNode(node) => node,
            other => {
                return Err(GraphError::UnsupportedTerm {
                    term: other.to_string(),
                });
            }
        };
        let object = match object {
            Term::NamedNode(node) => Object::Iri(node),
            Term::Literal(lit) => Object::from(lit),
            other => {
                return Err(GraphError::UnsupportedTerm {
                    term: other.to_string(),
                });
            }
        };
        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    /// Convert a parsed or stored quad, dropping its graph name.
    pub fn from_quad(quad: Quad) -> GraphResult<Self> {
        Self::from_terms(Term::from(quad.subject), quad.predicate, quad.object)
    }

    /// Place this triple in the given scope.
    pub fn to_quad(&self, scope: &Scope) -> Quad {
        Quad::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.to_term(),
            scope.graph_name(),
        )
    }
}

impl Ord for Triple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.subject
            .as_str()
            .cmp(other.subject.as_str())
            .then_with(|| self.predicate.as_str().cmp(other.predicate.as_str()))
            .then_with(|| self.object.cmp(&other.object))
    }
}

impl PartialOrd for Triple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// N-Triples statement form, without trailing newline.
impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use oxigraph::model::BlankNode;

    #[test]
    fn scope_rejects_relative_iri() {
        assert!(matches!(
            Scope::new("not an iri"),
            Err(GraphError::InvalidIri { .. })
        ));
        let scope = Scope::new("http://localhost/data/incites").unwrap();
        assert_eq!(scope.to_string(), "<http://localhost/data/incites>");
    }

    #[test]
    fn structural_equality() {
        let a = Triple::literal("http://ex.org/A", "http://ex.org/p", "1").unwrap();
        let b = Triple::literal("http://ex.org/A", "http://ex.org/p", "1").unwrap();
        let c = Triple::iri("http://ex.org/A", "http://ex.org/p", "http://ex.org/1").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn language_tag_participates_in_equality() {
        let s = iri("http://ex.org/A").unwrap();
        let p = iri("http://ex.org/label").unwrap();
        let plain = Triple::new(s.clone(), p.clone(), Literal::new_simple_literal("Paris"));
        let tagged = Triple::new(
            s,
            p,
            Literal::new_language_tagged_literal("Paris", "fr").unwrap(),
        );
        assert_ne!(plain, tagged);
    }

    #[test]
    fn typed_literals_compare_by_value() {
        use oxigraph::model::vocab::xsd;

        let s = iri("http://ex.org/A").unwrap();
        let p = iri("http://ex.org/hot").unwrap();
        let digit = Triple::new(
            s.clone(),
            p.clone(),
            Literal::new_typed_literal("1", xsd::BOOLEAN),
        );
        let word = Triple::from_terms(
            Term::from(s),
            p,
            Term::from(Literal::new_typed_literal("true", xsd::BOOLEAN)),
        )
        .unwrap();
        assert_eq!(digit, word);
        let rendered = digit.to_string();
        assert!(rendered.contains(r#""true"^^<http://www.w3.org/2001/XMLSchema#boolean>"#));
    }

    #[test]
    fn display_is_ntriples() {
        let t = Triple::literal("http://ex.org/A", "http://ex.org/p", "say \"hi\"").unwrap();
        assert_eq!(
            t.to_string(),
            r#"<http://ex.org/A> <http://ex.org/p> "say \"hi\"" ."#
        );
    }

    #[test]
    fn blank_nodes_are_rejected() {
        let p = iri("http://ex.org/p").unwrap();
        let err = Triple::from_terms(
            Term::from(BlankNode::default()),
            p,
            Term::from(Literal::new_simple_literal("x")),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::UnsupportedTerm { .. }));
    }

    #[test]
    fn quad_conversion_keeps_terms() {
        let scope = Scope::new("http://ex.org/graph").unwrap();
        let t = Triple::iri("http://ex.org/A", "http://ex.org/p", "http://ex.org/B").unwrap();
        let quad = t.to_quad(&scope);
        assert_eq!(quad.graph_name, scope.graph_name());
        assert_eq!(Triple::from_quad(quad).unwrap(), t);
    }

    #[test]
    fn ordering_is_by_subject_then_predicate_then_object() {
        let a = Triple::literal("http://ex.org/A", "http://ex.org/q", "1").unwrap();
        let b = Triple::literal("http://ex.org/B", "http://ex.org/p", "1").unwrap();
        let c = Triple::iri("http://ex.org/A", "http://ex.org/q", "http://ex.org/z").unwrap();
        let mut v = vec![b.clone(), a.clone(), c.clone()];
        v.sort();
        assert_eq!(v, vec![c, a, b]);
    }
}
