//! Decoding of SPARQL 1.1 Query Results JSON into triples.

use std::collections::HashMap;

use oxigraph::model::{Literal, Term};
use serde::Deserialize;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Triple, TripleSet, iri};

/// Top-level `application/sparql-results+json` document.
#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    pub results: ResultBindings,
}

#[derive(Debug, Deserialize)]
pub struct ResultBindings {
    pub bindings: Vec<HashMap<String, Binding>>,
}

/// One bound value. `type` is `uri`, `literal`, `typed-literal` or `bnode`.
#[derive(Debug, Clone, Deserialize)]
pub struct Binding {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "xml:lang")]
    pub lang: Option<String>,
    pub datatype: Option<String>,
}

impl Binding {
    pub fn to_term(&self) -> GraphResult<Term> {
        match self.kind.as_str() {
            "uri" => Ok(Term::from(iri(self.value.as_str())?)),
            "literal" | "typed-literal" => {
                let lit = match (&self.lang, &self.datatype) {
                    (Some(lang), _) => Literal::new_language_tagged_literal(
                        self.value.as_str(),
                        lang.as_str(),
                    )
                    .map_err(|e| GraphError::InvalidLiteral {
                        value: self.value.clone(),
                        message: e.to_string(),
                    })?,
                    (None, Some(datatype)) => {
                        Literal::new_typed_literal(self.value.as_str(), iri(datatype.as_str())?)
                    }
                    (None, None) => Literal::new_simple_literal(self.value.as_str()),
                };
                Ok(Term::from(lit))
            }
            _ => Err(GraphError::UnsupportedTerm {
                term: format!("{} {}", self.kind, self.value),
            }),
        }
    }
}

impl SparqlResults {
    /// Collect `?s ?p ?o` rows into a set.
    ///
    /// Rows that cannot be represented (blank nodes, malformed IRIs, missing
    /// variables) are skipped and never surface as removable triples.
    pub fn into_triples(self) -> TripleSet {
        let mut set = TripleSet::with_capacity(self.results.bindings.len());
        let mut skipped = 0usize;
        for row in self.results.bindings {
            match row_to_triple(&row) {
                Ok(Some(triple)) => {
                    set.insert(triple);
                }
                Ok(None) => skipped += 1,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping result row");
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, kept = set.len(), "some result rows were not triples");
        }
        set
    }
}

fn row_to_triple(row: &HashMap<String, Binding>) -> GraphResult<Option<Triple>> {
    let (Some(s), Some(p), Some(o)) = (row.get("s"), row.get("p"), row.get("o")) else {
        return Ok(None);
    };
    let predicate = match p.to_term()? {
        Term::NamedNode(node) => node,
        other => {
            return Err(GraphError::UnsupportedTerm {
                term: other.to_string(),
            });
        }
    };
    Triple::from_terms(s.to_term()?, predicate, o.to_term()?).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "head": { "vars": ["s", "p", "o"] },
      "results": { "bindings": [
        { "s": { "type": "uri", "value": "http://ex.org/A" },
          "p": { "type": "uri", "value": "http://ex.org/p" },
          "o": { "type": "literal", "value": "1" } },
        { "s": { "type": "uri", "value": "http://ex.org/A" },
          "p": { "type": "uri", "value": "http://ex.org/label" },
          "o": { "type": "literal", "value": "Ay", "xml:lang": "en" } },
        { "s": { "type": "uri", "value": "http://ex.org/A" },
          "p": { "type": "uri", "value": "http://ex.org/count" },
          "o": { "type": "typed-literal", "value": "7",
                 "datatype": "http://www.w3.org/2001/XMLSchema#integer" } },
        { "s": { "type": "bnode", "value": "b0" },
          "p": { "type": "uri", "value": "http://ex.org/p" },
          "o": { "type": "literal", "value": "2" } },
        { "s": { "type": "uri", "value": "http://ex.org/B" },
          "p": { "type": "uri", "value": "http://ex.org/p" } }
      ] }
    }"#;

    #[test]
    fn decodes_literals_and_skips_unrepresentable_rows() {
        let results: SparqlResults = serde_json::from_str(BODY).unwrap();
        let set = results.into_triples();
        assert_eq!(set.len(), 3);

        assert!(set.contains(&Triple::literal("http://ex.org/A", "http://ex.org/p", "1").unwrap()));

        let tagged = Triple::new(
            iri("http://ex.org/A").unwrap(),
            iri("http://ex.org/label").unwrap(),
            Literal::new_language_tagged_literal("Ay", "en").unwrap(),
        );
        assert!(set.contains(&tagged));

        let typed = Triple::new(
            iri("http://ex.org/A").unwrap(),
            iri("http://ex.org/count").unwrap(),
            Literal::new_typed_literal(
                "7",
                iri("http://www.w3.org/2001/XMLSchema#integer").unwrap(),
            ),
        );
        assert!(set.contains(&typed));
    }

    #[test]
    fn fetched_typed_literals_match_desired_by_value() {
        let body = r#"{"head":{"vars":["s","p","o"]},"results":{"bindings":[
          { "s": { "type": "uri", "value": "http://ex.org/A" },
            "p": { "type": "uri", "value": "http://ex.org/hot" },
            "o": { "type": "typed-literal", "value": "true",
                   "datatype": "http://www.w3.org/2001/XMLSchema#boolean" } }
        ]}}"#;
        let results: SparqlResults = serde_json::from_str(body).unwrap();
        let desired = Triple::new(
            iri("http://ex.org/A").unwrap(),
            iri("http://ex.org/hot").unwrap(),
            Literal::new_typed_literal(
                "1",
                iri("http://www.w3.org/2001/XMLSchema#boolean").unwrap(),
            ),
        );
        assert!(results.into_triples().contains(&desired));
    }

    #[test]
    fn empty_bindings_give_empty_set() {
        let body = r#"{"head":{"vars":["s","p","o"]},"results":{"bindings":[]}}"#;
        let results: SparqlResults = serde_json::from_str(body).unwrap();
        assert!(results.into_triples().is_empty());
    }

    #[test]
    fn bnode_binding_is_unsupported() {
        let b = Binding {
            kind: "bnode".into(),
            value: "b1".into(),
            lang: None,
            datatype: None,
        };
        assert!(matches!(b.to_term(), Err(GraphError::UnsupportedTerm { .. })));
    }
}
