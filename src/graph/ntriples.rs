//! N-Triples input and output for [`TripleSet`].
//!
//! Parsing goes through oxigraph's `RdfParser`; writing uses the oxigraph term
//! display, sorted so dumps of the same set are byte-identical.

use std::io::{BufRead, Write};

use oxigraph::io::{RdfFormat, RdfParser};

use crate::error::{GraphError, GraphResult};

use super::{Triple, TripleSet};

/// Read an N-Triples document. Blank nodes are rejected.
pub fn read_ntriples(reader: impl BufRead) -> GraphResult<TripleSet> {
    let mut set = TripleSet::new();
    for quad in RdfParser::from_format(RdfFormat::NTriples).for_reader(reader) {
        let quad = quad.map_err(|e| GraphError::Parse {
            message: e.to_string(),
        })?;
        set.insert(Triple::from_quad(quad)?);
    }
    Ok(set)
}

pub fn read_ntriples_file(path: &std::path::Path) -> GraphResult<TripleSet> {
    let file = std::fs::File::open(path).map_err(|source| GraphError::Io { source })?;
    read_ntriples(std::io::BufReader::new(file))
}

/// Write one statement per line in sorted order.
pub fn write_ntriples(mut writer: impl Write, set: &TripleSet) -> GraphResult<()> {
    for triple in set.to_sorted_vec() {
        writeln!(writer, "{triple}").map_err(|source| GraphError::Io { source })?;
    }
    writer.flush().map_err(|source| GraphError::Io { source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<http://ex.org/A> <http://ex.org/p> "1" .
<http://ex.org/A> <http://ex.org/q> <http://ex.org/B> .
<http://ex.org/B> <http://ex.org/label> "Bee"@en .
<http://ex.org/A> <http://ex.org/p> "1" .
"#;

    #[test]
    fn read_collapses_duplicates() {
        let set = read_ntriples(DOC.as_bytes()).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Triple::literal("http://ex.org/A", "http://ex.org/p", "1").unwrap()));
    }

    #[test]
    fn read_rejects_blank_nodes() {
        let doc = "_:b0 <http://ex.org/p> \"1\" .\n";
        assert!(matches!(
            read_ntriples(doc.as_bytes()),
            Err(GraphError::UnsupportedTerm { .. })
        ));
    }

    #[test]
    fn read_reports_syntax_errors() {
        assert!(matches!(
            read_ntriples("<http://ex.org/A> oops .\n".as_bytes()),
            Err(GraphError::Parse { .. })
        ));
    }

    #[test]
    fn written_output_parses_back() {
        let set = read_ntriples(DOC.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_ntriples(&mut out, &set).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(read_ntriples(text.as_bytes()).unwrap(), set);
    }
}
