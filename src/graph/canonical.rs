//! Value-canonical form for typed literals.
//!
//! Stores that inline XSD values (oxigraph natively, Jena/TDB for VIVO) hand
//! back `"true"^^xsd:boolean` for an inserted `"1"^^xsd:boolean`, and
//! `"5"^^xsd:integer` for `"05"^^xsd:int`. Triples compare lexically, so both
//! sides of a diff must be brought to the form the store reads back.
//!
//! Only the datatypes a store stores by value are rewritten; a lexical form
//! that does not parse is an opaque typed literal and is kept as is.

use std::str::FromStr;

use oxigraph::model::Literal;
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, GDay, GMonth,
    GMonthDay, GYear, GYearMonth, Integer, Time, YearMonthDuration,
};

const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Rewrite `literal` to the lexical form its value reads back as.
pub fn canonical_literal(literal: Literal) -> Literal {
    if literal.language().is_some() {
        return literal;
    }
    let Some(local) = literal.datatype().as_str().strip_prefix(XSD) else {
        return literal;
    };
    let value = literal.value();
    let canonical = match local {
        "boolean" => reparse::<Boolean>(value),
        "float" => reparse::<Float>(value),
        "double" => reparse::<Double>(value),
        "integer" | "byte" | "short" | "int" | "long" | "unsignedByte" | "unsignedShort"
        | "unsignedInt" | "unsignedLong" | "positiveInteger" | "negativeInteger"
        | "nonPositiveInteger" | "nonNegativeInteger" => reparse::<Integer>(value),
        "decimal" => reparse::<Decimal>(value),
        "dateTime" | "dateTimeStamp" => reparse::<DateTime>(value),
        "time" => reparse::<Time>(value),
        "date" => reparse::<Date>(value),
        "gYearMonth" => reparse::<GYearMonth>(value),
        "gYear" => reparse::<GYear>(value),
        "gMonthDay" => reparse::<GMonthDay>(value),
        "gDay" => reparse::<GDay>(value),
        "gMonth" => reparse::<GMonth>(value),
        "duration" => reparse::<Duration>(value),
        "yearMonthDuration" => reparse::<YearMonthDuration>(value),
        "dayTimeDuration" => reparse::<DayTimeDuration>(value),
        _ => None,
    };
    canonical.unwrap_or(literal)
}

fn reparse<T>(value: &str) -> Option<Literal>
where
    T: FromStr,
    Literal: From<T>,
{
    value.parse::<T>().ok().map(Literal::from)
}
