//! Structural matching over XML and JSON candidates.
//!
//! Candidates are parsed per evaluation; anything that fails to parse
//! simply does not match. No parse failure escapes as an error.

use serde_json_path::JsonPath;
use sxd_document::parser;
use sxd_xpath::{evaluate_xpath, Value};

/// Evaluate an XPath query against a candidate XML document.
///
/// Truthiness follows XPath boolean conversion: a boolean result is
/// taken as-is, a node-set matches when non-empty, a number when
/// non-zero and not NaN, a string when non-empty.
pub(crate) fn xml_query_matches(candidate: &str, query: &str) -> bool {
    let package = match parser::parse(candidate) {
        Ok(package) => package,
        Err(_) => return false,
    };
    let document = package.as_document();

    match evaluate_xpath(&document, query) {
        Ok(Value::Boolean(b)) => b,
        Ok(Value::Number(n)) => n != 0.0 && !n.is_nan(),
        Ok(Value::String(s)) => !s.is_empty(),
        Ok(Value::Nodeset(nodes)) => nodes.size() > 0,
        Err(_) => false,
    }
}

/// Evaluate a JSONPath query against a candidate JSON document.
///
/// Matches when the query selects at least one node.
pub(crate) fn json_query_matches(candidate: &str, query: &JsonPath) -> bool {
    match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(json) => !query.query(&json).is_empty(),
        Err(_) => false,
    }
}
