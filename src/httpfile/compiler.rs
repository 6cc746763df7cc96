//! Derive matchable structure from a decomposed URL.

use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::httpfile::route::Segment;

/// Split a path on `/`, classifying each segment.
///
/// An absolute path yields a leading empty segment; incoming request paths
/// are split the same way so counts line up positionally.
pub fn compile_path(url_path: &str) -> Vec<Segment> {
    url_path.split('/').map(Segment::parse).collect()
}

/// Compile a query string into lowercased parameter name → value segment.
pub fn compile_query(query_string: &str) -> BTreeMap<String, Segment> {
    parse_query(query_string)
        .into_iter()
        .map(|(name, value)| (name, Segment::parse(&value)))
        .collect()
}

/// Split a query string (with or without the leading `?`) into lowercased
/// name → decoded value. Names and values are form-decoded (`+` is a space).
/// Empty pairs are skipped, a pair without `=` has an empty value and a
/// repeated name keeps its last value.
pub fn parse_query(query_string: &str) -> BTreeMap<String, String> {
    let query = query_string.strip_prefix('?').unwrap_or(query_string);
    form_urlencoded::parse(query.as_bytes())
        .map(|(name, value)| (name.to_lowercase(), value.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        let segments = compile_path("/test3/{{paramId}}/details");
        let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["", "test3", "{{paramId}}", "details"]);
        assert!(segments[2].is_variable());
        assert!(!segments[3].is_variable());
    }

    #[test]
    fn test_query_segments() {
        let query = compile_query("?Param={{pv1}}&flag&mode=full");
        assert_eq!(query.len(), 3);
        assert_eq!(query["param"].variable_name.as_deref(), Some("pv1"));
        assert_eq!(query["flag"].text, "");
        assert_eq!(query["mode"], Segment::literal("full"));
    }

    #[test]
    fn test_parse_query_edge_cases() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());

        let parsed = parse_query("a=1&&b=x=y&A=2");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["a"], "2");
        assert_eq!(parsed["b"], "x=y");

        let decoded = parse_query("?Q=a+b%26c&name=caf%C3%A9");
        assert_eq!(decoded["q"], "a b&c");
        assert_eq!(decoded["name"], "café");
    }
}
