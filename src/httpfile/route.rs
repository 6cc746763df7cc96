//! Compiled route definitions.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::httpfile::compiler::{compile_path, compile_query};
use crate::httpfile::url::validate_url;

/// Opening and closing markers of a named placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub open: &'static str,
    pub close: &'static str,
}

/// Placeholder convention for hosts, path segments and query values.
pub const PATH_PLACEHOLDER: Delimiters = Delimiters {
    open: "{{",
    close: "}}",
};

/// Placeholder convention for response bodies.
pub const BODY_PLACEHOLDER: Delimiters = Delimiters {
    open: "{",
    close: "}",
};

impl Delimiters {
    /// Returns the placeholder name if `text` is exactly one placeholder.
    ///
    /// Names are restricted to ASCII letters, digits and `_`.
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let name = text.strip_prefix(self.open)?.strip_suffix(self.close)?;
        is_placeholder_name(name).then_some(name)
    }
}

pub(crate) fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// One `/`-delimited path component or one query value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub variable_name: Option<String>,
}

impl Segment {
    /// Classify `text` using the URL placeholder convention.
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            variable_name: PATH_PLACEHOLDER.strip(text).map(str::to_string),
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            variable_name: None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.variable_name.is_some()
    }
}

/// Response headers: case-insensitive names, definition order preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of an existing header with the
    /// same name but keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl serde::Serialize for HeaderList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A compiled request/response definition.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    /// Origin file, for diagnostics.
    pub file_name: String,
    pub method: String,
    /// URL exactly as written in the definition.
    pub url: String,
    /// Invalid routes are kept for listing but never matched.
    pub url_valid: bool,
    pub url_host: Option<String>,
    pub url_path: String,
    pub path_segments: Vec<Segment>,
    pub query_string: String,
    /// Keyed by lowercased parameter name.
    pub query_segments: BTreeMap<String, Segment>,
    pub status_code: u16,
    pub headers: HeaderList,
    pub body: String,
}

impl Route {
    /// Build a route from its request line, compiling the URL.
    ///
    /// An unparseable URL yields a route with `url_valid == false` and an
    /// empty structure.
    pub fn new(
        file_name: impl Into<String>,
        method: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let url = url.into();
        let parts = validate_url(&url);
        let url_valid = parts.is_some();
        let parts = parts.unwrap_or_default();

        Self {
            file_name: file_name.into(),
            method: method.into(),
            path_segments: compile_path(&parts.path),
            query_segments: compile_query(&parts.query),
            url,
            url_valid,
            url_host: parts.host,
            url_path: parts.path,
            query_string: parts.query,
            status_code: 200,
            headers: HeaderList::new(),
            body: String::new(),
        }
    }

    /// Variable names declared by the path and query, in path-then-query order.
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.path_segments
            .iter()
            .chain(self.query_segments.values())
            .filter_map(|s| s.variable_name.as_deref())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.method, self.url, self.status_code)?;
        for (name, value) in self.headers.iter() {
            writeln!(f, "{}: {}", name, value)?;
        }
        write!(f, "{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_classification() {
        let var = Segment::parse("{{userId}}");
        assert!(var.is_variable());
        assert_eq!(var.variable_name.as_deref(), Some("userId"));

        assert!(!Segment::parse("users").is_variable());
        assert!(!Segment::parse("{userId}").is_variable());
        assert!(!Segment::parse("{{user id}}").is_variable());
        assert!(!Segment::parse("{{}}").is_variable());
        assert!(!Segment::parse("x{{id}}").is_variable());
    }

    #[test]
    fn test_header_list_is_case_insensitive_and_ordered() {
        let mut headers = HeaderList::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("X-Trace", "1");
        headers.insert("content-type", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        let names: Vec<_> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Content-Type", "X-Trace"]);
    }

    #[test]
    fn test_route_compiles_url() {
        let route = Route::new("a.http", "GET", "http://anyurl.com/test3/{{paramId}}?param=value");
        assert!(route.url_valid);
        assert_eq!(route.url_host.as_deref(), Some("anyurl.com"));
        assert_eq!(route.url_path, "/test3/{{paramId}}");
        assert_eq!(route.query_string, "?param=value");
        assert_eq!(route.path_segments.len(), route.url_path.split('/').count());
        assert_eq!(route.variable_names().collect::<Vec<_>>(), vec!["paramId"]);
    }

    #[test]
    fn test_invalid_url_is_kept_but_flagged() {
        let route = Route::new("a.http", "GET", "ftp://nope");
        assert!(!route.url_valid);
        assert_eq!(route.status_code, 200);
    }

    #[test]
    fn test_route_serializes_headers_as_ordered_map() {
        let mut route = Route::new("a.http", "GET", "/users/{{id}}");
        route.headers.insert("X-Trace", "1");
        route.headers.insert("Content-Type", "application/json");

        let json = serde_json::to_string(&route).unwrap();
        assert!(json.contains(r#""headers":{"X-Trace":"1","Content-Type":"application/json"}"#));

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(value["path_segments"][2]["variable_name"], "id");
    }
}
