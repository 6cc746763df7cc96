//! Request URL validation and decomposition.
//!
//! Two forms are accepted:
//! - path-only: `/a/b?x=1`
//! - host form: `[http[s]://]host[:port][/path][?query]`, where `host` is a
//!   hostname or a whole `{{name}}` placeholder
//!
//! Anything else is rejected, so every valid URL has a path starting with `/`.

use regex::Regex;
use std::sync::OnceLock;

static HOST_FORM: OnceLock<Regex> = OnceLock::new();

fn host_form() -> &'static Regex {
    HOST_FORM.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:https?://)?",
            r"(?P<host>",
            r"(?:\{\{[A-Za-z0-9_]+\}\}|[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?)",
            r"(?::[0-9]{1,5})?)",
            r"(?P<path>/[^?#\s]*)?",
            r"(?P<query>\?[^#\s]*)?$",
        ))
        .expect("host form pattern is valid")
    })
}

/// The structural parts of a valid definition URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub host: Option<String>,
    /// Always starts with `/`.
    pub path: String,
    /// Empty, or starts with `?`.
    pub query: String,
}

/// Validate `url` and split it into host, path and query.
///
/// Returns `None` for empty or malformed input.
pub fn validate_url(url: &str) -> Option<UrlParts> {
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return None;
    }

    if url.starts_with('/') {
        let (path, query) = split_query(url);
        return Some(UrlParts {
            host: None,
            path: path.to_string(),
            query: query.to_string(),
        });
    }

    let caps = host_form().captures(url)?;
    Some(UrlParts {
        host: caps.name("host").map(|m| m.as_str().to_string()),
        path: caps
            .name("path")
            .map_or_else(|| "/".to_string(), |m| m.as_str().to_string()),
        query: caps
            .name("query")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

/// Split at the first `?`; the query part keeps its `?`.
pub(crate) fn split_query(url: &str) -> (&str, &str) {
    match url.find('?') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    }
}
