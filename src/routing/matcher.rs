//! Route matching strategies.
//!
//! # Responsibilities
//! - Literal match on the whole URL as written
//! - Segment-wise path match with variable capture
//! - Key-wise query match with variable capture
//!
//! # Design Decisions
//! - Method is checked by the router, strategies only look at the URL
//! - Path comparison is case-sensitive and positional
//! - Path segments are percent-decoded after splitting, so `%2F` stays inside one segment
//! - Query keys are case-insensitive and order-independent
//! - No regex in the hot path

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

use crate::httpfile::compiler::parse_query;
use crate::httpfile::Route;
use crate::routing::router::{CapturedVariables, MatchRequest};

/// A way of deciding whether a route's URL accepts a request.
pub trait MatchStrategy: Send + Sync + std::fmt::Debug {
    /// Short name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Returns the captured variables if the route matches.
    fn try_match(&self, route: &Route, request: &MatchRequest) -> Option<CapturedVariables>;
}

/// Matches when the definition URL equals the request path and query verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl MatchStrategy for ExactMatch {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn try_match(&self, route: &Route, request: &MatchRequest) -> Option<CapturedVariables> {
        let literal = route.url.strip_prefix(request.path.as_str()) == Some(request.query.as_str());
        let decomposed = route.url_path == request.path && route.query_string == request.query;
        (literal || decomposed).then(CapturedVariables::new)
    }
}

/// Matches path segments and query parameters, capturing `{{name}}` variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralMatch;

impl StructuralMatch {
    fn match_path(route: &Route, path: &str, captured: &mut CapturedVariables) -> bool {
        let incoming: Vec<&str> = path.split('/').collect();
        if incoming.len() != route.path_segments.len() {
            return false;
        }

        for (segment, value) in route.path_segments.iter().zip(incoming) {
            let value = decode_segment(value);
            match &segment.variable_name {
                Some(name) => capture(captured, name, &value),
                None if decode_segment(&segment.text) == value => {}
                None => return false,
            }
        }
        true
    }

    fn match_query(route: &Route, query: &str, captured: &mut CapturedVariables) -> bool {
        let incoming = parse_query(query);
        if incoming.len() != route.query_segments.len() {
            return false;
        }

        for (name, segment) in &route.query_segments {
            let Some(value) = incoming.get(name) else {
                return false;
            };
            match &segment.variable_name {
                Some(variable) => capture(captured, variable, value),
                None if &segment.text == value => {}
                None => return false,
            }
        }
        true
    }
}

impl MatchStrategy for StructuralMatch {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn try_match(&self, route: &Route, request: &MatchRequest) -> Option<CapturedVariables> {
        let mut captured = CapturedVariables::new();
        if Self::match_path(route, &request.path, &mut captured)
            && Self::match_query(route, &request.query, &mut captured)
        {
            Some(captured)
        } else {
            None
        }
    }
}

fn decode_segment(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

/// Record a capture; a repeated name overwrites the earlier value.
fn capture(captured: &mut CapturedVariables, name: &str, value: &str) {
    if let Some(previous) = captured.insert(name.to_string(), value.to_string()) {
        tracing::debug!(
            variable = %name,
            previous = %previous,
            value = %value,
            "Variable captured twice, keeping the later value"
        );
    }
}
