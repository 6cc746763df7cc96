//! Route lookup.
//!
//! # Responsibilities
//! - Walk the route snapshot in cache order
//! - Skip routes with an invalid URL or a different method
//! - Return the first route accepted by any strategy, or an explicit no-match
//!
//! # Design Decisions
//! - Stateless: the snapshot is passed in, so lookups never lock
//! - Method comparison is exact and case-sensitive
//! - Strategy order is fixed at construction

use std::collections::HashMap;

use crate::httpfile::Route;
use crate::routing::matcher::{ExactMatch, MatchStrategy, StructuralMatch};

/// Variable name → value captured from the request.
pub type CapturedVariables = HashMap<String, String>;

/// The parts of an incoming request the engine matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRequest {
    pub method: String,
    pub path: String,
    /// Empty, or starts with `?`.
    pub query: String,
}

impl MatchRequest {
    /// `query` may be given with or without its leading `?`.
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        let query = query.into();
        let query = if query.is_empty() || query.starts_with('?') {
            query
        } else {
            format!("?{}", query)
        };

        Self {
            method: method.into(),
            path: path.into(),
            query,
        }
    }
}

/// Outcome of a lookup.
#[derive(Debug)]
pub enum MatchResult<'r> {
    Matched {
        route: &'r Route,
        variables: CapturedVariables,
        strategy: &'static str,
    },
    NoMatch,
}

impl<'r> MatchResult<'r> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    pub fn route(&self) -> Option<&'r Route> {
        match self {
            MatchResult::Matched { route, .. } => Some(route),
            MatchResult::NoMatch => None,
        }
    }

    pub fn variables(&self) -> Option<&CapturedVariables> {
        match self {
            MatchResult::Matched { variables, .. } => Some(variables),
            MatchResult::NoMatch => None,
        }
    }
}

/// Finds the first route accepting a request.
#[derive(Debug)]
pub struct RouteMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteMatcher {
    /// Exact literal match first, then structural.
    pub fn new() -> Self {
        Self::with_strategies(vec![Box::new(ExactMatch), Box::new(StructuralMatch)])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Look up `request` in `routes`, in order.
    pub fn match_request<'r>(
        &self,
        routes: &'r [Route],
        request: &MatchRequest,
    ) -> MatchResult<'r> {
        for route in routes {
            if !route.url_valid || route.method != request.method {
                continue;
            }

            for strategy in &self.strategies {
                if let Some(variables) = strategy.try_match(route, request) {
                    tracing::debug!(
                        file = %route.file_name,
                        url = %route.url,
                        strategy = strategy.name(),
                        "Route matched"
                    );
                    return MatchResult::Matched {
                        route,
                        variables,
                        strategy: strategy.name(),
                    };
                }
            }
        }

        MatchResult::NoMatch
    }
}
