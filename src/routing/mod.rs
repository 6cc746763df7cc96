//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query)
//!     → router.rs (walk the route snapshot in order)
//!     → matcher.rs (try each match strategy against a route)
//!     → Return: matched Route + captured variables, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes are an immutable snapshot shared via Arc
//! - First match wins, so file and definition order matter
//! - Strategies are tried in order: exact literal URL, then segment-wise
//! - No match is a normal outcome, not an error

pub mod matcher;
pub mod router;

pub use matcher::{ExactMatch, MatchStrategy, StructuralMatch};
pub use router::{CapturedVariables, MatchRequest, MatchResult, RouteMatcher};
