//! Mock HTTP server driven by `.http` route definition files.
//!
//! Definitions are parsed into routes, cached once per process, and matched
//! against incoming requests to serve canned responses with captured path and
//! query variables substituted into the body.

pub mod admin;
pub mod config;
pub mod http;
pub mod httpfile;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::MockConfig;
pub use http::HttpServer;
pub use httpfile::{parse_routes, render_body, FormatError, Route};
pub use lifecycle::Shutdown;
pub use routing::{CapturedVariables, MatchRequest, MatchResult, RouteMatcher};
pub use store::{FileReader, RouteStore, StoreError};
