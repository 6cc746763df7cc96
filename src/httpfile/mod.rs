//! Route definition files.
//!
//! # Data Flow
//! ```text
//! *.http file text
//!     → parser.rs (split definitions, request line, headers, body)
//!     → url.rs (validate and decompose the request URL)
//!     → compiler.rs (path segments, query segments)
//!     → Route (immutable, ready for matching)
//!
//! At match time:
//!     Route.body + captured variables
//!     → template.rs (substitute `{name}` placeholders)
//! ```
//!
//! # File Format
//! ```text
//! GET /users/{{id}}?verbose={{verbose}}
//! Content-Type: application/json
//! Status-Code: HTTP/1.1 200 OK
//!
//! {"id":"{id}","verbose":"{verbose}"}
//! ###
//! POST /users
//! ...
//! ```
//!
//! # Design Decisions
//! - `{{name}}` marks a variable in URLs, `{name}` in bodies
//! - A malformed request line is fatal, a malformed header line is ignored
//! - Comments (`#`) are only recognised outside the body

pub mod compiler;
pub mod error;
pub mod parser;
pub mod route;
pub mod template;
pub mod url;

pub use error::{FormatError, FormatErrorKind};
pub use parser::parse_routes;
pub use route::{Delimiters, HeaderList, Route, Segment, BODY_PLACEHOLDER, PATH_PLACEHOLDER};
pub use template::render_body;
pub use url::{validate_url, UrlParts};
