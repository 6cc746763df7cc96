//! Route store subsystem.
//!
//! # Data Flow
//! ```text
//! First request (or startup pre-warm)
//!     → cache.rs (take populate lock, check again)
//!     → fs.rs (list *.http files, read each)
//!     → httpfile::parse_routes (per file)
//!     → publish Arc<Vec<Route>> snapshot
//!
//! On file change (watch enabled) or admin reload:
//!     watcher.rs detects change
//!     → cache.rs reloads under the same lock
//!     → atomic swap of the snapshot
//! ```

pub mod cache;
pub mod fs;
pub mod watcher;

pub use cache::{RouteStore, StoreError};
pub use fs::{FileReader, FsFileReader, MemoryFileReader};
pub use watcher::RouteWatcher;
