//! Parameter resolution: the per-request context and its error log.

pub mod context;
pub mod error_log;

pub use context::{ResolutionContext, Resolved};
pub use error_log::ErrorLog;
