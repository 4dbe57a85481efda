//! Core types shared by every weft crate: argument values, call outcomes, and
//! the engine's error taxonomy.

/// Error taxonomy for matching, wiring, and propagated failures.
pub mod error;

pub use error::{ConfigError, Error, PatternError};
pub use serde_json::Value;

/// Result of running a wrapped method, an aspect, or a continuation.
///
/// `Ok` carries the method's return value; `Err` carries either an engine
/// error or the method's own failure, propagated untouched.
pub type Outcome = Result<Value, Error>;
