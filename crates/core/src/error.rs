//! Error types for the slide deck engine.
//!
//! Parsing and diffing never fail; these errors only cover moving a
//! [`crate::PresentationCache`] in and out of its persisted form.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while persisting or restoring a presentation cache.
#[derive(Error, Debug)]
pub enum Error {
    /// The cache text could not be decoded into a snapshot.
    #[error("Invalid presentation cache: {0}")]
    InvalidCache(String),

    /// A snapshot could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
