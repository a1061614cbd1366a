//! Error types for the relayout library.

use thiserror::Error;

/// Result type alias for relayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during structure recovery.
///
/// Detection and classification are total functions that degrade to safe
/// defaults; only configuration mistakes and page-contract violations are
/// surfaced as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The page object violated the capability contract (e.g. a non-finite
    /// page rectangle). This is an integration error, not a data error.
    #[error("Page contract violation: {0}")]
    PageContract(String),
}
