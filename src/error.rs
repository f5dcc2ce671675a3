//! Error types for comparison runs.
//!
//! Core-path failures (input validation, fetching, reference-document
//! parsing) abort the request. Auxiliary checks never produce these
//! errors; they degrade to a skipped result in the report instead.

/// Error type for a comparison request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or unusable caller input (no document text, no target URL).
    /// User-correctable; never retried.
    #[error("invalid input: {0}")]
    Input(String),

    /// The target page could not be fetched after exhausting retries.
    /// Carries the attempt count and the last underlying cause.
    #[error("fetch failed after {attempts} attempt(s): {message}")]
    Fetch {
        /// Number of fetch attempts made before giving up.
        attempts: u32,
        /// Description of the last failure.
        message: String,
    },

    /// The reference document input was malformed.
    #[error("reference document parse failed: {0}")]
    Parse(String),
}

/// Result type alias for comparison operations.
pub type Result<T> = std::result::Result<T, Error>;
