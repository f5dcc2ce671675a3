//! Configuration options for a comparison run.
//!
//! The `Options` struct gathers every threshold and limit used by the
//! pipeline so that verdict boundaries are configuration, not code.

use std::time::Duration;

/// Configuration options for a comparison run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use copyaudit::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     max_retries: 5,
///     full_match_threshold: 0.95,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// Minimum f1 for a block to count as a full match.
    ///
    /// Default: `0.9`
    pub full_match_threshold: f64,

    /// Minimum f1 for a block to count as a partial match.
    /// Below this the block is reported as not found.
    ///
    /// Default: `0.7`
    pub partial_match_threshold: f64,

    /// Best-paragraph f1 below which the aligner falls back to a
    /// contextual window over the flat page text.
    ///
    /// Default: `0.3`
    pub contextual_floor: f64,

    /// Characters of flat text taken on each side of the first matched
    /// word when building the contextual window (the block's own length
    /// is always included).
    ///
    /// Default: `100`
    pub contextual_padding: usize,

    /// Minimum length (characters) of a reference text block. Shorter
    /// blocks are discarded during splitting.
    ///
    /// Default: `10`
    pub min_block_len: usize,

    /// Minimum length (characters) of an extracted page paragraph.
    ///
    /// Default: `10`
    pub min_paragraph_len: usize,

    /// Maximum number of redirect hops followed per fetch attempt.
    /// Reaching the cap uses the last response rather than failing.
    ///
    /// Default: `10`
    pub max_redirects: usize,

    /// Maximum number of fetch attempts (initial try included).
    ///
    /// Default: `3`
    pub max_retries: u32,

    /// Base delay for exponential backoff between fetch attempts.
    /// Doubles after each failed attempt.
    ///
    /// Default: `500ms`
    pub retry_base_delay: Duration,

    /// Per-request timeout for the HTTP client.
    ///
    /// Default: `30s`
    pub request_timeout: Duration,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Grammar-service endpoint (LanguageTool-style `/v2/check`).
    /// When `None` the grammar check is reported as skipped.
    ///
    /// Default: `None`
    pub grammar_endpoint: Option<String>,

    /// Language code sent to the grammar service.
    ///
    /// Default: `"en-US"`
    pub grammar_language: String,

    /// Downgrade spelling findings whose flagged span starts with an
    /// uppercase letter (brand names trip spell checkers constantly).
    ///
    /// Default: `true`
    pub downgrade_capitalized_findings: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            full_match_threshold: 0.9,
            partial_match_threshold: 0.7,
            contextual_floor: 0.3,
            contextual_padding: 100,
            min_block_len: 10,
            min_paragraph_len: 10,
            max_redirects: 10,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("copyaudit/{}", env!("CARGO_PKG_VERSION")),
            grammar_endpoint: None,
            grammar_language: "en-US".to_string(),
            downgrade_capitalized_findings: true,
        }
    }
}
