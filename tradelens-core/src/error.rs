//! Error types for analytics and collaborators.
//!
//! Analytics are strict: malformed or too-short input fails loudly with an
//! [`AnalysisError`]. Collaborators are lenient: their [`UpstreamError`]s are
//! logged and converted into empty or absent output by the request pipeline.

use thiserror::Error;

/// Errors raised by the pure analytics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data for {what}: need {needed} bars, got {got}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("domain error: {0}")]
    Domain(String),
}

impl AnalysisError {
    pub fn insufficient(what: &'static str, needed: usize, got: usize) -> Self {
        Self::InsufficientData { what, needed, got }
    }
}

/// Structured error types for collaborator calls (market data, news,
/// translation, exchange ticker).
///
/// These are displayable in CLI output and log lines.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("upstream timed out after {0:.1}s")]
    Timeout(f64),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("upstream error: {0}")]
    Other(String),
}

impl UpstreamError {
    /// Classify a transport error from the HTTP client.
    pub fn from_reqwest(err: reqwest::Error, timeout_s: f64) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout_s)
        } else if err.is_decode() {
            Self::ResponseFormatChanged(err.to_string())
        } else {
            Self::NetworkUnreachable(err.to_string())
        }
    }
}

impl From<std::io::Error> for UpstreamError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for UpstreamError {
    fn from(err: csv::Error) -> Self {
        Self::Io(format!("CSV error: {err}"))
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message_names_the_analytic() {
        let err = AnalysisError::insufficient("setup", 200, 120);
        assert_eq!(
            err.to_string(),
            "insufficient data for setup: need 200 bars, got 120"
        );
    }

    #[test]
    fn io_errors_convert_to_upstream() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        let err: UpstreamError = io.into();
        assert!(matches!(err, UpstreamError::Io(_)));
    }
}
