//! Error types for the litreview core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering LLM calls, bibliographic sources, configuration, and artifact I/O.

use std::path::PathBuf;

/// Top-level error type for the litreview core library.
#[derive(Debug, thiserror::Error)]
pub enum LitReviewError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from LLM provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Provider connection failed: {message}")]
    Connection { message: String },
}

/// Errors from a single bibliographic source adapter.
///
/// These never abort a fetch batch: the source router logs them and
/// treats the failing source as having returned nothing.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{source_name} request failed: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("{source_name} response parse error: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Failed to create HTTP client: {message}")]
    ClientBuild { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Environment variable not set: {var}")]
    EnvVarMissing { var: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `LitReviewError`.
pub type Result<T> = std::result::Result<T, LitReviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_llm() {
        let err = LitReviewError::Llm(LlmError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "LLM error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_source() {
        let err = LitReviewError::Source(SourceError::Status {
            source_name: "Semantic Scholar".into(),
            status: 429,
        });
        assert_eq!(
            err.to_string(),
            "Source error: Semantic Scholar returned status 429"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = LitReviewError::Config(ConfigError::EnvVarMissing {
            var: "OPENAI_API_KEY".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: Environment variable not set: OPENAI_API_KEY"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: LitReviewError = io_err.into();
        assert!(matches!(err, LitReviewError::Io(_)));
    }
}
