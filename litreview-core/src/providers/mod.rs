//! LLM provider implementations.
//!
//! Only OpenAI-compatible chat completion endpoints are implemented (OpenAI,
//! Azure, Ollama, vLLM, LM Studio). Use `create_provider()` to instantiate one
//! from config, and `with_retry()` to wrap calls in exponential backoff.

pub mod openai_compat;

use crate::brain::LlmProvider;
use crate::config::{LlmConfig, RetryConfig};
use crate::error::LlmError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use openai_compat::OpenAiCompatibleProvider;

/// Execute an async operation with exponential backoff retry on transient errors.
///
/// Retries on `LlmError::RateLimited` (respects `retry_after_secs`),
/// `LlmError::Connection`, and `LlmError::Timeout`. Permanent errors (auth, parse) return immediately.
pub async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: F) -> Result<T, LlmError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                if !is_retryable(&e) || attempt >= config.max_retries {
                    return Err(e);
                }

                let backoff_ms = compute_backoff(config, attempt, &e);
                tracing::warn!(
                    attempt = attempt + 1,
                    max = config.max_retries,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Retrying after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Check if an error is retryable (transient).
fn is_retryable(err: &LlmError) -> bool {
    matches!(
        err,
        LlmError::RateLimited { .. } | LlmError::Connection { .. } | LlmError::Timeout { .. }
    )
}

/// Compute backoff delay, respecting rate limit retry-after hints.
fn compute_backoff(config: &RetryConfig, attempt: u32, err: &LlmError) -> u64 {
    if let LlmError::RateLimited { retry_after_secs } = err {
        let server_ms = retry_after_secs * 1000;
        let computed = compute_exponential_backoff(config, attempt);
        return server_ms.max(computed);
    }
    compute_exponential_backoff(config, attempt)
}

/// Pure exponential backoff with optional jitter.
fn compute_exponential_backoff(config: &RetryConfig, attempt: u32) -> u64 {
    let base = config.initial_backoff_ms as f64 * config.backoff_multiplier.powi(attempt as i32);
    let capped = base.min(config.max_backoff_ms as f64) as u64;
    if config.jitter {
        // up to 25%
        let jitter = (capped as f64 * 0.25 * jitter_fraction()) as u64;
        capped + jitter
    } else {
        capped
    }
}

fn jitter_fraction() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}

/// Create an LLM provider based on the configuration.
///
/// `"openai"`, `"azure"`, `"ollama"` and anything unrecognized all route to
/// `OpenAiCompatibleProvider`; the endpoint is chosen by `base_url`.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.provider.as_str() {
        "openai" | "azure" | "ollama" | "vllm" | "lmstudio" => {}
        other => tracing::warn!(
            provider = %other,
            "Unknown provider; treating it as an OpenAI-compatible endpoint"
        ),
    }
    Ok(Arc::new(OpenAiCompatibleProvider::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: "test-model".to_string(),
            api_key_env: "LITREVIEW_TEST_API_KEY".to_string(),
            base_url: Some("http://127.0.0.1:9/v1".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_create_provider_openai() {
        let provider = create_provider(&test_config("openai")).unwrap();
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_create_provider_unknown_defaults_to_openai() {
        let provider = create_provider(&test_config("local")).unwrap();
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_is_retryable() {
        assert!(is_retryable(&LlmError::RateLimited {
            retry_after_secs: 5
        }));
        assert!(is_retryable(&LlmError::Connection {
            message: "reset".into()
        }));
        assert!(is_retryable(&LlmError::Timeout { timeout_secs: 30 }));
        assert!(!is_retryable(&LlmError::AuthFailed {
            provider: "test".into()
        }));
        assert!(!is_retryable(&LlmError::ResponseParse {
            message: "bad json".into()
        }));
    }

    #[test]
    fn test_compute_backoff_exponential() {
        let config = RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(compute_exponential_backoff(&config, 0), 1000);
        assert_eq!(compute_exponential_backoff(&config, 1), 2000);
        assert_eq!(compute_exponential_backoff(&config, 2), 4000);
    }

    #[test]
    fn test_compute_backoff_respects_cap() {
        let config = RetryConfig {
            max_backoff_ms: 3000,
            jitter: false,
            ..RetryConfig::default()
        };
        assert_eq!(compute_exponential_backoff(&config, 2), 3000);
    }

    #[test]
    fn test_compute_backoff_rate_limit_uses_server_value() {
        let config = RetryConfig {
            jitter: false,
            ..RetryConfig::default()
        };
        let err = LlmError::RateLimited {
            retry_after_secs: 30,
        };
        assert_eq!(compute_backoff(&config, 0, &err), 30_000);
    }

    #[tokio::test]
    async fn test_with_retry_succeeds_first_try() {
        let result = with_retry(&RetryConfig::default(), || async { Ok::<_, LlmError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_retry_permanent_error_no_retry() {
        let call_count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let cc = call_count.clone();
        let config = RetryConfig {
            max_retries: 3,
            ..RetryConfig::default()
        };
        let result = with_retry(&config, || {
            let cc = cc.clone();
            async move {
                cc.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err::<i32, _>(LlmError::AuthFailed {
                    provider: "test".into(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(call_count.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_after_max() {
        let config = RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 1,
            max_backoff_ms: 2,
            backoff_multiplier: 1.0,
            jitter: false,
        };
        let call_count = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let cc = call_count.clone();
        let result = with_retry(&config, || {
            let cc = cc.clone();
            async move {
                cc.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Err::<i32, _>(LlmError::Timeout { timeout_secs: 1 })
            }
        })
        .await;
        assert!(matches!(result, Err(LlmError::Timeout { .. })));
        assert_eq!(call_count.load(std::sync::atomic::Ordering::SeqCst), 3);
    }
}
