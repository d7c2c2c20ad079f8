//! Configuration system for litreview.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/litreview/config.toml` and/or `.litreview/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration, constructed once at startup and passed by reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub sources: SourcesConfig,
    pub pipeline: PipelineConfig,
    pub digest: DigestConfig,
    pub output: OutputConfig,
}

/// Configuration for the language-model provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name. Only OpenAI-compatible chat completion endpoints are supported.
    pub provider: String,
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate in a response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    /// Sampling temperature. Unset omits it from requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retry policy for transient provider errors.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: 120,
            retry: RetryConfig::default(),
        }
    }
}

/// Exponential backoff policy applied to rate limits, timeouts and dropped connections.
///
/// Off by default (`max_retries = 0`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 1000,
            max_backoff_ms: 60_000,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl LlmConfig {
    /// Validate this LLM config and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(temperature) = self.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            warnings.push(format!(
                "temperature ({}) is outside the usual 0.0-2.0 range",
                temperature
            ));
        }
        if self.api_key_env.trim().is_empty() {
            warnings.push("api_key_env is empty; the provider cannot authenticate".to_string());
        }
        warnings
    }
}

/// Configuration for the bibliographic source adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Maximum papers requested from each source.
    pub max_results: usize,
    /// Fixed delay before every Semantic Scholar request, in milliseconds.
    pub semantic_scholar_delay_ms: u64,
    /// Environment variable holding the optional Semantic Scholar API key.
    pub semantic_scholar_api_key_env: String,
    /// Environment variable holding the contact email sent to NCBI E-utilities.
    pub entrez_email_env: String,
    /// Environment variable holding the optional NCBI API key.
    pub entrez_api_key_env: String,
    /// Fetch selected sources concurrently. Output order is unaffected.
    pub parallel_fetch: bool,
    /// Drop papers whose normalized title was already seen in this run.
    pub dedupe_by_title: bool,
    /// Per-request timeout for source HTTP calls, in seconds.
    pub request_timeout_secs: u64,
    pub arxiv_base_url: String,
    pub pubmed_base_url: String,
    pub semantic_scholar_base_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            semantic_scholar_delay_ms: 1100,
            semantic_scholar_api_key_env: "SEMANTIC_SCHOLAR_API_KEY".to_string(),
            entrez_email_env: "EMAIL_FOR_ENTREZ".to_string(),
            entrez_api_key_env: "NCBI_API_KEY".to_string(),
            parallel_fetch: false,
            dedupe_by_title: false,
            request_timeout_secs: 30,
            arxiv_base_url: "https://export.arxiv.org/api/query".to_string(),
            pubmed_base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            semantic_scholar_base_url: "https://api.semanticscholar.org/graph/v1".to_string(),
        }
    }
}

/// Configuration for a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rewrite interactive questions into keyword search queries before searching.
    pub refine_query: bool,
    /// Interactive runs keeping fewer papers than this surface a thin-results notice.
    pub thin_result_threshold: usize,
    /// Filename prefix for transcripts and digests.
    pub artifact_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            refine_query: true,
            thin_result_threshold: 3,
            artifact_prefix: "litreview".to_string(),
        }
    }
}

/// Configuration for the weekly digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Standing topics researched on every digest run, in output order.
    pub topics: Vec<String>,
    /// Recency window in days.
    pub lookback_days: i64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            topics: vec![
                "Neuroscience research updates".to_string(),
                "News about climate change and renewable energies".to_string(),
                "Groundbreaking new research findings across all of science".to_string(),
            ],
            lookback_days: 7,
        }
    }
}

/// Where artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for all artifacts. Subdirectories below are relative to it.
    pub base_dir: PathBuf,
    pub transcripts_dir: PathBuf,
    pub metadata_dir: PathBuf,
    pub digests_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            transcripts_dir: PathBuf::from("lit_reviews"),
            metadata_dir: PathBuf::from("summary_sources"),
            digests_dir: PathBuf::from("digests"),
        }
    }
}

impl OutputConfig {
    /// Output config rooted at `base_dir` with the default subdirectory layout.
    pub fn rooted_at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    pub fn transcripts_path(&self) -> PathBuf {
        self.base_dir.join(&self.transcripts_dir)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.base_dir.join(&self.metadata_dir)
    }

    pub fn digests_path(&self) -> PathBuf {
        self.base_dir.join(&self.digests_dir)
    }
}

/// Load configuration with layered sources.
///
/// Precedence (lowest to highest):
/// 1. Built-in defaults
/// 2. User config file (~/.config/litreview/config.toml)
/// 3. Workspace config file (.litreview/config.toml)
/// 4. Environment variables (LITREVIEW_ prefix, `__` as separator)
/// 5. Explicit overrides
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&AppConfig>,
) -> Result<AppConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = user_config_path()
        && path.exists()
    {
        figment = figment.merge(Toml::file(&path));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // LITREVIEW_LLM__MODEL, LITREVIEW_SOURCES__MAX_RESULTS, ...
    figment = figment.merge(Env::prefixed("LITREVIEW_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Load configuration from one explicit TOML file layered over the defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LITREVIEW_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

/// Path of the user-level config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "litreview", "litreview")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".litreview").join("config.toml")
}

/// Read an optional secret from the environment variable named in config.
///
/// Empty values are treated as unset.
pub fn env_secret(var: &str) -> Option<String> {
    if var.is_empty() {
        return None;
    }
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
