use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PrDigestError;
use crate::types::PromptLanguage;

/// Top-level configuration loaded from `.prdigest.toml`.
///
/// Supports layered resolution: CLI flags > env vars > local config > defaults.
///
/// # Examples
///
/// ```
/// use prdigest_core::PrDigestConfig;
///
/// let config = PrDigestConfig::default();
/// assert_eq!(config.summary.bot_marker, "[bot]");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrDigestConfig {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubConfig,
    /// LLM provider settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Message assembly and prompt settings.
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl PrDigestConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::Io`] if the file cannot be read, or
    /// [`PrDigestError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use prdigest_core::PrDigestConfig;
    /// use std::path::Path;
    ///
    /// let config = PrDigestConfig::from_file(Path::new(".prdigest.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, PrDigestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use prdigest_core::PrDigestConfig;
    ///
    /// let toml = r#"
    /// [llm]
    /// model = "gpt-4o"
    /// "#;
    /// let config = PrDigestConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.llm.model, "gpt-4o");
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, PrDigestError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// GitHub API configuration.
///
/// # Examples
///
/// ```
/// use prdigest_core::GitHubConfig;
///
/// let config = GitHubConfig::default();
/// assert_eq!(config.api_url, "https://api.github.com");
/// assert!(config.token.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Personal access token. Falls back to `GITHUB_TOKEN`, then `GH_TOKEN`.
    pub token: Option<String>,
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
        }
    }
}

impl GitHubConfig {
    /// Resolve the token from the config, `GITHUB_TOKEN`, or `GH_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::Config`] if no token is available.
    pub fn resolve_token(&self) -> Result<String, PrDigestError> {
        self.resolve_token_with(|key| std::env::var(key).ok())
    }

    /// Same as [`resolve_token`](Self::resolve_token) with an explicit
    /// environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PrDigestError::Config`] if no token is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use prdigest_core::GitHubConfig;
    ///
    /// let config = GitHubConfig::default();
    /// let token = config
    ///     .resolve_token_with(|key| (key == "GH_TOKEN").then(|| "gho_abc".to_string()))
    ///     .unwrap();
    /// assert_eq!(token, "gho_abc");
    /// ```
    pub fn resolve_token_with<F>(&self, env: F) -> Result<String, PrDigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| env("GITHUB_TOKEN").filter(|t| !t.is_empty()))
            .or_else(|| env("GH_TOKEN").filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                PrDigestError::Config(
                    "GITHUB_TOKEN not set. Pass --github-token, set GITHUB_TOKEN, or add token under [github]"
                        .into(),
                )
            })
    }
}

/// LLM provider configuration.
///
/// Any OpenAI-compatible chat completions endpoint works. The default points
/// at GitHub Models, which accepts a GitHub token as its API key.
///
/// # Examples
///
/// ```
/// use prdigest_core::LlmConfig;
///
/// let config = LlmConfig::default();
/// assert_eq!(config.model, "gpt-4o-mini");
/// assert_eq!(config.temperature, 0.3);
/// assert_eq!(config.top_p, 0.2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base URL; requests go to `{base_url}/chat/completions`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key for the provider.
    pub api_key: Option<String>,
    /// Sampling temperature (default: 0.3).
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Nucleus sampling cutoff (default: 0.2).
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    /// Maximum tokens in the completion (default: 4096).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_base_url() -> String {
    "https://models.inference.ai.azure.com".into()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_top_p() -> f64 {
    0.2
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl LlmConfig {
    /// Resolve the API key from the config, `OPENAI_API_KEY`, or `fallback`.
    ///
    /// `fallback` is normally the GitHub token.
    pub fn resolve_api_key(&self, fallback: Option<&str>) -> Option<String> {
        self.resolve_api_key_with(fallback, |key| std::env::var(key).ok())
    }

    /// Same as [`resolve_api_key`](Self::resolve_api_key) with an explicit
    /// environment lookup.
    pub fn resolve_api_key_with<F>(&self, fallback: Option<&str>, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| env("OPENAI_API_KEY").filter(|k| !k.is_empty()))
            .or_else(|| fallback.map(str::to_string))
    }
}

/// Message assembly and prompt configuration.
///
/// # Examples
///
/// ```
/// use prdigest_core::{PromptLanguage, SummaryConfig};
///
/// let config = SummaryConfig::default();
/// assert_eq!(config.language, PromptLanguage::English);
/// assert_eq!(config.bot_marker, "[bot]");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Language of the system instruction (default: `en`).
    #[serde(default)]
    pub language: PromptLanguage,
    /// Comments whose author handle contains this substring are dropped.
    #[serde(default = "default_bot_marker")]
    pub bot_marker: String,
}

fn default_bot_marker() -> String {
    "[bot]".into()
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            language: PromptLanguage::default(),
            bot_marker: default_bot_marker(),
        }
    }
}
