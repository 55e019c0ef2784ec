//! PlanExec configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main PlanExec configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Agent loop limits
    pub agent: AgentConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Web search tool configuration
    pub search: SearchConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .planexec.yml
        let local_config = PathBuf::from(".planexec.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/planexec/planexec.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("planexec").join("planexec.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 300_000,
        }
    }
}

/// Agent loop limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum plan-execute-replan cycles per request
    ///
    /// Exceeding this aborts the request; a replanner that keeps emitting
    /// non-empty plans is the failure mode this bounds.
    #[serde(rename = "recursion-limit")]
    pub recursion_limit: u32,

    /// Maximum think/act/observe turns inside one execution step
    #[serde(rename = "max-reasoning-turns")]
    pub max_reasoning_turns: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            recursion_limit: 50,
            max_reasoning_turns: 8,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for per-thread conversation checkpoints
    #[serde(rename = "checkpoint-dir")]
    pub checkpoint_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // XDG data directory (~/.local/share/planexec/checkpoints on Linux)
        let checkpoint_dir = dirs::data_dir()
            .map(|d| d.join("planexec").join("checkpoints"))
            .unwrap_or_else(|| PathBuf::from(".checkpoints"))
            .to_string_lossy()
            .into_owned();

        Self { checkpoint_dir }
    }
}

/// Web search tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search provider: "searxng" or "tavily"
    pub provider: String,

    /// Base URL of the SearxNG instance
    #[serde(rename = "searxng-url")]
    pub searxng_url: String,

    /// Environment variable containing the Tavily API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Number of results to return
    #[serde(rename = "max-results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: "searxng".to_string(),
            searxng_url: "http://localhost:8080".to_string(),
            api_key_env: "TAVILY_API_KEY".to_string(),
            max_results: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.agent.recursion_limit, 50);
        assert_eq!(config.agent.max_reasoning_turns, 8);
        assert_eq!(config.search.max_results, 3);
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "anthropic");
        assert!(config.model.contains("sonnet"));
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.base_url, "https://api.anthropic.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 8192
  timeout-ms: 60000

agent:
  recursion-limit: 25
  max-reasoning-turns: 4

search:
  provider: tavily
  max-results: 5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "claude-opus-4");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 8192);
        assert_eq!(config.agent.recursion_limit, 25);
        assert_eq!(config.search.provider, "tavily");
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
agent:
  recursion-limit: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.agent.recursion_limit, 10);

        // Defaults for unspecified
        assert_eq!(config.agent.max_reasoning_turns, 8);
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.search.provider, "searxng");
    }
}
