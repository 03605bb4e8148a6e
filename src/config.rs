//! Configuration for the generation backend and outputs.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! command-line flags. API keys are never read from the file; they come from
//! `--api-key` or the provider's environment variable.
//!
//! ```yaml
//! provider: gemini
//! model: gemini-2.0-flash
//! max_tokens: 4096
//! retries: 2
//! output_path: pages/news.html
//! json_output_dir: api
//! listen: 127.0.0.1:8080
//! ```

use crate::cli::BackendArgs;
use crate::error::{NewsError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Default output length requested from the model.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Where the batch flow writes its page unless told otherwise.
pub const DEFAULT_OUTPUT_PATH: &str = "pages/news.html";
/// Address the interactive server binds unless told otherwise.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Which generative-text API to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Anthropic Messages API.
    Anthropic,
    /// Google Gemini `generateContent`.
    Gemini,
}

impl Provider {
    pub fn default_model(self) -> &'static str {
        match self {
            Provider::Anthropic => "claude-sonnet-4-20250514",
            Provider::Gemini => "gemini-2.0-flash",
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::Anthropic => "https://api.anthropic.com",
            Provider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// Environment variable holding this provider's key.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Contents of the optional YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub endpoint: Option<String>,
    pub retries: Option<usize>,
    pub output_path: Option<PathBuf>,
    pub json_output_dir: Option<PathBuf>,
    pub listen: Option<String>,
}

/// Load a YAML config file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| NewsError::Config(format!("cannot read {}: {e}", path.display())))?;
    let config: FileConfig = serde_yaml::from_str(&text)
        .map_err(|e| NewsError::Config(format!("cannot parse {}: {e}", path.display())))?;
    info!("Loaded configuration file");
    Ok(config)
}

/// Fully resolved backend settings.
#[derive(Clone)]
pub struct GenerationConfig {
    pub provider: Provider,
    pub model: String,
    pub max_tokens: u32,
    pub endpoint: String,
    pub api_key: String,
    pub retries: usize,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("retries", &self.retries)
            .finish()
    }
}

impl GenerationConfig {
    /// Merge flags over file values over defaults.
    ///
    /// `default_provider` is the front end's historical provider; `env` looks
    /// up environment variables so tests can supply their own.
    pub fn resolve(
        file: &FileConfig,
        args: &BackendArgs,
        default_provider: Provider,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let provider = args.provider.or(file.provider).unwrap_or(default_provider);

        let api_key = args
            .api_key
            .clone()
            .or_else(|| env(provider.api_key_env()))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                NewsError::Config(format!(
                    "no API key: pass --api-key or set {}",
                    provider.api_key_env()
                ))
            })?;

        let max_tokens = args
            .max_tokens
            .or(file.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS);
        if max_tokens == 0 {
            return Err(NewsError::Config("max_tokens must be positive".to_string()));
        }

        Ok(Self {
            provider,
            model: args
                .model
                .clone()
                .or_else(|| file.model.clone())
                .unwrap_or_else(|| provider.default_model().to_string()),
            max_tokens,
            endpoint: args
                .endpoint
                .clone()
                .or_else(|| file.endpoint.clone())
                .unwrap_or_else(|| provider.default_endpoint().to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            retries: args.retries.or(file.retries).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn key_env(name: &str) -> Option<String> {
        (name == "GEMINI_API_KEY").then(|| "g-key".to_string())
    }

    #[test]
    fn test_defaults_follow_provider() {
        let cfg = GenerationConfig::resolve(
            &FileConfig::default(),
            &BackendArgs::default(),
            Provider::Gemini,
            key_env,
        )
        .unwrap();
        assert_eq!(cfg.provider, Provider::Gemini);
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(cfg.api_key, "g-key");
        assert_eq!(cfg.retries, 0);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = GenerationConfig::resolve(
            &FileConfig::default(),
            &BackendArgs::default(),
            Provider::Anthropic,
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_flags_override_file() {
        let file: FileConfig = serde_yaml::from_str(
            "provider: gemini\nmodel: from-file\nmax_tokens: 2048\nendpoint: http://localhost:9000/\n",
        )
        .unwrap();
        let args = BackendArgs {
            model: Some("from-flag".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        };
        let cfg = GenerationConfig::resolve(&file, &args, Provider::Anthropic, no_env).unwrap();
        assert_eq!(cfg.provider, Provider::Gemini);
        assert_eq!(cfg.model, "from-flag");
        assert_eq!(cfg.max_tokens, 2048);
        assert_eq!(cfg.endpoint, "http://localhost:9000");
    }

    #[test]
    fn test_debug_redacts_key() {
        let args = BackendArgs {
            api_key: Some("super-secret".to_string()),
            ..Default::default()
        };
        let cfg = GenerationConfig::resolve(&FileConfig::default(), &args, Provider::Anthropic, no_env)
            .unwrap();
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }

    #[test]
    fn test_unknown_file_key_rejected() {
        let res: std::result::Result<FileConfig, _> = serde_yaml::from_str("api_key: nope\n");
        assert!(res.is_err());
    }

    #[test]
    fn test_load_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "retries: 3\noutput_path: out/news.html\n").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.retries, Some(3));
        assert_eq!(cfg.output_path, Some(PathBuf::from("out/news.html")));

        let err = load_config(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
    }
}
