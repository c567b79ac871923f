//! Annotator configuration.
//!
//! Reads oncokb-annotator.toml from the current directory or the path in the
//! ONCOKB_ANNOTATOR_CONFIG env var. A missing file is not an error: every
//! section has defaults, and the OncoKB token is always taken from the
//! environment rather than the file.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

use crate::error::{AnnotatorError, Result};

pub const CONFIG_PATH_ENV: &str = "ONCOKB_ANNOTATOR_CONFIG";
pub const API_URL_ENV: &str = "ONCOKB_API_URL";
const DEFAULT_CONFIG_PATH: &str = "oncokb-annotator.toml";

/// Complete annotator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    #[serde(default)]
    pub oncokb: OncoKbConfig,

    #[serde(default)]
    pub input: InputConfig,
}

// ── OncoKB endpoint ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OncoKbConfig {
    /// Annotate endpoint. A URL containing "byProteinChange" switches the
    /// request builder into protein-change mode (no protein coordinates).
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the env var holding the OncoKB API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url()      -> String { "https://www.oncokb.org/api/v1/annotate/mutations/byProteinChange".to_string() }
fn default_token_env()    -> String { "ONCOKB_TOKEN".to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for OncoKbConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OncoKbConfig {
    /// Read the API token from the configured env var.
    pub fn resolve_token(&self) -> Result<SecretString> {
        match std::env::var(&self.token_env) {
            Ok(token) if !token.trim().is_empty() => Ok(SecretString::from(token)),
            _ => Err(AnnotatorError::Config(format!(
                "OncoKB token not set: export {} before annotating",
                self.token_env
            ))),
        }
    }

    /// Check the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| AnnotatorError::Config(format!("Invalid OncoKB api_url {:?}: {}", self.api_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(AnnotatorError::Config(format!(
                "OncoKB api_url must be http(s), got scheme {other:?}"
            ))),
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Pipeline version recorded on batches built from MAF input
    #[serde(default = "default_pipeline_version")]
    pub default_pipeline_version: String,
}

fn default_pipeline_version() -> String { "v1.0".to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self { default_pipeline_version: default_pipeline_version() }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl AnnotatorConfig {
    /// Load configuration, then apply env overrides.
    /// Checks ONCOKB_ANNOTATOR_CONFIG first, then the current directory.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&path).exists() {
            Self::load_from(&path)
        } else {
            debug!(path = %path, "No config file found, using defaults");
            Self::default().finish()
        }
    }

    /// Load an explicit config file, picking the format from its extension
    /// (`.yaml`/`.yml`, `.json`, anything else is TOML), then apply env
    /// overrides.
    pub fn load_from(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(path)?,
            Some("json") => Self::from_json(path)?,
            _ => Self::from_toml(path)?,
        };
        debug!(path = %path, "Loaded config file");
        config.finish()
    }

    fn finish(mut self) -> Result<Self> {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.oncokb.api_url = url;
            }
        }

        self.oncokb.validate()?;
        Ok(self)
    }

    /// Load from TOML file
    pub fn from_toml(path: &str) -> Result<Self> {
        let content = read_config(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| AnnotatorError::Config(format!("Invalid TOML config: {e}")))
    }

    /// Load from YAML file
    pub fn from_yaml(path: &str) -> Result<Self> {
        let content = read_config(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AnnotatorError::Config(format!("Invalid YAML config {path}: {e}")))
    }

    /// Load from JSON file
    pub fn from_json(path: &str) -> Result<Self> {
        let content = read_config(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AnnotatorError::Config(format!("Invalid JSON config {path}: {e}")))
    }
}

fn read_config(path: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AnnotatorError::Config(format!("Cannot read config file {path}: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    #[test]
    fn test_default_config_targets_protein_change_endpoint() {
        let config = AnnotatorConfig::default();
        assert!(config.oncokb.api_url.contains("byProteinChange"));
        assert_eq!(config.oncokb.token_env, "ONCOKB_TOKEN");
        assert_eq!(config.input.default_pipeline_version, "v1.0");
        assert!(config.oncokb.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnnotatorConfig::from_toml_str(
            "[oncokb]\napi_url = \"https://demo.oncokb.org/api/v1/annotate/mutations/byGenomicChange\"\n",
        )
        .unwrap();
        assert!(config.oncokb.api_url.contains("byGenomicChange"));
        assert_eq!(config.oncokb.timeout_secs, 30);
        assert_eq!(config.input.default_pipeline_version, "v1.0");
    }

    #[test]
    fn test_invalid_url_is_config_error() {
        let oncokb = OncoKbConfig { api_url: "not a url".to_string(), ..Default::default() };
        assert!(matches!(oncokb.validate(), Err(AnnotatorError::Config(_))));

        let oncokb = OncoKbConfig { api_url: "ftp://www.oncokb.org/api".to_string(), ..Default::default() };
        assert!(matches!(oncokb.validate(), Err(AnnotatorError::Config(_))));
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let oncokb = OncoKbConfig {
            token_env: "ONCOKB_TOKEN_TEST_UNSET_3F9A".to_string(),
            ..Default::default()
        };
        let err = oncokb.resolve_token().unwrap_err();
        assert!(err.to_string().contains("ONCOKB_TOKEN_TEST_UNSET_3F9A"));
    }

    #[test]
    fn test_token_read_from_configured_env_var() {
        std::env::set_var("ONCOKB_TOKEN_TEST_SET_7C21", "secret-token");
        let oncokb = OncoKbConfig {
            token_env: "ONCOKB_TOKEN_TEST_SET_7C21".to_string(),
            ..Default::default()
        };
        let token = oncokb.resolve_token().unwrap();
        assert_eq!(token.expose_secret(), "secret-token");
    }

    #[test]
    fn test_yaml_file_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "oncokb:\n  timeout_secs: 5\ninput:\n  default_pipeline_version: v2.1").unwrap();
        let config = AnnotatorConfig::from_yaml(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.oncokb.timeout_secs, 5);
        assert_eq!(config.input.default_pipeline_version, "v2.1");
    }

    #[test]
    fn test_load_from_picks_format_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"oncokb": {{"token_env": "MY_ONCOKB_TOKEN"}}}}"#).unwrap();
        let config = AnnotatorConfig::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.oncokb.token_env, "MY_ONCOKB_TOKEN");
        assert_eq!(config.input.default_pipeline_version, "v1.0");
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let err = AnnotatorConfig::from_json("/nonexistent/oncokb-annotator.json").unwrap_err();
        assert!(matches!(err, AnnotatorError::Config(_)));
    }
}
