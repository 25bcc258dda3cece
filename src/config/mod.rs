//! Configuration loading (TOML file + environment).
//!
//! The backend registry and simulation settings are declared in one TOML
//! file; credentials are referenced by environment-variable name and resolved
//! at gateway registration time. Configuration is loaded once at startup and
//! passed explicitly into every component; there is no ambient global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::{PatientSimError, Result};

/// Provider kind for a registered backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Remote chat-completions-compatible HTTP API (OpenAI, DeepSeek, ...).
    #[serde(rename = "openai_compatible")]
    #[strum(serialize = "openai_compatible")]
    OpenAiCompatible,
    /// Local inference server speaking the Ollama native API.
    Ollama,
}

/// Static description of one backend, keyed by model identifier.
///
/// Immutable once loaded. `temperature` and `max_tokens` are the generation
/// defaults applied whenever a call carries no override.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptor {
    pub provider: ProviderKind,
    /// Name of the environment variable holding the API key. Required for
    /// remote providers; ignored for local ones.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    pub model_name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

/// Simulation-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    pub max_turns: usize,
    pub output_dir: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// When set, each finished dialogue is followed by a side-channel
    /// findings summary logged at debug level.
    #[serde(default)]
    pub log_summaries: bool,
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    pub simulation: SimulationSettings,
    pub patient_profile_path: PathBuf,
    #[serde(default)]
    pub models: HashMap<String, ModelDescriptor>,
}

impl SimConfig {
    /// Load from a TOML file. Reads `.env` first (ignoring absence) so that
    /// `api_key_env` references can resolve against it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let raw = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&raw).map_err(|e| {
            PatientSimError::Configuration(format!(
                "failed to parse {}: {e}",
                path.as_ref().display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        patient_profile_path = "data/patient_profiles.json"

        [simulation]
        max_turns = 10
        output_dir = "outputs"

        [models.deepseek-api]
        provider = "openai_compatible"
        api_key_env = "DEEPSEEK_API_KEY"
        base_url = "https://api.deepseek.com"
        model_name = "deepseek-chat"
        temperature = 1.0
        max_tokens = 2048

        [models.local-llama]
        provider = "ollama"
        base_url = "http://localhost:11434"
        model_name = "llama3.1:8b"
    "#;

    #[test]
    fn parses_full_config() {
        let config: SimConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.simulation.max_turns, 10);
        assert_eq!(config.simulation.request_timeout_secs, 120);
        assert_eq!(config.models.len(), 2);

        let deepseek = &config.models["deepseek-api"];
        assert_eq!(deepseek.provider, ProviderKind::OpenAiCompatible);
        assert_eq!(deepseek.api_key_env.as_deref(), Some("DEEPSEEK_API_KEY"));
        assert_eq!(deepseek.temperature, 1.0);

        let local = &config.models["local-llama"];
        assert_eq!(local.provider, ProviderKind::Ollama);
        assert!(local.api_key_env.is_none());
        assert_eq!(local.max_tokens, 1024);
    }

    #[test]
    fn provider_kind_rejects_unknown_values() {
        let result: std::result::Result<SimConfig, _> = toml::from_str(
            r#"
            patient_profile_path = "p.json"
            [simulation]
            max_turns = 5
            output_dir = "out"
            [models.bad]
            provider = "grpc"
            model_name = "x"
            "#,
        );
        assert!(result.is_err());
    }
}
