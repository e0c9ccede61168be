//! Configuration (layered: defaults < TOML file < environment < CLI flags).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agent::{DEFAULT_CONVERSATION, DEFAULT_FALLBACK_REPLY};
use crate::agent_loop::prompt::{DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPLATE};
use crate::agent_loop::{PromptTemplate, TurnLimits};
use crate::error::ConfidantError;
use crate::types::GenerationSettings;
use crate::util::retry::RetryPolicy;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CONFIDANT_CONFIG";

/// Service configuration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidantConfig {
    pub bind_host: String,
    pub port: u16,
    pub model: String,
    pub temperature: f64,
    pub max_tool_rounds: usize,
    pub model_timeout_secs: u64,
    pub tool_timeout_secs: u64,
    pub model_max_attempts: u32,
    pub default_conversation: String,
    pub fallback_reply: String,
    pub search_max_results: u32,
    /// Overrides the instruction template.
    pub instructions: Option<String>,
    /// Overrides the persona text substituted into the template.
    pub system_message: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: Option<String>,
}

impl Default for ConfidantConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tool_rounds: 5,
            model_timeout_secs: 60,
            tool_timeout_secs: 30,
            model_max_attempts: 2,
            default_conversation: DEFAULT_CONVERSATION.to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
            search_max_results: 5,
            instructions: None,
            system_message: None,
            openai_api_key: None,
            openai_base_url: None,
            tavily_api_key: None,
            tavily_base_url: None,
        }
    }
}

impl fmt::Debug for ConfidantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ConfidantConfig")
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("tool_timeout_secs", &self.tool_timeout_secs)
            .field("model_max_attempts", &self.model_max_attempts)
            .field("default_conversation", &self.default_conversation)
            .field("search_max_results", &self.search_max_results)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_base_url", &self.openai_base_url)
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("tavily_base_url", &self.tavily_base_url)
            .finish_non_exhaustive()
    }
}

impl ConfidantConfig {
    /// Load defaults, then the config file (if any), then the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfidantError> {
        let _ = dotenvy::dotenv();

        let path = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| Self::default_path().filter(|p| p.exists()));

        let mut config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Platform config location, e.g. `~/.config/confidant/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "confidant")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfidantError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfidantError> {
        toml::from_str(raw)
            .map_err(|e| ConfidantError::Configuration(format!("invalid config file: {e}")))
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfidantError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = non_empty("OPENAI_BASE_URL") {
            self.openai_base_url = Some(v);
        }
        if let Some(v) = non_empty("TAVILY_API_KEY") {
            self.tavily_api_key = Some(v);
        }
        if let Some(v) = non_empty("TAVILY_BASE_URL") {
            self.tavily_base_url = Some(v);
        }
        if let Some(v) = non_empty("CONFIDANT_MODEL") {
            self.model = v;
        }
        if let Some(v) = non_empty("PORT") {
            self.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = non_empty("CONFIDANT_MAX_TOOL_ROUNDS") {
            self.max_tool_rounds = parse_env("CONFIDANT_MAX_TOOL_ROUNDS", &v)?;
        }
        Ok(())
    }

    /// Fail early when the model credential is missing.
    pub fn validate(&self) -> Result<(), ConfidantError> {
        if self.openai_api_key.is_none() {
            return Err(ConfidantError::Configuration(
                "OPENAI_API_KEY is not set".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfidantError::Configuration("model must not be empty".into()));
        }
        Ok(())
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn turn_limits(&self) -> TurnLimits {
        TurnLimits {
            max_tool_rounds: self.max_tool_rounds,
            model_timeout: self.model_timeout(),
            tool_timeout: self.tool_timeout(),
            model_retry: RetryPolicy {
                max_attempts: self.model_max_attempts.max(1),
                ..RetryPolicy::default()
            },
        }
    }

    pub fn prompt_template(&self) -> PromptTemplate {
        PromptTemplate::new(
            self.instructions.as_deref().unwrap_or(DEFAULT_TEMPLATE),
            self.system_message.as_deref().unwrap_or(DEFAULT_SYSTEM_MESSAGE),
        )
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.temperature)
            .build()
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfidantError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfidantError::Configuration(format!("{key} has invalid value '{value}'")))
}
