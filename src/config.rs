use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_primo: ServerSettings,
    pub server_vufind: ServerSettings,
    pub ai: AiSettings,
    pub primo: PrimoSettings,
    pub vufind: VuFindSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Settings for the OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    pub api_url: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub translation_max_tokens: Option<u32>,
    pub summary_max_tokens: Option<u32>,
    pub translation_timeout_secs: Option<u64>,
    pub summary_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrimoSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub scope: Option<String>,
    pub tab: Option<String>,
    pub vid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VuFindSettings {
    pub endpoint: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_model() -> String { "gpt-4".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Configuration file (config/default.toml)
    /// 2. Local config file (config/local.toml)
    /// 3. Environment variables (prefixed with MAIDISCO_)
    /// 4. The plain env var names documented in .env.example (OPENAI_API_KEY, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with MAIDISCO_)
            // e.g., MAIDISCO_SERVER_PRIMO__PORT -> server_primo.port
            .add_source(
                Environment::with_prefix("MAIDISCO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Apply the flat env var names the original deployment documented
        settings = substitute_env_vars(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MAIDISCO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// The AI key is the one setting nothing works without
    fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "OPENAI_API_KEY (ai.api_key) is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Apply overrides from the flat env var names used by the original .env layout
/// (OPENAI_API_KEY, PRIMO_SEARCH_ENDPOINT, VUFIND_SEARCH_ENDPOINT, ...)
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    let overrides = [
        ("ai.api_key", "OPENAI_API_KEY"),
        ("ai.api_url", "OPENAI_API_URL"),
        ("ai.model", "OPENAI_MODEL"),
        ("primo.endpoint", "PRIMO_SEARCH_ENDPOINT"),
        ("primo.api_key", "PRIMO_APIKEY"),
        ("primo.scope", "PRIMO_SCOPE"),
        ("primo.tab", "PRIMO_TAB"),
        ("primo.vid", "PRIMO_VID"),
        ("vufind.endpoint", "VUFIND_SEARCH_ENDPOINT"),
    ];

    for (key, var) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings(api_key: &str) -> Settings {
        Settings {
            server_primo: ServerSettings { host: "127.0.0.1".into(), port: 5555, workers: None },
            server_vufind: ServerSettings { host: "127.0.0.1".into(), port: 5001, workers: None },
            ai: AiSettings {
                api_url: "https://api.openai.com/v1".into(),
                api_key: api_key.into(),
                model: default_model(),
                translation_max_tokens: None,
                summary_max_tokens: None,
                translation_timeout_secs: None,
                summary_timeout_secs: None,
            },
            primo: PrimoSettings {
                endpoint: "https://primo.example.com/primo/v1/search".into(),
                api_key: None,
                scope: None,
                tab: None,
                vid: None,
            },
            vufind: VuFindSettings { endpoint: "https://vufind.example.com/api/search".into() },
            search: SearchSettings { max_results: None },
            logging: LoggingSettings { level: default_log_level(), format: default_log_format() },
        }
    }

    #[test]
    fn test_default_model() {
        assert_eq!(default_model(), "gpt-4");
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_validate_rejects_blank_api_key() {
        assert!(test_settings("  ").validate().is_err());
        assert!(test_settings("").validate().is_err());
    }

    #[test]
    fn test_validate_accepts_api_key() {
        assert!(test_settings("sk-test").validate().is_ok());
    }
}
