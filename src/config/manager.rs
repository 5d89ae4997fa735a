use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;
use crate::translation::GOOGLE_DEFAULT_ENDPOINT;

const DEFAULT_TOKEN_ENV: &str = "BOT_TOKEN";
const DEFAULT_GOOGLE_KEY_ENV: &str = "GOOGLE_API_KEY";
const DEFAULT_POLL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 3600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Settings in the `[bot]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot token stored directly in config (not recommended).
    pub token: Option<String>,
    /// Environment variable containing the bot token. Defaults to `BOT_TOKEN`.
    pub token_env: Option<String>,
    /// Long-poll timeout for `getUpdates`, in seconds.
    pub poll_timeout_secs: Option<u64>,
}

/// Which translation backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Cloud Translation v2.
    #[default]
    Google,
    /// Any OpenAI-compatible chat completions endpoint.
    ChatCompletions,
}

/// Settings in the `[provider]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    /// API base URL. Required for `chat_completions`.
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    pub api_key: Option<String>,
    /// Environment variable containing the API key.
    pub api_key_env: Option<String>,
    /// Model name, for `chat_completions` only.
    pub model: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Locale used for language names in `/languages`.
    pub languages_locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the `SQLite` database.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds a direction selection may wait for text before it expires.
    pub idle_timeout_secs: Option<u64>,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: Option<u64>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/elarion/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Reads a secret, preferring the environment variable over the inline value.
fn read_secret(inline: Option<&String>, env_var: Option<&str>) -> Option<String> {
    if let Some(env_var) = env_var
        && let Ok(value) = std::env::var(env_var)
        && !value.is_empty()
    {
        return Some(value);
    }
    inline.filter(|v| !v.is_empty()).cloned()
}

impl BotConfig {
    fn token_env(&self) -> &str {
        self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)
    }

    pub fn get_token(&self) -> Option<String> {
        read_secret(self.token.as_ref(), Some(self.token_env()))
    }
}

impl ProviderConfig {
    fn api_key_env(&self) -> Option<&str> {
        match (self.api_key_env.as_deref(), self.kind) {
            (Some(env), _) => Some(env),
            (None, ProviderKind::Google) => Some(DEFAULT_GOOGLE_KEY_ENV),
            (None, ProviderKind::ChatCompletions) => None,
        }
    }

    pub fn get_api_key(&self) -> Option<String> {
        read_secret(self.api_key.as_ref(), self.api_key_env())
    }
}

/// Provider settings after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedProvider {
    Google {
        endpoint: String,
        api_key: String,
    },
    ChatCompletions {
        endpoint: String,
        model: String,
        api_key: Option<String>,
    },
}

/// Resolved configuration after merging CLI arguments, config file and defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub bot_token: Option<String>,
    pub poll_timeout: Duration,
    pub provider: ResolvedProvider,
    pub provider_timeout: Duration,
    pub languages_locale: String,
    pub db_path: PathBuf,
    pub session_idle_timeout: Duration,
    pub session_sweep_interval: Duration,
}

impl ResolvedConfig {
    /// Returns the bot token, or an actionable error when it is missing.
    pub fn require_bot_token(&self, config_file: &ConfigFile) -> Result<&str> {
        self.bot_token.as_deref().ok_or_else(|| {
            let env_var = config_file.bot.token_env();
            anyhow::anyhow!(
                "Missing required configuration: bot token\n\n\
                 Set the {env_var} environment variable:\n  \
                 export {env_var}=\"123456:ABC...\"\n\n\
                 Or set token in the [bot] section of ~/.config/elarion/config.toml"
            )
        })
    }
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Database path override.
    pub db_path: Option<PathBuf>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// # Errors
///
/// Returns an error if the provider is missing a required API key,
/// endpoint or model, or if no database location can be determined.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let provider_config = &config_file.provider;

    let provider = match provider_config.kind {
        ProviderKind::Google => {
            let Some(api_key) = provider_config.get_api_key() else {
                let env_var = provider_config
                    .api_key_env()
                    .unwrap_or(DEFAULT_GOOGLE_KEY_ENV);
                bail!(
                    "Provider 'google' requires an API key\n\n\
                     Set the {env_var} environment variable:\n  \
                     export {env_var}=\"your-api-key\"\n\n\
                     Or set api_key in the [provider] section of ~/.config/elarion/config.toml"
                );
            };
            ResolvedProvider::Google {
                endpoint: provider_config
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| GOOGLE_DEFAULT_ENDPOINT.to_string()),
                api_key,
            }
        }
        ProviderKind::ChatCompletions => {
            let endpoint = provider_config.endpoint.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "Missing required configuration: 'endpoint'\n\n\
                     Provider 'chat_completions' needs endpoint in the [provider] section \
                     of ~/.config/elarion/config.toml"
                )
            })?;
            let model = provider_config.model.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "Missing required configuration: 'model'\n\n\
                     Provider 'chat_completions' needs model in the [provider] section \
                     of ~/.config/elarion/config.toml"
                )
            })?;
            ResolvedProvider::ChatCompletions {
                endpoint,
                model,
                api_key: provider_config.get_api_key(),
            }
        }
    };

    let db_path = match options
        .db_path
        .as_ref()
        .or(config_file.storage.path.as_ref())
    {
        Some(path) => path.clone(),
        None => paths::default_db_path()?,
    };

    let secs = |value: Option<u64>, default: u64| Duration::from_secs(value.unwrap_or(default));

    Ok(ResolvedConfig {
        bot_token: config_file.bot.get_token(),
        poll_timeout: secs(config_file.bot.poll_timeout_secs, DEFAULT_POLL_TIMEOUT_SECS),
        provider,
        provider_timeout: secs(provider_config.timeout_secs, DEFAULT_PROVIDER_TIMEOUT_SECS),
        languages_locale: provider_config
            .languages_locale
            .clone()
            .unwrap_or_else(|| crate::pipeline::DEFAULT_LANGUAGES_LOCALE.to_string()),
        db_path,
        session_idle_timeout: secs(
            config_file.session.idle_timeout_secs,
            DEFAULT_IDLE_TIMEOUT_SECS,
        ),
        session_sweep_interval: secs(
            config_file.session.sweep_interval_secs,
            DEFAULT_SWEEP_INTERVAL_SECS,
        )
        .max(Duration::from_secs(1)),
    })
}

/// Template written by `elarion config --init`.
pub const CONFIG_TEMPLATE: &str = r#"[bot]
token_env = "BOT_TOKEN"
poll_timeout_secs = 10

[provider]
kind = "google"
api_key_env = "GOOGLE_API_KEY"
timeout_secs = 30
languages_locale = "ru"

# kind = "chat_completions"
# endpoint = "http://localhost:11434"
# model = "gemma3:12b"

[storage]
# path = "/var/lib/elarion/trans.db"

[session]
idle_timeout_secs = 3600
sweep_interval_secs = 300
"#;

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/elarion/config.toml`
    /// or `~/.config/elarion/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Uses an explicit config file path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    /// Loads the config file, or defaults when it does not exist.
    ///
    /// Unlike a missing file, a file that exists but fails to parse is an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        self.write_raw(&contents)
    }

    /// Writes the commented template, refusing to overwrite an existing file.
    pub fn init_template(&self) -> Result<()> {
        if self.exists() {
            bail!(
                "Config file already exists: {}",
                self.config_path.display()
            );
        }
        self.write_raw(CONFIG_TEMPLATE)
    }

    /// Writes through a temp file and rename so a crash never leaves a
    /// half-written config behind.
    fn write_raw(&self, contents: &str) -> Result<()> {
        let parent = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;

        let file_name = self
            .config_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        let temp_path = parent.join(format!(".{file_name}.tmp"));

        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write config file: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.config_path).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }
}
