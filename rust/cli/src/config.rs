//! Layered CLI configuration: defaults, then a TOML file named by
//! `NEKOMEMO_CONFIG`, then `NEKOMEMO_*` environment variables.
//!
//! ```toml
//! level = 17
//! seed = 42
//! bot = "forgetful"
//!
//! [tuning]
//! check_delay_secs = 0.8
//! shuffle_threshold = 4
//! ```

use nekomemo_ai::PLAYER_KINDS;
use nekomemo_engine::level::LEVEL_COUNT;
use nekomemo_engine::tuning::SessionTuning;
use serde::{Deserialize, Serialize};
use std::fs;

pub const ENV_CONFIG: &str = "NEKOMEMO_CONFIG";
pub const ENV_SEED: &str = "NEKOMEMO_SEED";
pub const ENV_LEVEL: &str = "NEKOMEMO_LEVEL";
pub const ENV_BOT: &str = "NEKOMEMO_BOT";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global level id used when `sim` gets no `--level`
    pub level: u32,
    pub seed: Option<u64>,
    /// Player kind for `sim`
    pub bot: String,
    pub tuning: SessionTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub level: ValueSource,
    pub seed: ValueSource,
    pub bot: ValueSource,
    pub tuning: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            level: ValueSource::Default,
            seed: ValueSource::Default,
            bot: ValueSource::Default,
            tuning: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: 0,
            seed: None,
            bot: "perfect".into(),
            tuning: SessionTuning::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolves the configuration against an arbitrary variable lookup.
pub fn resolve<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env(ENV_CONFIG).filter(|p| !p.is_empty()) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.level {
            cfg.level = v;
            sources.level = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.bot {
            cfg.bot = v;
            sources.bot = ValueSource::File;
        }
        if let Some(v) = f.tuning {
            cfg.tuning = v;
            sources.tuning = ValueSource::File;
        }
    }

    if let Some(seed) = env(ENV_SEED)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(level) = env(ENV_LEVEL)
        && !level.is_empty()
    {
        cfg.level = level
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid level: {}", level)))?;
        sources.level = ValueSource::Env;
    }
    if let Some(bot) = env(ENV_BOT)
        && !bot.is_empty()
    {
        cfg.bot = bot.to_ascii_lowercase();
        sources.bot = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    bot: Option<String>,
    #[serde(default)]
    tuning: Option<SessionTuning>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.level >= LEVEL_COUNT {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: level must be < {}",
            LEVEL_COUNT
        )));
    }
    if !PLAYER_KINDS.contains(&cfg.bot.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: bot must be one of {}",
            PLAYER_KINDS.join(", ")
        )));
    }
    cfg.tuning
        .validate()
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}
