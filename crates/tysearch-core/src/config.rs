//! Configuration types for tysearch.
//!
//! [`Config::load`] layers `~/.config/tysearch/config.toml` (or an explicit
//! path) and `TYSEARCH__*` environment variables over the embedded defaults.
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[search]
default_limit = 50
min_score     = 30.0

[parser]
effect_constructors = [
    "Effect", "Stream", "Layer", "Option", "Either", "Exit", "Cause",
    "Schedule", "Scope", "Fiber", "Ref", "Queue", "PubSub", "Deferred",
    "Chunk", "Context", "Schema", "Config", "Sink", "Channel", "STM",
]
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/tysearch/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub parser: ParserConfig,
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Hits must score strictly above this to be kept.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_limit() -> usize { crate::search::DEFAULT_LIMIT }
fn default_min_score() -> f64 { crate::search::DEFAULT_MIN_SCORE }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            min_score: default_min_score(),
        }
    }
}

/// `[parser]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    /// Constructor names parsed as `effect` rather than `generic`.
    #[serde(default = "default_effect_constructors")]
    pub effect_constructors: Vec<String>,
}

pub(crate) fn default_effect_constructors() -> Vec<String> {
    crate::parser::CORE_CONTAINERS
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            effect_constructors: default_effect_constructors(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the user config layered on top of the built-in defaults.
    ///
    /// `path` overrides the XDG location. A missing file is not an error;
    /// nothing is ever written.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(config::Environment::with_prefix("TYSEARCH").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("tysearch")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
