use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::lyrics::alignment::{AlignmentMatcher, DEFAULT_CANDIDATE_WINDOW_MS, DEFAULT_NEAREST_FALLBACK_MS};
use crate::lyrics::merge::MergeOptions;
use crate::lyrics::parser::DuplicateTextPolicy;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Feature toggles read on every lookup
    #[serde(default)]
    pub merge: MergeToggles,

    /// Alignment thresholds
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Merge strategy
    #[serde(default)]
    pub strategy: MergeStrategy,

    /// How same-timestamp lines of one track are combined
    #[serde(default)]
    pub duplicate_text: DuplicateTextPolicy,

    /// Lyric catalog settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Boolean feature switches
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MergeToggles {
    // @field: Attach translation lines
    #[serde(default = "default_true")]
    pub enable_translation: bool,

    // @field: Attach romanization lines
    #[serde(default, alias = "enable_roman")]
    pub enable_romanization: bool,

    // @field: Use the word-level track when present
    #[serde(default = "default_true")]
    pub enable_word_level: bool,

    // @field: Master switch for lookups
    #[serde(default = "default_true")]
    pub enable_plugin: bool,

    // @field: Dispatch lookup events to the notification sink
    #[serde(default = "default_true")]
    pub show_notifications: bool,
}

impl Default for MergeToggles {
    fn default() -> Self {
        Self {
            enable_translation: true,
            enable_romanization: false,
            enable_word_level: true,
            enable_plugin: true,
            show_notifications: true,
        }
    }
}

/// Alignment thresholds for matching word lines onto the plain track
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentConfig {
    /// Half-width of the candidate window in milliseconds
    #[serde(default = "default_candidate_window_ms")]
    pub candidate_window_ms: u64,

    /// Maximum distance for a match based on time alone
    #[serde(default = "default_nearest_fallback_ms")]
    pub nearest_fallback_ms: u64,

    /// Emit plain/translation/romanization lines no word line consumed
    #[serde(default = "default_true")]
    pub carry_unmatched_lines: bool,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            candidate_window_ms: default_candidate_window_ms(),
            nearest_fallback_ms: default_nearest_fallback_ms(),
            carry_unmatched_lines: true,
        }
    }
}

/// Merge strategy
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Word-level aware merge with alignment and credit suppression
    #[default]
    Layered,
    /// One `[time]text` line per distinct text, all tracks pooled by timestamp
    Legacy,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Layered => write!(f, "layered"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl std::str::FromStr for MergeStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "layered" => Ok(Self::Layered),
            "legacy" => Ok(Self::Legacy),
            _ => Err(anyhow!("Invalid merge strategy: {}", s)),
        }
    }
}

/// Lyric catalog (search and fetch) configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    // @field: Search endpoint (form POST)
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    // @field: Lyric endpoint (GET)
    #[serde(default = "default_lyric_endpoint")]
    pub lyric_endpoint: String,

    // @field: Connect and request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Referer header sent with search requests
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            lyric_endpoint: default_lyric_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            referer: default_referer(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_candidate_window_ms() -> u64 {
    DEFAULT_CANDIDATE_WINDOW_MS
}

fn default_nearest_fallback_ms() -> u64 {
    DEFAULT_NEAREST_FALLBACK_MS
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_search_endpoint() -> String {
    "http://music.163.com/api/search/get/".to_string()
}

fn default_lyric_endpoint() -> String {
    "http://music.163.com/api/song/lyric".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_referer() -> String {
    "http://music.163.com/".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.provider.search_endpoint)
            .with_context(|| format!("Invalid search endpoint: {}", self.provider.search_endpoint))?;
        Url::parse(&self.provider.lyric_endpoint)
            .with_context(|| format!("Invalid lyric endpoint: {}", self.provider.lyric_endpoint))?;

        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("Provider timeout must be at least one second"));
        }

        if self.alignment.nearest_fallback_ms > self.alignment.candidate_window_ms {
            return Err(anyhow!(
                "nearest_fallback_ms ({}) cannot exceed candidate_window_ms ({})",
                self.alignment.nearest_fallback_ms,
                self.alignment.candidate_window_ms
            ));
        }

        Ok(())
    }

    /// Options for one merge call built from this snapshot
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            toggles: self.merge,
            matcher: AlignmentMatcher::new(
                self.alignment.candidate_window_ms,
                self.alignment.nearest_fallback_ms,
            ),
            strategy: self.strategy,
            duplicate_text: self.duplicate_text,
            carry_unmatched_lines: self.alignment.carry_unmatched_lines,
        }
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the file at `path`, writing a default one first when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Where the configuration comes from.
///
/// A file-backed store is re-read on every `snapshot`, so edits take effect
/// on the next lookup and never in the middle of one.
#[derive(Debug, Clone)]
pub enum ConfigStore {
    /// Re-read from disk on each snapshot; a missing file means defaults
    File(PathBuf),
    /// Fixed in memory
    Fixed(Config),
}

impl ConfigStore {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        Self::File(path.into())
    }

    /// Take a validated snapshot of the current configuration
    pub fn snapshot(&self) -> Result<Config> {
        let config = match self {
            Self::File(path) if path.exists() => Config::from_file(path)?,
            Self::File(_) => Config::default(),
            Self::Fixed(config) => config.clone(),
        };

        config.validate().context("Configuration validation failed")?;
        Ok(config)
    }
}
