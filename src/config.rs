//! Configuration file support.
//!
//! TagFlow runs with built-in defaults when no config file is present. An
//! optional `tagflow.json` (or a file passed via `--config`) overrides file
//! locations and paste timing.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::parse_confirm_key;
use crate::error::{Result, TagFlowError};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "tagflow.json";

/// Application configuration.
///
/// All fields have defaults, so an empty JSON object `{}` is a valid config.
/// Durations are human-readable strings: `"100ms"`, `"1s"`, `"2m"`, or bare
/// milliseconds like `"250"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File the tags are read from, one tag per line.
    #[serde(default = "default_tags_file")]
    pub tags_file: PathBuf,

    /// Theme applied at startup.
    #[serde(default = "default_theme_file")]
    pub theme_file: PathBuf,

    /// Directory the theme chooser starts in.
    #[serde(default = "default_themes_dir")]
    pub themes_dir: PathBuf,

    /// Wait between the paste chord and the confirm keystroke, so the target
    /// application has time to register the paste.
    #[serde(default = "default_paste_delay", with = "duration_format")]
    pub paste_delay: Duration,

    /// Wait between consecutive autotyper pastes.
    #[serde(default = "default_autotype_interval", with = "duration_format")]
    pub autotype_interval: Duration,

    /// Keystroke sent after each paste: `"enter"`, `"tab"`, `"space"`,
    /// `"escape"`, a single character, or `"none"` to disable it.
    #[serde(default = "default_confirm_key")]
    pub confirm_key: String,
}

fn default_tags_file() -> PathBuf {
    PathBuf::from("tags.txt")
}

fn default_theme_file() -> PathBuf {
    PathBuf::from("themes/silver-glow.json")
}

fn default_themes_dir() -> PathBuf {
    PathBuf::from("themes")
}

fn default_paste_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_autotype_interval() -> Duration {
    Duration::from_millis(100)
}

fn default_confirm_key() -> String {
    "enter".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags_file: default_tags_file(),
            theme_file: default_theme_file(),
            themes_dir: default_themes_dir(),
            paste_delay: default_paste_delay(),
            autotype_interval: default_autotype_interval(),
            confirm_key: default_confirm_key(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|e| TagFlowError::config_load(path, e.to_string()))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| TagFlowError::config_load(path, e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TagFlowError::config_save(path, e.to_string()))?;
        fs::write(path, contents).map_err(|e| TagFlowError::config_save(path, e.to_string()))?;
        Ok(())
    }

    /// Load from an explicit path, or from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, or fall back to defaults.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
                    Self::from_file(DEFAULT_CONFIG_FILE)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.tags_file.as_os_str().is_empty() {
            return Err(TagFlowError::config_validation("tags_file cannot be empty"));
        }
        if self.tags_file.file_name().is_none() {
            return Err(TagFlowError::config_validation(
                "tags_file must name a file, not a directory",
            ));
        }
        // Rejects unknown confirm keys up front instead of at first paste.
        parse_confirm_key(&self.confirm_key)?;
        Ok(())
    }
}

/// Parse a human-readable duration string.
///
/// Accepts `ms`, `s` and `m` suffixes (case-insensitive) and bare numbers,
/// which are treated as milliseconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(TagFlowError::invalid_duration(value, "empty duration"));
    }

    let (number, unit_ms) = if let Some(n) = normalized.strip_suffix("ms") {
        (n, 1u64)
    } else if let Some(n) = normalized.strip_suffix('s') {
        (n, 1_000u64)
    } else if let Some(n) = normalized.strip_suffix('m') {
        (n, 60_000u64)
    } else {
        (normalized.as_str(), 1u64)
    };

    let amount: u64 = number
        .trim()
        .parse()
        .map_err(|_| TagFlowError::invalid_duration(value, "expected a non-negative number"))?;

    Ok(Duration::from_millis(amount.saturating_mul(unit_ms)))
}

/// Serde adapter storing durations as `"<millis>ms"` strings.
mod duration_format {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}ms", duration.as_millis()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        super::parse_duration(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tags_file, PathBuf::from("tags.txt"));
        assert_eq!(config.theme_file, PathBuf::from("themes/silver-glow.json"));
        assert_eq!(config.themes_dir, PathBuf::from("themes"));
        assert_eq!(config.paste_delay, Duration::from_millis(100));
        assert_eq!(config.autotype_interval, Duration::from_millis(100));
        assert_eq!(config.confirm_key, "enter");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0ms").unwrap(), Duration::from_millis(0));
        assert_eq!(parse_duration("1000").unwrap(), Duration::from_millis(1000));
        assert_eq!(parse_duration("5S").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration(" 2m ").unwrap(), Duration::from_secs(120));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("1000x").is_err());
        assert!(parse_duration("-1000ms").is_err());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config {
            tags_file: PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.tags_file = PathBuf::from("tags.txt");
        config.confirm_key = "super+hyper".to_string();
        assert!(config.validate().is_err());

        config.confirm_key = "none".to_string();
        assert!(config.validate().is_ok());
    }
}
