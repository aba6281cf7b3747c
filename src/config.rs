//! Configuration module for yadns
//!
//! This module handles loading and validating configuration from the JSON
//! config file and environment variables.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_TIMEOUT_SECS, ENV_DOMAIN, ENV_STRICT, ENV_TOKEN,
    MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
use crate::error::{Error, Result};
use crate::validation::validate_domain;

//==============================================================================
// Config
//==============================================================================

/// Configuration for one yadns run
///
/// # Fields
///
/// - `domain`: zone managed through PDD (e.g. "example.com")
/// - `token`: PDD administrator token
/// - `timeout`: provider HTTP request timeout
/// - `strict`: turn logical API failures into errors
/// - `verbose`: enable debug logging
///
/// # Configuration Loading Priority
///
/// 1. Environment variables (highest priority)
/// 2. Config file (`~/.yandexdns.json` or custom path)
/// 3. Defaults (lowest priority)
///
/// The file itself is mandatory.
#[derive(Debug, Clone)]
pub struct Config {
    pub domain: String,
    /// PDD token, sent as the `PddToken` header; wiped from memory on drop
    ///
    /// Can be set via the `YADNS_TOKEN` environment variable.
    pub token: Zeroizing<String>,
    /// HTTP request timeout for provider calls
    ///
    /// Default: 10 seconds
    pub timeout: Duration,
    /// Default: true
    pub strict: bool,
    pub verbose: bool,
}

impl Config {
    /// Loads configuration from file and environment variables
    ///
    /// `None` means the default path, `~/.yandexdns.json`. The path is
    /// normalized with [`normalize_path`] before it is opened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is missing or not valid JSON,
    /// if `domain` or `token` is absent after environment overrides, or if a
    /// value is out of range.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => normalize_path(&p.to_string_lossy()),
            None => normalize_path(DEFAULT_CONFIG_PATH),
        };
        let mut config = Self::load_from_file(&path)?;
        Self::override_with_env(&mut config)?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let json_config: JsonConfig = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;

        Ok(Self {
            domain: json_config.domain.unwrap_or_default(),
            token: Zeroizing::new(json_config.token.unwrap_or_default()),
            timeout: Duration::from_secs(json_config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            strict: json_config.strict.unwrap_or(true),
            verbose: json_config.verbose.unwrap_or(false),
        })
    }

    /// Non-empty environment variables replace file values
    fn override_with_env(config: &mut Self) -> Result<()> {
        if let Ok(v) = env::var(ENV_DOMAIN) {
            if !v.is_empty() {
                config.domain = v;
            }
        }
        if let Ok(v) = env::var(ENV_TOKEN) {
            if !v.is_empty() {
                config.token = Zeroizing::new(v);
            }
        }
        if let Ok(v) = env::var(ENV_STRICT) {
            if !v.is_empty() {
                config.strict = parse_bool_env(&v)
                    .map_err(|e| Error::config(format!("Invalid {} value: {}", ENV_STRICT, e)))?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.domain.is_empty() {
            return Err(Error::config("Missing domain"));
        }
        validate_domain(&self.domain)?;

        if self.token.trim().is_empty() {
            return Err(Error::config("Missing token"));
        }

        let timeout_secs = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(Error::config(format!(
                "timeout must be between {} and {} seconds, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, timeout_secs
            )));
        }

        Ok(())
    }
}

/// Parses a boolean value from an environment variable
///
/// Accepts "1"/"true"/"yes"/"on" and "0"/"false"/"no"/"off".
fn parse_bool_env(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected boolean (true/false/1/0/yes/no/on/off)".to_string()),
    }
}

/// JSON configuration file structure
///
/// ```json
/// { "token": "<YOUR_PDD_TOKEN>", "domain": "example.com" }
/// ```
#[derive(Debug, serde::Deserialize)]
struct JsonConfig {
    domain: Option<String>,
    token: Option<String>,
    timeout: Option<u64>,
    strict: Option<bool>,
    verbose: Option<bool>,
}

//==============================================================================
// Paths
//==============================================================================

/// Normalizes a user-supplied path
///
/// The string is put in Unicode NFC form, backslashes become slashes and a
/// leading `~` is expanded to the home directory. Repeated slashes are
/// collapsed and a trailing slash is dropped.
pub fn normalize_path(path: &str) -> PathBuf {
    let mut result: String = path.nfc().collect::<String>().replace('\\', "/");

    if result == "~" || result.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            result = format!("{}{}", home.to_string_lossy(), &result[1..]);
        }
    }

    while result.contains("//") {
        result = result.replace("//", "/");
    }
    if result.len() > 1 {
        while result.ends_with('/') {
            result.pop();
        }
    }

    PathBuf::from(result)
}

/// Writes `value` as JSON to a normalized path
pub fn save_json<T: Serialize>(value: &T, path: &str) -> Result<PathBuf> {
    let path = normalize_path(path);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

//==============================================================================
// Tests
//==============================================================================
