//! TOML Configuration File Support
//!
//! Configuration lives at `~/.config/panelstack/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [display]
//! dim_backdrop = true
//! backdrop_fg = "#555555"
//!
//! [events]
//! stale_results = "base"
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Stale Result Policy
// =============================================================================

/// What happens to a deferred result whose originating panel no longer owns focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleResultPolicy {
    /// Deliver to the base view so it can refresh itself
    #[default]
    Base,
    /// Deliver to whichever panel currently owns focus
    Route,
    /// Discard the result
    Drop,
}

impl FromStr for StaleResultPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "route" => Ok(Self::Route),
            "drop" => Ok(Self::Drop),
            other => Err(ConfigError::ValidationError(format!(
                "unknown stale result policy '{other}' (expected base, route or drop)"
            ))),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Dim the base view behind centered panels
    pub dim_backdrop: Option<bool>,

    /// Backdrop foreground color (`#rrggbb` or a color name)
    pub backdrop_fg: Option<String>,
}

/// Events section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsToml {
    /// Policy for deferred results whose panel has closed
    pub stale_results: Option<StaleResultPolicy>,
}

/// Root TOML document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigToml {
    pub display: DisplayToml,
    pub events: EventsToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub dim_backdrop: bool,
    pub backdrop_fg: Option<Color>,
    pub stale_results: StaleResultPolicy,
    /// File the configuration was read from, if any
    pub config_file_path: Option<PathBuf>,
    /// Where the highest-priority value came from
    pub source: ConfigSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dim_backdrop: true,
            backdrop_fg: None,
            stale_results: StaleResultPolicy::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

/// Parse `#rrggbb` or a crossterm color name such as `dark_grey`
pub fn parse_color(value: &str) -> Result<Color, ConfigError> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(Color::Rgb { r, g, b });
            }
        }
        return Err(ConfigError::ValidationError(format!(
            "invalid hex color '{value}'"
        )));
    }
    Color::try_from(value.to_lowercase().as_str())
        .map_err(|_| ConfigError::ValidationError(format!("unknown color '{value}'")))
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("panelstack").join("config.toml"))
}

/// Load configuration from the default path, then the environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if a
/// value fails validation. A missing config file is not an error.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the environment
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ConfigToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config)?;

    Ok(config)
}

fn apply_toml_config(config: &mut Config, toml: &ConfigToml) -> Result<(), ConfigError> {
    if let Some(dim) = toml.display.dim_backdrop {
        config.dim_backdrop = dim;
    }
    if let Some(ref fg) = toml.display.backdrop_fg {
        config.backdrop_fg = Some(parse_color(fg)?);
    }
    if let Some(policy) = toml.events.stale_results {
        config.stale_results = policy;
    }
    Ok(())
}

fn apply_env_config(config: &mut Config) -> Result<(), ConfigError> {
    if let Ok(dim) = std::env::var("PANELSTACK_DIM_BACKDROP") {
        config.dim_backdrop = dim != "0" && dim.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Ok(fg) = std::env::var("PANELSTACK_BACKDROP_FG") {
        config.backdrop_fg = Some(parse_color(&fg)?);
        config.source = ConfigSource::Env;
    }
    if let Ok(policy) = std::env::var("PANELSTACK_STALE_RESULTS") {
        config.stale_results = policy.parse()?;
        config.source = ConfigSource::Env;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Environment variables are process-global; serialize the tests that touch them
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_config_env_vars() {
        std::env::remove_var("PANELSTACK_DIM_BACKDROP");
        std::env::remove_var("PANELSTACK_BACKDROP_FG");
        std::env::remove_var("PANELSTACK_STALE_RESULTS");
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.dim_backdrop);
        assert_eq!(config.backdrop_fg, None);
        assert_eq!(config.stale_results, StaleResultPolicy::Base);
        assert_eq!(config.source, ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("panelstack"));
            assert!(p.to_string_lossy().ends_with("config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let file = write_config(
            r##"
[display]
dim_backdrop = false
backdrop_fg = "#102030"

[events]
stale_results = "drop"
"##,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        assert!(!config.dim_backdrop);
        assert_eq!(
            config.backdrop_fg,
            Some(Color::Rgb {
                r: 0x10,
                g: 0x20,
                b: 0x30
            })
        );
        assert_eq!(config.stale_results, StaleResultPolicy::Drop);
        assert_eq!(config.source, ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let file = write_config("[events]\nstale_results = \"route\"\n");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        assert!(config.dim_backdrop);
        assert_eq!(config.stale_results, StaleResultPolicy::Route);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let file = write_config("[display\ndim_backdrop = ");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_color_is_validation_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let file = write_config("[display]\nbackdrop_fg = \"#12\"\n");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let config =
            load_config_from_path(Some(PathBuf::from("/nonexistent/panelstack.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        let file = write_config("[display]\ndim_backdrop = true\n");
        std::env::set_var("PANELSTACK_DIM_BACKDROP", "0");
        std::env::set_var("PANELSTACK_STALE_RESULTS", "Route");

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        clear_config_env_vars();

        assert!(!config.dim_backdrop);
        assert_eq!(config.stale_results, StaleResultPolicy::Route);
        assert_eq!(config.source, ConfigSource::Env);
    }

    #[test]
    fn test_env_bad_policy_is_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_config_env_vars();

        std::env::set_var("PANELSTACK_STALE_RESULTS", "sometimes");
        let result = load_config_from_path(None);
        clear_config_env_vars();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_parse_color_names() {
        assert_eq!(parse_color("dark_grey").unwrap(), Color::DarkGrey);
        assert_eq!(parse_color("Blue").unwrap(), Color::Blue);
        assert!(parse_color("not-a-color").is_err());
    }
}
