//! TOML Configuration File Support
//!
//! Centralized configuration for the reveal, loaded from
//! `~/.config/quote-reveal/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! url = "https://dummyjson.com/quotes"
//! timeout_secs = 10
//!
//! [timing]
//! settle_delay_ms = 500
//! hold_delay_ms = 5000
//! caption_delay_ms = 0
//! stagger_ms = 50
//! fade_ms = 500
//!
//! [visibility]
//! threshold = 0.1
//!
//! [palette]
//! colors = ["#13FFAA", "#1E67C6", "#CE84CF", "#DD335C"]
//! period_ms = 10000
//! frame_ms = 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{Rgb, DEFAULT_PALETTE};

/// Default quote endpoint
pub const DEFAULT_SOURCE_URL: &str = "https://dummyjson.com/quotes";

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

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
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
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Source section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceToml {
    /// Quote endpoint URL
    pub url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Delay between quote arrival and text reveal
    pub settle_delay_ms: Option<u64>,

    /// How long the text reveals before the caption is scheduled
    pub hold_delay_ms: Option<u64>,

    /// Extra delay between text revealed and caption revealed
    pub caption_delay_ms: Option<u64>,

    /// Per-glyph stagger offset
    pub stagger_ms: Option<u64>,

    /// Fade duration of one glyph or of the caption
    pub fade_ms: Option<u64>,
}

/// Visibility section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityToml {
    /// Visible fraction at which the quote counts as on-screen
    pub threshold: Option<f32>,
}

/// Palette section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteToml {
    /// Colors as `#RRGGBB`
    pub colors: Option<Vec<String>>,

    /// Duration of one pass through the palette
    pub period_ms: Option<u64>,

    /// How often the cycler publishes a color
    pub frame_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Quote source section
    pub source: SourceToml,

    /// Reveal timing section
    pub timing: TimingToml,

    /// Visibility section
    pub visibility: VisibilityToml,

    /// Palette section
    pub palette: PaletteToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Quote source settings
#[derive(Clone, Debug, PartialEq)]
pub struct SourceConfig {
    /// Endpoint URL
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Centralized configuration for the reveal
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    /// Quote source settings
    pub source: SourceConfig,

    /// Delay between quote arrival and text reveal (500 ms)
    pub settle_delay: Duration,

    /// How long the text reveals before the caption is scheduled (5000 ms)
    pub hold_delay: Duration,

    /// Delay between text revealed and caption revealed (0 ms)
    pub caption_delay: Duration,

    /// Per-glyph stagger offset (50 ms)
    pub stagger: Duration,

    /// Fade duration of one glyph or of the caption (500 ms)
    pub fade_duration: Duration,

    /// Visible fraction at which the quote counts as on-screen (0.1)
    pub visibility_threshold: f32,

    /// Palette colors, cycled in order
    pub palette: Vec<Rgb>,

    /// Duration of one pass through the palette (10 s)
    pub palette_period: Duration,

    /// How often the cycler publishes a color
    pub palette_frame: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Where the source URL came from
    url_source: ConfigSource,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            settle_delay: Duration::from_millis(500),
            hold_delay: Duration::from_millis(5000),
            caption_delay: Duration::ZERO,
            stagger: Duration::from_millis(50),
            fade_duration: Duration::from_millis(500),
            visibility_threshold: 0.1,
            palette: DEFAULT_PALETTE.to_vec(),
            palette_period: Duration::from_secs(10),
            palette_frame: Duration::from_millis(50),
            config_file_path: None,
            url_source: ConfigSource::Default,
        }
    }
}

impl RevealConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the source URL came from
    #[must_use]
    pub fn url_source(&self) -> ConfigSource {
        self.url_source
    }

    /// Check that values are usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "source url must not be empty".to_string(),
            ));
        }
        if self.source.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "source timeout must be greater than zero".to_string(),
            ));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "visibility threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if self.palette.len() < 2 {
            return Err(ConfigError::ValidationError(
                "palette needs at least 2 colors".to_string(),
            ));
        }
        if self.palette_period.is_zero() {
            return Err(ConfigError::ValidationError(
                "palette period must be greater than zero".to_string(),
            ));
        }
        if self.palette_frame.is_zero() {
            return Err(ConfigError::ValidationError(
                "palette frame interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/quote-reveal/config.toml` or
/// `~/.config/quote-reveal/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("quote-reveal").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<RevealConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the resulting values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<RevealConfig, ConfigError> {
    let mut config = RevealConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: RevealToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());

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

    apply_env_config(&mut config, |key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut RevealConfig, toml: &RevealToml) -> Result<(), ConfigError> {
    if let Some(ref url) = toml.source.url {
        config.source.url.clone_from(url);
        config.url_source = ConfigSource::File;
    }
    if let Some(secs) = toml.source.timeout_secs {
        config.source.timeout = Duration::from_secs(secs);
    }

    if let Some(ms) = toml.timing.settle_delay_ms {
        config.settle_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.hold_delay_ms {
        config.hold_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.caption_delay_ms {
        config.caption_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.stagger_ms {
        config.stagger = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.timing.fade_ms {
        config.fade_duration = Duration::from_millis(ms);
    }

    if let Some(threshold) = toml.visibility.threshold {
        config.visibility_threshold = threshold;
    }

    if let Some(ref colors) = toml.palette.colors {
        config.palette = colors
            .iter()
            .map(|c| c.parse::<Rgb>())
            .collect::<Result<_, _>>()
            .map_err(ConfigError::ValidationError)?;
    }
    if let Some(ms) = toml.palette.period_ms {
        config.palette_period = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.palette.frame_ms {
        config.palette_frame = Duration::from_millis(ms);
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut RevealConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("QUOTE_REVEAL_URL") {
        config.source.url = url;
        config.url_source = ConfigSource::Env;
    }
    if let Some(secs) = lookup("QUOTE_REVEAL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.source.timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = lookup("QUOTE_REVEAL_SETTLE_MS").and_then(|v| v.parse().ok()) {
        config.settle_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = lookup("QUOTE_REVEAL_HOLD_MS").and_then(|v| v.parse().ok()) {
        config.hold_delay = Duration::from_millis(ms);
    }
    if let Some(threshold) =
        lookup("QUOTE_REVEAL_VISIBILITY_THRESHOLD").and_then(|v| v.parse().ok())
    {
        config.visibility_threshold = threshold;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Source URL override
    pub url: Option<String>,

    /// Request timeout override (seconds)
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set source URL override
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set request timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden configuration is invalid.
    pub fn apply(&self, config: &mut RevealConfig) -> Result<(), ConfigError> {
        if let Some(ref url) = self.url {
            config.source.url.clone_from(url);
            config.url_source = ConfigSource::Cli;
        }
        if let Some(secs) = self.timeout_secs {
            config.source.timeout = Duration::from_secs(secs);
        }
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn parse(content: &str) -> Result<RevealConfig, ConfigError> {
        let toml: RevealToml = toml::from_str(content)?;
        let mut config = RevealConfig::default();
        apply_toml_config(&mut config, &toml)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_default_config() {
        let config = RevealConfig::default();
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.hold_delay, Duration::from_millis(5000));
        assert_eq!(config.caption_delay, Duration::ZERO);
        assert_eq!(config.stagger, Duration::from_millis(50));
        assert!((config.visibility_threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.palette, DEFAULT_PALETTE.to_vec());
        assert_eq!(config.palette_period, Duration::from_secs(10));
        assert_eq!(config.url_source(), ConfigSource::Default);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("quote-reveal/config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let config = parse(
            r##"
            [source]
            url = "http://localhost:8080/quotes"
            timeout_secs = 3

            [timing]
            settle_delay_ms = 250
            hold_delay_ms = 4000
            caption_delay_ms = 100
            stagger_ms = 20
            fade_ms = 300

            [visibility]
            threshold = 0.5

            [palette]
            colors = ["#000000", "#FFFFFF"]
            period_ms = 2000
            frame_ms = 16
            "##,
        )
        .unwrap();

        assert_eq!(config.source.url, "http://localhost:8080/quotes");
        assert_eq!(config.source.timeout, Duration::from_secs(3));
        assert_eq!(config.settle_delay, Duration::from_millis(250));
        assert_eq!(config.hold_delay, Duration::from_millis(4000));
        assert_eq!(config.caption_delay, Duration::from_millis(100));
        assert_eq!(config.stagger, Duration::from_millis(20));
        assert_eq!(config.fade_duration, Duration::from_millis(300));
        assert!((config.visibility_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(
            config.palette,
            vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]
        );
        assert_eq!(config.palette_period, Duration::from_secs(2));
        assert_eq!(config.palette_frame, Duration::from_millis(16));
        assert_eq!(config.url_source(), ConfigSource::File);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = parse("[timing]\nhold_delay_ms = 1000\n").unwrap();
        assert_eq!(config.hold_delay, Duration::from_millis(1000));
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn test_parse_empty_toml() {
        let config = parse("").unwrap();
        let defaults = RevealConfig::default();
        assert_eq!(config, defaults);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/quote-reveal/config.toml");
        let config = load_config_from_path(Some(path)).unwrap();
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_load_from_file_records_path() {
        let file = write_config("[timing]\nstagger_ms = 10\n");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.stagger, Duration::from_millis(10));
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = write_config("[timing\nsettle_delay_ms = ");
        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_bad_color_rejected() {
        let result = parse("[palette]\ncolors = [\"#13FFAA\", \"teal\"]\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(ref m)) if m.contains("teal")));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for content in [
            "[visibility]\nthreshold = 0.0\n",
            "[visibility]\nthreshold = 1.5\n",
            "[palette]\ncolors = [\"#13FFAA\"]\n",
            "[palette]\nperiod_ms = 0\n",
            "[source]\ntimeout_secs = 0\n",
            "[source]\nurl = \"  \"\n",
        ] {
            assert!(
                matches!(parse(content), Err(ConfigError::ValidationError(_))),
                "expected validation error for {content:?}"
            );
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = parse("[source]\nurl = \"http://file\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            ("QUOTE_REVEAL_URL", "http://env"),
            ("QUOTE_REVEAL_HOLD_MS", "1234"),
            ("QUOTE_REVEAL_SETTLE_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        apply_env_config(&mut config, |key| env.get(key).map(ToString::to_string));

        assert_eq!(config.source.url, "http://env");
        assert_eq!(config.url_source(), ConfigSource::Env);
        assert_eq!(config.hold_delay, Duration::from_millis(1234));
        // Unparseable values are ignored
        assert_eq!(config.settle_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = RevealConfig::default();
        apply_env_config(&mut config, |key| {
            (key == "QUOTE_REVEAL_URL").then(|| "http://env".to_string())
        });

        ConfigOverrides::new()
            .with_url("http://cli")
            .with_timeout_secs(2)
            .apply(&mut config)
            .unwrap();

        assert_eq!(config.source.url, "http://cli");
        assert_eq!(config.source.timeout, Duration::from_secs(2));
        assert_eq!(config.url_source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = RevealConfig::default();
        ConfigOverrides::new().apply(&mut config).unwrap();
        assert_eq!(config, RevealConfig::default());
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ValidationError("palette needs at least 2 colors".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: palette needs at least 2 colors"
        );
    }
}
