//! Command Line and Configuration Resolution
//!
//! Priority: CLI flags > environment > config file > defaults. The config
//! file is `--config` when given, otherwise the default XDG location.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use reveal_core::{default_config_path, load_config_from_path, ConfigOverrides, RevealConfig};

/// Quote TUI - a staged quote reveal for the terminal
#[derive(Parser, Debug)]
#[command(name = "quote-tui")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Quote endpoint URL
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Serve built-in quotes instead of fetching
    #[arg(long)]
    pub offline: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "QUOTE_REVEAL_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long, env = "QUOTE_REVEAL_LOG", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Config file to read: `--config`, else `default_path`
    pub fn config_path(&self, default_path: Option<PathBuf>) -> Option<PathBuf> {
        self.config.clone().or(default_path)
    }

    /// Resolve configuration from the standard config location
    pub fn build_config(&self) -> Result<RevealConfig> {
        self.resolve_config(default_config_path())
    }

    /// Resolve configuration, falling back to `default_path` for the file
    pub fn resolve_config(&self, default_path: Option<PathBuf>) -> Result<RevealConfig> {
        let mut config = load_config_from_path(self.config_path(default_path))?;

        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.url {
            overrides = overrides.with_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            overrides = overrides.with_timeout_secs(secs);
        }
        overrides.apply(&mut config)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["quote-tui"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_default_file_is_read_without_flag() {
        let file = config_file("[timing]\nhold_delay_ms = 1234\n");
        let args = Args {
            config: None,
            ..args(&[])
        };

        let config = args.resolve_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.hold_delay, Duration::from_millis(1234));
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_flag_wins_over_default_file() {
        let default = config_file("[timing]\nhold_delay_ms = 1234\n");
        let chosen = config_file("[timing]\nhold_delay_ms = 4321\n");
        let args = args(&["--config", chosen.path().to_str().unwrap()]);

        let config = args.resolve_config(Some(default.path().to_path_buf())).unwrap();
        assert_eq!(config.hold_delay, Duration::from_millis(4321));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            config: None,
            ..args(&[])
        };

        let config = args
            .resolve_config(Some(dir.path().join("config.toml")))
            .unwrap();
        assert_eq!(config.hold_delay, Duration::from_millis(5000));
        assert_eq!(config.config_file_path, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = config_file("[source]\ntimeout_secs = 3\n");
        let args = Args {
            config: None,
            ..args(&["--timeout-secs", "9", "--url", "https://example.com/quotes"])
        };

        let config = args.resolve_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.source.timeout, Duration::from_secs(9));
        assert_eq!(config.source.url, "https://example.com/quotes");
    }
}
