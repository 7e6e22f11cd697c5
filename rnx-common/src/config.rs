//! Configuration loading and config file resolution
//!
//! Bootstrap configuration is read from a TOML file. The file is located in
//! this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable `RNX_CONFIG`
//! 3. User config directory (`~/.config/rnx/config.toml` on Linux)
//! 4. Built-in defaults (no file)
//!
//! Missing files found through steps 2-3 are not fatal: a warning is logged
//! and defaults are used. A file named explicitly on the command line must
//! exist. Individual values can still be overridden by command-line flags in
//! each tool.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RNX_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Level aggregator settings (optional)
    #[serde(default)]
    pub levels: LevelsConfig,

    /// Spectral analyzer settings (optional)
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr only if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Level aggregator settings
///
/// Every field is optional; the aggregator applies its own defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LevelsConfig {
    /// Directory scanned for measurement exports
    #[serde(default)]
    pub input_dir: Option<PathBuf>,

    /// File extension of measurement exports (without dot)
    #[serde(default)]
    pub extension: Option<String>,

    /// Descend into subdirectories during discovery
    #[serde(default)]
    pub recursive: Option<bool>,

    /// Output workbook path
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Expected band count per level row (broadband + 1/3-octave bands)
    #[serde(default)]
    pub band_count: Option<usize>,

    /// Column labels for the band columns of the report
    #[serde(default)]
    pub band_labels: Option<Vec<String>>,

    /// Level category reported when a single sheet is written (leq, lmax, lmin)
    #[serde(default)]
    pub category: Option<String>,

    /// Write one sheet per level category
    #[serde(default)]
    pub all_categories: Option<bool>,

    /// Optional JSON summary of the result table
    #[serde(default)]
    pub json_summary: Option<PathBuf>,
}

/// Spectral analyzer settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpectrumConfig {
    /// Waveform column transformed (1-based channel index, time is column 0)
    #[serde(default)]
    pub channel: Option<usize>,

    /// Effective band factor used to report the number of FFT lines
    #[serde(default)]
    pub effective_band_factor: Option<f64>,

    /// Directory receiving the frequency axis and spectrum files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Optional JSON summary of the analysis
    #[serde(default)]
    pub json_summary: Option<PathBuf>,
}

/// Where a resolved config file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    CommandLine,
    Environment,
    UserConfigDir,
}

/// Config file resolver
///
/// Resolves the config file path following CLI > ENV > user config dir.
pub struct ConfigFileResolver {
    env_var_name: String,
    app_name: String,
}

impl ConfigFileResolver {
    /// Create resolver using the standard `RNX_CONFIG` variable
    pub fn new() -> Self {
        Self {
            env_var_name: CONFIG_ENV_VAR.to_string(),
            app_name: "rnx".to_string(),
        }
    }

    /// Use a different environment variable (mainly for tests)
    pub fn with_env_var(mut self, name: &str) -> Self {
        self.env_var_name = name.to_string();
        self
    }

    /// Resolve the config file path, if any
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Some((path.to_path_buf(), ConfigSource::CommandLine));
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Some((PathBuf::from(path), ConfigSource::Environment));
            }
        }

        // Priority 3: User config directory
        self.user_config_path()
            .filter(|path| path.exists())
            .map(|path| (path, ConfigSource::UserConfigDir))
    }

    /// Platform config path: `<config_dir>/rnx/config.toml`
    pub fn user_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(&self.app_name).join("config.toml"))
    }

    /// Resolve and load configuration
    ///
    /// Falls back to defaults when no file is found. A command-line path
    /// that does not exist is an error; an environment path that does not
    /// exist only produces a warning.
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<TomlConfig> {
        let Some((path, source)) = self.resolve(cli_arg) else {
            debug!("No config file found, using built-in defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            if source == ConfigSource::CommandLine {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            warn!(
                "Config file {} ({:?}) not found, using built-in defaults",
                path.display(),
                source
            );
            return Ok(TomlConfig::default());
        }

        let config = load_toml_config(&path)?;
        info!("Loaded configuration from {} ({:?})", path.display(), source);
        Ok(config)
    }
}

impl Default for ConfigFileResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.levels.band_labels.is_none());
        assert!(config.spectrum.channel.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: TomlConfig = toml::from_str(
            r#"
            [levels]
            extension = "rnd"
            band_count = 34

            [spectrum]
            channel = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.levels.extension.as_deref(), Some("rnd"));
        assert_eq!(config.levels.band_count, Some(34));
        assert_eq!(config.spectrum.channel, Some(1));
        assert!(config.spectrum.effective_band_factor.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_cli_path_wins() {
        let resolver = ConfigFileResolver::new().with_env_var("RNX_TEST_UNSET_CONFIG_VAR");
        let (path, source) = resolver.resolve(Some(Path::new("/tmp/x.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.toml"));
        assert_eq!(source, ConfigSource::CommandLine);
    }

    #[test]
    fn test_missing_cli_path_is_error() {
        let resolver = ConfigFileResolver::new();
        let result = resolver.load(Some(Path::new("/nonexistent/rnx/config.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
