//! Run settings for rnx-la
//!
//! Settings are resolved per value: command-line override, then the
//! `[levels]` section of the TOML config, then built-in defaults.

use std::path::PathBuf;

use rnx_common::config::LevelsConfig;
use tracing::debug;

use crate::bands::{default_band_labels, DEFAULT_BAND_COUNT};
use crate::error::{LevelError, Result};
use crate::models::LevelCategory;

/// Default workbook name
pub const DEFAULT_OUTPUT: &str = "results_rion52.xlsx";

/// Default export extension
pub const DEFAULT_EXTENSION: &str = "csv";

/// Command-line overrides (all optional)
#[derive(Debug, Clone, Default)]
pub struct LevelOverrides {
    pub files: Vec<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub recursive: bool,
    pub output: Option<PathBuf>,
    pub category: Option<LevelCategory>,
    pub all_categories: bool,
    pub json_summary: Option<PathBuf>,
}

/// Fully resolved settings for one aggregation run
#[derive(Debug, Clone)]
pub struct LevelSettings {
    /// Explicit input files; when non-empty, discovery is skipped
    pub files: Vec<PathBuf>,
    /// Directory scanned for exports
    pub input_dir: PathBuf,
    /// Export extension (without dot)
    pub extension: String,
    /// Recurse into subdirectories during discovery
    pub recursive: bool,
    /// Output workbook
    pub output: PathBuf,
    /// Band count per level row
    pub band_count: usize,
    /// Band column labels
    pub band_labels: Vec<String>,
    /// Categories written to the workbook, one sheet each
    pub categories: Vec<LevelCategory>,
    /// Optional JSON summary path
    pub json_summary: Option<PathBuf>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            input_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            recursive: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
            band_count: DEFAULT_BAND_COUNT,
            band_labels: default_band_labels(),
            categories: vec![LevelCategory::Leq],
            json_summary: None,
        }
    }
}

impl LevelSettings {
    /// Resolve settings from TOML values and command-line overrides
    pub fn resolve(config: &LevelsConfig, overrides: LevelOverrides) -> Result<Self> {
        let defaults = Self::default();

        let category = match (overrides.category, config.category.as_deref()) {
            (Some(category), _) => category,
            (None, Some(name)) => name
                .parse::<LevelCategory>()
                .map_err(LevelError::Configuration)?,
            (None, None) => LevelCategory::Leq,
        };

        let all_categories = overrides.all_categories || config.all_categories.unwrap_or(false);
        let categories = if all_categories {
            LevelCategory::ALL.to_vec()
        } else {
            vec![category]
        };

        let settings = Self {
            files: overrides.files,
            input_dir: overrides
                .input_dir
                .or_else(|| config.input_dir.clone())
                .unwrap_or(defaults.input_dir),
            extension: overrides
                .extension
                .or_else(|| config.extension.clone())
                .unwrap_or(defaults.extension),
            recursive: overrides.recursive || config.recursive.unwrap_or(false),
            output: overrides
                .output
                .or_else(|| config.output.clone())
                .unwrap_or(defaults.output),
            band_count: config.band_count.unwrap_or(defaults.band_count),
            band_labels: config
                .band_labels
                .clone()
                .unwrap_or(defaults.band_labels),
            categories,
            json_summary: overrides.json_summary.or_else(|| config.json_summary.clone()),
        };

        debug!(?settings, "Resolved level aggregation settings");
        Ok(settings)
    }
}
