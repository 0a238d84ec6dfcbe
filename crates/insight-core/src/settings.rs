use chrono::NaiveDate;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::models::{RegionFilter, ZeroBaselinePolicy};
use crate::time_utils::parse_date;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Consolidate daily sales files and compare sales around a price change
#[derive(Parser, Debug, Clone)]
#[command(
    name = "morsel-insight",
    about = "Consolidate daily sales files and compare sales around a price change",
    version
)]
pub struct Settings {
    /// What to run
    #[arg(long, default_value = "stats", value_parser = ["consolidate", "stats", "series", "regions"])]
    pub view: String,

    /// Raw sales file to merge (repeatable, merged in the given order)
    #[arg(long = "input", short = 'i')]
    pub inputs: Vec<PathBuf>,

    /// Directory scanned for raw `.csv` files when no --input is given
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Consolidated table to write and read back
    #[arg(long, short = 'o', default_value = "pink_morsel_sales_consolidated.csv")]
    pub output: PathBuf,

    /// Product to isolate (case-insensitive)
    #[arg(long, default_value = "pink morsel")]
    pub product: String,

    /// Region scope for statistics and series (case-insensitive)
    #[arg(
        long,
        default_value = "all",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(["all", "north", "south", "east", "west"])
            .map(|s: String| s.to_lowercase())
    )]
    pub region: String,

    /// First day of the new pricing (YYYY-MM-DD)
    #[arg(long, default_value = "2021-01-15")]
    pub cutoff: String,

    /// Percent-change policy when average sales before the cutoff are zero
    #[arg(long, default_value = "report-zero", value_parser = ["report-zero", "fail"])]
    pub zero_baseline: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.morsel-insight/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl LastUsedParams {
    /// Default location, rooted at the user's home directory.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".morsel-insight").join("last_used.json")
    }

    /// Load params from `path`; `Default` when absent or unparsable.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments, fill unset fields from last-used params
    /// and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit arguments and
    /// config location.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return settings.apply_debug_flag();
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over remembered values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "region") {
            if let Some(v) = last.region {
                settings.region = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }

        settings = settings.apply_debug_flag();

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::debug!("Could not persist last-used params: {}", e);
        }

        settings
    }

    /// Parsed `--cutoff`.
    pub fn cutoff_date(&self) -> Result<NaiveDate> {
        parse_date(&self.cutoff)
    }

    /// Parsed `--region`.
    pub fn region_filter(&self) -> RegionFilter {
        match self.region.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        }
    }

    /// Parsed `--zero-baseline`.
    pub fn zero_baseline_policy(&self) -> Result<ZeroBaselinePolicy> {
        self.zero_baseline.parse()
    }

    /// `true` when `--format json` was selected.
    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }

    fn apply_debug_flag(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            view: Some(s.view.clone()),
            region: Some(s.region.clone()),
            format: Some(s.format.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
