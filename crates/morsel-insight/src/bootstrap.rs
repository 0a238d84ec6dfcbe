use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use insight_core::settings::Settings;
use insight_data::reader::find_csv_files;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.morsel-insight/` and `~/.morsel-insight/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let app_dir = home.join(".morsel-insight");
    std::fs::create_dir_all(&app_dir)?;
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` value to an [`EnvFilter`] directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr, or are appended to `log_file` when one is given.
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    let (stderr_layer, file_layer) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (None, Some(layer))
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            (Some(layer), None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// Raw files to consolidate: `--input` values in order, otherwise every
/// `.csv` under `--data-dir`.
pub fn resolve_inputs(settings: &Settings) -> Vec<PathBuf> {
    if !settings.inputs.is_empty() {
        return settings.inputs.clone();
    }
    let found = find_csv_files(&settings.data_dir);
    tracing::debug!(
        "Discovered {} input files under {}",
        found.len(),
        settings.data_dir.display()
    );
    found
}

// ── Tests ──────────────────────────────────────────────────────────────────────
