//! CSV discovery, loading and persistence for sales data.
//!
//! Reads raw daily sales files into [`RawTransaction`] rows and writes or
//! reloads the consolidated [`NormalizedRecord`] table.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use insight_core::error::{Result, SalesError};
use insight_core::models::{NormalizedRecord, RawTransaction};
use tracing::{debug, warn};

/// Columns every raw sales file must carry.
pub const RAW_COLUMNS: [&str; 5] = ["product", "price", "quantity", "date", "region"];

/// Header row of the consolidated table.
pub const NORMALIZED_COLUMNS: [&str; 3] = ["Sales", "Date", "Region"];

/// Rows read from one raw file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rows: Vec<RawTransaction>,
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_dir`, sorted by path.
pub fn find_csv_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        warn!("Data directory does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Raw input ─────────────────────────────────────────────────────────────────

/// Load every readable file in `paths`, in order.
///
/// Missing or unopenable files are logged and skipped. Malformed content in a
/// file that did open is an error.
pub fn load_source_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        if !path.exists() {
            warn!("File {} not found. Skipping...", path.display());
            continue;
        }
        if !path.is_file() {
            warn!("{} is not a regular file. Skipping...", path.display());
            continue;
        }
        match read_raw_transactions(path) {
            Ok(rows) => {
                debug!("File {}: {} rows", path.display(), rows.len());
                sources.push(SourceFile {
                    path: path.clone(),
                    rows,
                });
            }
            Err(SalesError::FileRead { path, source }) => {
                warn!("Failed to read file {}: {}. Skipping...", path.display(), source);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(sources)
}

/// Read one raw sales file.
///
/// Header names are matched case-insensitively; extra columns are ignored and
/// empty cells become `None`.
pub fn read_raw_transactions(path: &Path) -> Result<Vec<RawTransaction>> {
    let file = File::open(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let index_by_name: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_lowercase(), index))
        .collect();

    let mut columns = [0usize; 5];
    for (slot, column) in columns.iter_mut().zip(RAW_COLUMNS) {
        *slot = *index_by_name
            .get(column)
            .ok_or_else(|| SalesError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })?;
    }
    let [product, price, quantity, date, region] = columns;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        rows.push(RawTransaction {
            product: cell(&record, product),
            price: cell(&record, price),
            quantity: cell(&record, quantity),
            date: cell(&record, date),
            region: cell(&record, region),
            row: index + 1,
        });
    }

    Ok(rows)
}

fn cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// ── Normalized table ──────────────────────────────────────────────────────────

/// Write the consolidated table, header included even when empty.
pub fn write_normalized(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(NORMALIZED_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Load a consolidated table, re-sorted by date.
pub fn read_normalized(path: &Path) -> Result<Vec<NormalizedRecord>> {
    let file = File::open(path).map_err(|source| SalesError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = reader
        .deserialize::<NormalizedRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    records.sort_by_key(|r| r.date);

    debug!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
