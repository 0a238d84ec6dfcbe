//! Merges raw daily sales files into one normalized, date-sorted table for a
//! single product.

use std::path::{Path, PathBuf};

use insight_core::error::{Result, SalesError};
use insight_core::models::{ConsolidationSummary, NormalizedRecord, RawTransaction};
use insight_core::pricing::{compute_sales, parse_price};
use insight_core::time_utils::parse_date;
use tracing::{debug, info};

use crate::reader::{load_source_files, write_normalized};

/// Product analysed by default.
pub const DEFAULT_PRODUCT: &str = "pink morsel";

/// Output of a consolidation run.
#[derive(Debug, Clone)]
pub struct Consolidation {
    /// Rows sorted ascending by date; ties keep input order.
    pub records: Vec<NormalizedRecord>,
    pub summary: ConsolidationSummary,
}

/// Merge `paths` (in order) and keep only `target_product` transactions.
///
/// 1. Read each file, skipping missing ones.
/// 2. Keep rows whose product equals `target_product`, ignoring case.
/// 3. Drop rows missing price, quantity, date or region.
/// 4. Parse the remaining rows and compute `Sales = price * quantity`.
/// 5. Stable-sort by date.
///
/// Fails with [`SalesError::NoInputData`] when no file could be read,
/// [`SalesError::NoMatchingProduct`] when no row names the product, and
/// [`SalesError::PriceFormat`] or [`SalesError::InvalidField`] on the first
/// unparsable cell.
pub fn consolidate(paths: &[PathBuf], target_product: &str) -> Result<Consolidation> {
    let sources = load_source_files(paths)?;
    if sources.is_empty() {
        return Err(SalesError::NoInputData {
            attempted: paths.len(),
        });
    }

    let mut summary = ConsolidationSummary {
        files_requested: paths.len(),
        files_read: sources.len(),
        ..Default::default()
    };

    let mut matched: Vec<(&Path, &RawTransaction)> = Vec::new();
    for source in &sources {
        summary.rows_read += source.rows.len();
        for tx in &source.rows {
            if let Some(product) = tx.product.as_deref() {
                if !summary.products_seen.iter().any(|p| p == product) {
                    summary.products_seen.push(product.to_string());
                }
            }
            if tx.is_product(target_product) {
                matched.push((source.path.as_path(), tx));
            }
        }
    }

    info!(
        "Combined dataset: {} rows from {} of {} files",
        summary.rows_read, summary.files_read, summary.files_requested
    );
    debug!("Products found: {:?}", summary.products_seen);

    if matched.is_empty() {
        return Err(SalesError::NoMatchingProduct {
            product: target_product.to_string(),
        });
    }
    summary.rows_matched = matched.len();

    let mut records = Vec::with_capacity(matched.len());
    for (path, tx) in matched {
        if !tx.is_complete() {
            debug!("Dropping incomplete row {} in {}", tx.row, path.display());
            summary.rows_dropped += 1;
            continue;
        }
        records.push(normalize_transaction(path, tx)?);
    }

    records.sort_by_key(|r| r.date);
    summary.rows_written = records.len();

    info!(
        "Consolidated {} {} rows ({} dropped as incomplete)",
        summary.rows_written, target_product, summary.rows_dropped
    );

    Ok(Consolidation { records, summary })
}

/// Run [`consolidate`] and persist the table to `output`.
pub fn consolidate_to_file(
    paths: &[PathBuf],
    target_product: &str,
    output: &Path,
) -> Result<Consolidation> {
    let consolidation = consolidate(paths, target_product)?;
    write_normalized(output, &consolidation.records)?;
    info!("Saved consolidated table to {}", output.display());
    Ok(consolidation)
}

/// Turn one complete raw row into a normalized record.
///
/// `path` is only used to locate the row in error messages.
pub fn normalize_transaction(path: &Path, tx: &RawTransaction) -> Result<NormalizedRecord> {
    let (Some(price), Some(quantity), Some(date), Some(region)) = (
        tx.price.as_deref(),
        tx.quantity.as_deref(),
        tx.date.as_deref(),
        tx.region.as_deref(),
    ) else {
        return Err(SalesError::Config(format!(
            "row {} in {} is incomplete",
            tx.row,
            path.display()
        )));
    };

    let unit_price = parse_price(price).ok_or_else(|| SalesError::PriceFormat {
        path: path.to_path_buf(),
        row: tx.row,
        value: price.to_string(),
    })?;

    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|_| invalid_field(path, tx.row, "quantity", quantity))?;

    let date = parse_date(date).map_err(|_| invalid_field(path, tx.row, "date", date))?;

    Ok(NormalizedRecord {
        sales: compute_sales(unit_price, quantity),
        date,
        region: region.to_string(),
    })
}

fn invalid_field(path: &Path, row: usize, column: &'static str, value: &str) -> SalesError {
    SalesError::InvalidField {
        path: path.to_path_buf(),
        row,
        column,
        value: value.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
