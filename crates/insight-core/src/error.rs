use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales insight engine.
#[derive(Error, Debug)]
pub enum SalesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every listed input file was missing or unreadable.
    #[error("No valid input files found (tried {attempted})")]
    NoInputData { attempted: usize },

    /// The merged input held no rows for the requested product.
    #[error("No {product} transactions found in the data")]
    NoMatchingProduct { product: String },

    /// A price cell was not a number after stripping the currency symbol.
    #[error("Invalid price {value:?} in {path} row {row}")]
    PriceFormat {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// A quantity or date cell did not parse.
    #[error("Invalid {column} {value:?} in {path} row {row}")]
    InvalidField {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A required column is absent from a CSV header row.
    #[error("Missing column {column:?} in {path}")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A date string did not match `YYYY-MM-DD`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The before window has trading days but its daily mean is zero.
    #[error("Cannot compute percent change: average daily sales before the cutoff is zero")]
    DivisionByZero,

    /// A CSV document could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the insight crates.
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SalesError::FileRead {
            path: PathBuf::from("/data/daily_sales_data_0.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("daily_sales_data_0.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_no_input_data() {
        let err = SalesError::NoInputData { attempted: 3 };
        assert_eq!(err.to_string(), "No valid input files found (tried 3)");
    }

    #[test]
    fn test_error_display_no_matching_product() {
        let err = SalesError::NoMatchingProduct {
            product: "pink morsel".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No pink morsel transactions found in the data"
        );
    }

    #[test]
    fn test_error_display_price_format() {
        let err = SalesError::PriceFormat {
            path: PathBuf::from("sales.csv"),
            row: 4,
            value: "N/A".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid price \"N/A\" in sales.csv row 4");
    }

    #[test]
    fn test_error_display_invalid_field() {
        let err = SalesError::InvalidField {
            path: PathBuf::from("sales.csv"),
            row: 2,
            column: "quantity",
            value: "two".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid quantity \"two\" in sales.csv row 2");
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = SalesError::MissingColumn {
            path: PathBuf::from("sales.csv"),
            column: "region",
        };
        assert_eq!(err.to_string(), "Missing column \"region\" in sales.csv");
    }

    #[test]
    fn test_error_display_division_by_zero() {
        let msg = SalesError::DivisionByZero.to_string();
        assert!(msg.contains("zero"));
    }

    #[test]
    fn test_error_display_config() {
        let err = SalesError::Config("bad cutoff".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad cutoff");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
