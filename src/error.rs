//! Error taxonomy for the cleaning operations.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of a single cleaning operation.
///
/// A missing input file is not an error; it is reported as
/// [`crate::cleaner::CleanOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column '{column}' not found in '{}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// `row` is 1-based and excludes the header line.
    #[error("row {row}: cannot parse {column} value '{value}'")]
    Timestamp {
        row: usize,
        column: String,
        value: String,
    },
}
