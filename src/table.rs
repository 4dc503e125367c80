//! Header-preserving in-memory table for flat CSV files.
//!
//! Cleaning touches only a handful of columns; every other column passes
//! through as the raw text it was read as.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::CleanError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads a whole CSV file with a header line into memory.
    ///
    /// Rows with a different field count than the header are rejected.
    pub fn read(path: &Path) -> Result<Self, CleanError> {
        let csv_err = |source| CleanError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "Table read");
        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`Table::column_index`], but a missing column is an error.
    pub fn require_column(&self, name: &str, path: &Path) -> Result<usize, CleanError> {
        self.column_index(name).ok_or_else(|| CleanError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
    }

    /// Returns the index of `name`, appending an empty column if it is absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.headers.len() - 1
    }
}
