//! Persistence and previews for cleaned tables.
//!
//! Cleaned files are always rewritten whole; there is no append mode.

use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use tracing::debug;

use crate::error::CleanError;
use crate::table::Table;

/// Number of rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// Writes `table` to `path` with a header line, replacing any prior content.
pub fn write_table(path: &Path, table: &Table) -> Result<(), CleanError> {
    debug!(path = %path.display(), rows = table.len(), "Writing CSV table");

    let file = File::create(path).map_err(|source| CleanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source| CleanError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(&table.headers).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| CleanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Renders the row count and the first `limit` rows as an aligned text table.
pub fn render_preview(table: &Table, limit: usize) -> String {
    let shown = &table.rows[..table.rows.len().min(limit)];

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in shown {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("{} rows x {} columns\n", table.len(), table.headers.len());
    out.push_str(&format_line(&table.headers));
    out.push('\n');
    for row in shown {
        out.push_str(&format_line(row));
        out.push('\n');
    }
    out
}
