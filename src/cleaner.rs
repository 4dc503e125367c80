//! Cleaning of the raw subway ridership and bus speed exports.
//!
//! Each operation reads its whole input, normalizes it in memory and only
//! then overwrites the cleaned output. A missing input file skips the
//! operation; any parse failure aborts it before anything is written.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use crate::config::{CleanPaths, DataPaths};
use crate::error::CleanError;
use crate::features::CalendarFeatures;
use crate::output::{PREVIEW_ROWS, render_preview, write_table};
use crate::parser::{format_date, format_timestamp, is_missing, parse_timestamp};
use crate::table::Table;

pub const TIMESTAMP_COLUMN: &str = "transit_timestamp";
pub const RIDERSHIP_COLUMN: &str = "ridership";
pub const TRANSFERS_COLUMN: &str = "transfers";
pub const DATE_COLUMN: &str = "date";
pub const HOUR_COLUMN: &str = "hour";
pub const DAY_OF_WEEK_COLUMN: &str = "day_of_week";
pub const MONTH_COLUMN: &str = "month";

/// Result of one cleaning operation.
#[derive(Debug)]
pub enum CleanOutcome {
    /// The raw input file does not exist; nothing was written.
    Skipped { path: PathBuf },
    /// The cleaned file was written with `rows` data rows.
    Completed { rows: usize, preview: String },
    /// The operation aborted; the cleaned file was not written.
    Failed(CleanError),
}

impl CleanOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, CleanOutcome::Failed(_))
    }

    pub fn rows(&self) -> Option<usize> {
        match self {
            CleanOutcome::Completed { rows, .. } => Some(*rows),
            _ => None,
        }
    }
}

/// Outcomes of a full cleaning run.
#[derive(Debug)]
pub struct CleanReport {
    pub subway: CleanOutcome,
    pub bus: CleanOutcome,
}

impl CleanReport {
    pub fn has_failures(&self) -> bool {
        self.subway.is_failed() || self.bus.is_failed()
    }
}

/// Runs subway cleaning, then bus cleaning. A failure in one does not
/// prevent the other from running.
pub fn clean_all(paths: &DataPaths) -> CleanReport {
    CleanReport {
        subway: clean_subway(&paths.subway),
        bus: clean_bus(&paths.bus),
    }
}

/// Normalizes `transit_timestamp`, fills missing counts with zero and
/// derives `date`, `hour` and `day_of_week`.
#[tracing::instrument(skip_all, fields(input = %paths.input.display()))]
pub fn clean_subway(paths: &CleanPaths) -> CleanOutcome {
    info!("Cleaning subway data");
    if !paths.input.exists() {
        warn!("Subway file not found, skipping");
        return CleanOutcome::Skipped {
            path: paths.input.clone(),
        };
    }
    finish("subway", paths, try_clean_subway(paths))
}

/// Normalizes `month` to a calendar date; every other field passes through.
#[tracing::instrument(skip_all, fields(input = %paths.input.display()))]
pub fn clean_bus(paths: &CleanPaths) -> CleanOutcome {
    info!("Cleaning bus data");
    if !paths.input.exists() {
        warn!("Bus file not found, skipping");
        return CleanOutcome::Skipped {
            path: paths.input.clone(),
        };
    }
    finish("bus", paths, try_clean_bus(paths))
}

fn try_clean_subway(paths: &CleanPaths) -> Result<Table, CleanError> {
    let mut table = Table::read(&paths.input)?;

    let ts_idx = table.require_column(TIMESTAMP_COLUMN, &paths.input)?;
    let ridership_idx = table.require_column(RIDERSHIP_COLUMN, &paths.input)?;
    let transfers_idx = table.require_column(TRANSFERS_COLUMN, &paths.input)?;

    let timestamps = parse_column(&table, ts_idx, TIMESTAMP_COLUMN)?;

    let date_idx = table.ensure_column(DATE_COLUMN);
    let hour_idx = table.ensure_column(HOUR_COLUMN);
    let dow_idx = table.ensure_column(DAY_OF_WEEK_COLUMN);

    for (row, ts) in table.rows.iter_mut().zip(&timestamps) {
        let features = CalendarFeatures::from_timestamp(ts);

        row[ts_idx] = format_timestamp(ts);
        fill_missing_count(&mut row[ridership_idx]);
        fill_missing_count(&mut row[transfers_idx]);
        row[date_idx] = format_date(&features.date);
        row[hour_idx] = features.hour.to_string();
        row[dow_idx] = features.day_of_week.to_string();
    }

    write_table(&paths.output, &table)?;
    Ok(table)
}

fn try_clean_bus(paths: &CleanPaths) -> Result<Table, CleanError> {
    let mut table = Table::read(&paths.input)?;

    let month_idx = table.require_column(MONTH_COLUMN, &paths.input)?;
    let months = parse_column(&table, month_idx, MONTH_COLUMN)?;

    for (row, month) in table.rows.iter_mut().zip(&months) {
        row[month_idx] = format_date(&month.date());
    }

    write_table(&paths.output, &table)?;
    Ok(table)
}

/// Parses every value of a column, failing on the first bad one.
fn parse_column(table: &Table, idx: usize, column: &str) -> Result<Vec<NaiveDateTime>, CleanError> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            parse_timestamp(&row[idx]).ok_or_else(|| CleanError::Timestamp {
                row: i + 1,
                column: column.to_string(),
                value: row[idx].clone(),
            })
        })
        .collect()
}

fn fill_missing_count(cell: &mut String) {
    if is_missing(cell) {
        *cell = "0".to_string();
    }
}

fn finish(kind: &str, paths: &CleanPaths, result: Result<Table, CleanError>) -> CleanOutcome {
    match result {
        Ok(table) => {
            info!(
                kind,
                rows = table.len(),
                output = %paths.output.display(),
                "Saved cleaned data"
            );
            CleanOutcome::Completed {
                rows: table.len(),
                preview: render_preview(&table, PREVIEW_ROWS),
            }
        }
        Err(e) => {
            error!(kind, error = %e, "Cleaning failed");
            CleanOutcome::Failed(e)
        }
    }
}
