//! Data types used by the summary pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::parser::is_missing;

/// The columns of a cleaned subway row that the summary and model read.
#[derive(Debug, Clone, Deserialize)]
pub struct SubwayRow {
    pub(crate) borough: String,
    pub(crate) ridership: f64,
    pub(crate) date: String,
    pub(crate) hour: u32,
    pub(crate) day_of_week: String,
    #[serde(default)]
    pub(crate) station_complex: String,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub(crate) latitude: Option<f64>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub(crate) longitude: Option<f64>,
}

/// The columns of a cleaned bus row that the summary reads.
#[derive(Debug, Clone, Deserialize)]
pub struct BusRow {
    pub(crate) borough: String,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub(crate) average_speed: Option<f64>,
    #[serde(default, deserialize_with = "missing_as_none")]
    pub(crate) total_operating_time: Option<f64>,
}

/// Reads a numeric field, mapping the cleaner's missing markers to `None`.
fn missing_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if is_missing(&raw) {
        return Ok(None);
    }
    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

/// Ridership total for one weekday.
#[derive(Debug, Serialize, PartialEq)]
pub struct WeekdayTotal {
    pub day: String,
    pub ridership: f64,
}

/// Ridership total for one station location, as drawn on the map layer.
#[derive(Debug, Serialize, PartialEq)]
pub struct StationTotal {
    pub station_complex: String,
    pub latitude: f64,
    pub longitude: f64,
    pub ridership: f64,
}

/// Ridership totals across the cleaned subway table.
#[derive(Debug, Serialize)]
pub struct SubwaySummary {
    pub rows: usize,
    pub total_ridership: f64,
    pub by_borough: BTreeMap<String, f64>,
    pub by_date: BTreeMap<String, f64>,
    /// Average ridership per observation in each hour of day.
    pub mean_by_hour: BTreeMap<u32, f64>,
    pub total_by_hour: BTreeMap<u32, f64>,
    /// Monday first.
    pub by_day_of_week: Vec<WeekdayTotal>,
    /// Sorted by station name, then coordinates. Rows without coordinates
    /// are left out.
    pub by_station: Vec<StationTotal>,
}

/// Speed and operating-time figures across the cleaned bus table.
#[derive(Debug, Serialize)]
pub struct BusSummary {
    pub rows: usize,
    pub mean_speed: f64,
    pub speed_stddev: f64,
    pub total_operating_time: f64,
    pub mean_speed_by_borough: BTreeMap<String, f64>,
}

/// Complete summary; a section is `None` when its cleaned file is absent.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub boroughs: Vec<String>,
    pub subway: Option<SubwaySummary>,
    pub bus: Option<BusSummary>,
}
