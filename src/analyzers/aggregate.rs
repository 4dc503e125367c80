use crate::analyzers::types::{
    BusRow, BusSummary, StationTotal, SubwayRow, SubwaySummary, WeekdayTotal,
};
use crate::features::weekday_name;
use chrono::Weekday;
use std::collections::{BTreeMap, HashMap};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Sums ridership overall and grouped by borough, date, hour, weekday and
/// station, and averages it per hour of day.
pub fn summarize_subway(rows: &[SubwayRow]) -> SubwaySummary {
    let mut by_borough = BTreeMap::new();
    let mut by_date = BTreeMap::new();
    let mut hourly: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut by_day: HashMap<&str, f64> = HashMap::new();

    for row in rows {
        *by_borough.entry(row.borough.clone()).or_insert(0.0) += row.ridership;
        *by_date.entry(row.date.clone()).or_insert(0.0) += row.ridership;
        hourly.entry(row.hour).or_default().push(row.ridership);
        *by_day.entry(row.day_of_week.as_str()).or_default() += row.ridership;
    }

    let total_by_hour = hourly
        .iter()
        .map(|(hour, values)| (*hour, values.iter().sum()))
        .collect();
    let mean_by_hour = hourly
        .iter()
        .map(|(hour, values)| (*hour, mean_and_stddev(values).0))
        .collect();

    let by_day_of_week = WEEK
        .iter()
        .map(|d| {
            let day = weekday_name(*d);
            WeekdayTotal {
                day: day.to_string(),
                ridership: by_day.get(day).copied().unwrap_or(0.0),
            }
        })
        .collect();

    SubwaySummary {
        rows: rows.len(),
        total_ridership: rows.iter().map(|r| r.ridership).sum(),
        by_borough,
        by_date,
        mean_by_hour,
        total_by_hour,
        by_day_of_week,
        by_station: station_totals(rows),
    }
}

/// Groups ridership by `(station_complex, latitude, longitude)`.
fn station_totals(rows: &[SubwayRow]) -> Vec<StationTotal> {
    let mut index: HashMap<(&str, u64, u64), usize> = HashMap::new();
    let mut stations: Vec<StationTotal> = Vec::new();

    for row in rows {
        let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
            continue;
        };
        let key = (row.station_complex.as_str(), latitude.to_bits(), longitude.to_bits());
        let idx = *index.entry(key).or_insert_with(|| {
            stations.push(StationTotal {
                station_complex: row.station_complex.clone(),
                latitude,
                longitude,
                ridership: 0.0,
            });
            stations.len() - 1
        });
        stations[idx].ridership += row.ridership;
    }

    stations.sort_by(|a, b| {
        a.station_complex
            .cmp(&b.station_complex)
            .then(a.latitude.total_cmp(&b.latitude))
            .then(a.longitude.total_cmp(&b.longitude))
    });
    stations
}

/// Averages speed and totals operating time. Rows with a missing or
/// non-finite value are left out of that value's figures only.
pub fn summarize_bus(rows: &[BusRow]) -> BusSummary {
    let speeds: Vec<f64> = rows.iter().filter_map(|r| finite(r.average_speed)).collect();

    let mut borough_speeds: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let Some(speed) = finite(row.average_speed) {
            borough_speeds.entry(row.borough.clone()).or_default().push(speed);
        }
    }

    let (mean_speed, speed_stddev) = mean_and_stddev(&speeds);

    BusSummary {
        rows: rows.len(),
        mean_speed,
        speed_stddev,
        total_operating_time: rows
            .iter()
            .filter_map(|r| finite(r.total_operating_time))
            .sum(),
        mean_speed_by_borough: borough_speeds
            .into_iter()
            .map(|(borough, s)| (borough, mean_and_stddev(&s).0))
            .collect(),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Mean and population standard deviation; both 0.0 for an empty series.
fn mean_and_stddev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
