use std::fs;

use tempfile::tempdir;
use transit_ridership::analyzers::analyzer::summarize;
use transit_ridership::cleaner::{CleanOutcome, clean_all};
use transit_ridership::config::DataPaths;
use transit_ridership::table::Table;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const RAW_SUBWAY: &str = "\
transit_timestamp,transit_mode,station_complex_id,station_complex,borough,payment_method,ridership,transfers,latitude,longitude
2024-01-15T08:00:00.000,subway,611,Times Sq-42 St (N/Q/R/W/S/1/2/3/7),Manhattan,metrocard,120,4,40.75,-73.98
2024-01-15T08:00:00.000,subway,611,Times Sq-42 St (N/Q/R/W/S/1/2/3/7),Manhattan,omny,,2,40.75,-73.98
2024-01-20T23:00:00.000,subway,14,Fordham Rd,Bronx,omny,31,,40.86,-73.90
2024-01-21T00:00:00.000,subway,447,Jamaica Center,Queens,metrocard,NaN,NaN,40.70,-73.80
";

const RAW_BUS: &str = "\
month,borough,route_id,period,average_speed,total_operating_time
2024-01-01T00:00:00.000,Bronx,BX1,Peak,7.5,120.0
2024-01-01T00:00:00.000,Queens,Q44+,Off-Peak,9.25,80.5
";

#[test]
fn test_full_clean_then_summarize() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::write(&paths.subway.input, RAW_SUBWAY).unwrap();
    fs::write(&paths.bus.input, RAW_BUS).unwrap();

    let report = clean_all(&paths);
    assert!(!report.has_failures());
    assert_eq!(report.subway.rows(), Some(4));
    assert_eq!(report.bus.rows(), Some(2));

    let subway = Table::read(&paths.subway.output).unwrap();
    let col = |name: &str| subway.column_index(name).unwrap();
    for row in &subway.rows {
        let ridership: f64 = row[col("ridership")].parse().unwrap();
        let transfers: f64 = row[col("transfers")].parse().unwrap();
        assert!(ridership >= 0.0 && transfers >= 0.0);

        let hour: u32 = row[col("hour")].parse().unwrap();
        assert!(hour <= 23);
        assert!(row[col("transit_timestamp")].starts_with(&row[col("date")]));
        assert!(WEEKDAYS.contains(&row[col("day_of_week")].as_str()));
    }
    assert_eq!(subway.rows[2][col("day_of_week")], "Saturday");
    assert_eq!(subway.rows[2][col("hour")], "23");
    assert_eq!(subway.rows[3][col("day_of_week")], "Sunday");

    let bus = fs::read_to_string(&paths.bus.output).unwrap();
    assert!(bus.contains("2024-01-01,Queens,Q44+,Off-Peak,9.25,80.5"));

    let summary = summarize(&paths, &[]).unwrap();
    let subway_summary = summary.subway.unwrap();
    assert_eq!(subway_summary.total_ridership, 151.0);
    assert_eq!(subway_summary.by_borough["Manhattan"], 120.0);
    assert_eq!(subway_summary.mean_by_hour[&8], 60.0);
    assert_eq!(subway_summary.by_station.len(), 3);
    assert_eq!(subway_summary.by_station[0].station_complex, "Fordham Rd");
    assert_eq!(subway_summary.by_station[2].ridership, 120.0);
    let bus_summary = summary.bus.unwrap();
    assert_eq!(bus_summary.total_operating_time, 200.5);
}

#[test]
fn test_clean_with_no_raw_files_skips_both() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());

    let report = clean_all(&paths);

    assert!(matches!(report.subway, CleanOutcome::Skipped { .. }));
    assert!(matches!(report.bus, CleanOutcome::Skipped { .. }));
    assert!(!paths.subway.output.exists());
    assert!(!paths.bus.output.exists());
}

#[test]
fn test_rerun_produces_identical_output() {
    let dir = tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    fs::write(&paths.subway.input, RAW_SUBWAY).unwrap();

    clean_all(&paths);
    let first = fs::read(&paths.subway.output).unwrap();
    clean_all(&paths);
    let second = fs::read(&paths.subway.output).unwrap();

    assert_eq!(first, second);
}
