use crate::analyzers::aggregate::{summarize_bus, summarize_subway};
use crate::analyzers::types::{BusRow, Summary, SubwayRow};
use crate::config::DataPaths;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, warn};

/// Builds a [`Summary`] from the cleaned files under `paths`.
///
/// An empty `boroughs` slice keeps every row; otherwise only rows whose
/// borough matches one of the entries exactly are counted.
#[tracing::instrument(skip(paths), fields(data_dir = %paths.data_dir.display()))]
pub fn summarize(paths: &DataPaths, boroughs: &[String]) -> Result<Summary> {
    let subway = load_rows::<SubwayRow>(&paths.subway.output)?.map(|rows| {
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|r| keep(&r.borough, boroughs))
            .collect();
        summarize_subway(&rows)
    });

    let bus = load_rows::<BusRow>(&paths.bus.output)?.map(|rows| {
        let rows: Vec<_> = rows
            .into_iter()
            .filter(|r| keep(&r.borough, boroughs))
            .collect();
        summarize_bus(&rows)
    });

    info!(
        subway_rows = subway.as_ref().map(|s| s.rows),
        bus_rows = bus.as_ref().map(|s| s.rows),
        "Summary computed"
    );

    Ok(Summary {
        generated_at: chrono::Utc::now(),
        boroughs: boroughs.to_vec(),
        subway,
        bus,
    })
}

fn keep(borough: &str, boroughs: &[String]) -> bool {
    boroughs.is_empty() || boroughs.iter().any(|b| b == borough)
}

/// Deserializes every row of a cleaned CSV, or `None` if the file is absent.
pub(crate) fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        warn!(path = %path.display(), "Cleaned file not found, run the cleaner first");
        return Ok(None);
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T = result.with_context(|| format!("bad row in {}", path.display()))?;
        rows.push(record);
    }

    Ok(Some(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_summarize_filters_boroughs() {
        let dir = tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        fs::write(
            &paths.subway.output,
            "transit_timestamp,borough,ridership,transfers,date,hour,day_of_week\n\
             2024-01-15 08:00:00,Bronx,10,0,2024-01-15,8,Monday\n\
             2024-01-15 09:00:00,Queens,4,1,2024-01-15,9,Monday\n",
        )
        .unwrap();
        fs::write(
            &paths.bus.output,
            "month,borough,average_speed,total_operating_time\n\
             2024-01-01,Bronx,7.5,120.0\n\
             2024-01-01,Queens,9.5,80.0\n",
        )
        .unwrap();

        let summary = summarize(&paths, &["Bronx".to_string()]).unwrap();

        let subway = summary.subway.unwrap();
        assert_eq!(subway.rows, 1);
        assert_eq!(subway.total_ridership, 10.0);
        let bus = summary.bus.unwrap();
        assert_eq!(bus.mean_speed, 7.5);
        assert_eq!(bus.total_operating_time, 120.0);
    }

    #[test]
    fn test_summarize_treats_na_spellings_as_missing() {
        for marker in ["NaN", "NA", ""] {
            let dir = tempdir().unwrap();
            let paths = DataPaths::new(dir.path());
            fs::write(
                &paths.bus.input,
                format!(
                    "month,borough,average_speed,total_operating_time\n\
                     2024-01-01,Bronx,7.5,120.0\n\
                     2024-02-01,Bronx,{marker},{marker}\n"
                ),
            )
            .unwrap();
            assert_eq!(crate::cleaner::clean_all(&paths).bus.rows(), Some(2));

            let bus = summarize(&paths, &[]).unwrap().bus.unwrap();

            assert_eq!(bus.rows, 2, "marker {marker:?}");
            assert_eq!(bus.mean_speed, 7.5, "marker {marker:?}");
            assert_eq!(bus.mean_speed_by_borough["Bronx"], 7.5, "marker {marker:?}");
            assert_eq!(bus.total_operating_time, 120.0, "marker {marker:?}");
        }
    }

    #[test]
    fn test_summarize_without_cleaned_files() {
        let dir = tempdir().unwrap();
        let summary = summarize(&DataPaths::new(dir.path()), &[]).unwrap();

        assert!(summary.subway.is_none());
        assert!(summary.bus.is_none());
    }

    #[test]
    fn test_summarize_rejects_malformed_rows() {
        let dir = tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        fs::write(
            &paths.bus.output,
            "month,borough,average_speed,total_operating_time\n2024-01-01,Bronx,fast,1\n",
        )
        .unwrap();

        assert!(summarize(&paths, &[]).is_err());
    }
}
