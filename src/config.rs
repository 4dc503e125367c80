//! File locations and dataset sources for the pipeline.
//!
//! Every operation receives its paths explicitly, so tests can point the
//! pipeline at a temporary directory instead of the working tree.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";

pub const SUBWAY_FILE: &str = "subway_ridership.csv";
pub const BUS_FILE: &str = "bus_speeds.csv";
pub const BUS_STOPS_FILE: &str = "bus_stops.csv";
pub const CLEANED_SUBWAY_FILE: &str = "cleaned_subway.csv";
pub const CLEANED_BUS_FILE: &str = "cleaned_bus.csv";

const OPEN_DATA_BASE_URL: &str = "https://data.ny.gov/resource/";
const SUBWAY_DATASET_ID: &str = "wujg-7c2s";
const BUS_DATASET_ID: &str = "6ksi-7cxr";
const BUS_STOPS_URL: &str =
    "https://data.cityofnewyork.us/api/views/39hk-dx4f/rows.csv?accessType=DOWNLOAD";

/// Default row limit sent to the open data API.
pub const DEFAULT_ROW_LIMIT: usize = 50_000;

/// Input and output path of one cleaning operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPaths {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// All file locations used by the pipeline, rooted at one data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub subway: CleanPaths,
    pub bus: CleanPaths,
}

impl DataPaths {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            data_dir: dir.to_path_buf(),
            subway: CleanPaths {
                input: dir.join(SUBWAY_FILE),
                output: dir.join(CLEANED_SUBWAY_FILE),
            },
            bus: CleanPaths {
                input: dir.join(BUS_FILE),
                output: dir.join(CLEANED_BUS_FILE),
            },
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// A remote dataset and the local file it is saved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub name: &'static str,
    pub url: String,
    pub file_name: &'static str,
}

impl DatasetSource {
    /// Builds a SODA API CSV export URL for a dataset on data.ny.gov.
    pub fn open_data(name: &'static str, dataset_id: &str, file_name: &'static str, limit: usize) -> Self {
        Self {
            name,
            url: format!("{OPEN_DATA_BASE_URL}{dataset_id}.csv?$limit={limit}"),
            file_name,
        }
    }
}

/// The raw datasets the cleaner and dashboard expect to find on disk.
pub fn default_sources(limit: usize) -> Vec<DatasetSource> {
    vec![
        DatasetSource::open_data("subway_ridership", SUBWAY_DATASET_ID, SUBWAY_FILE, limit),
        DatasetSource::open_data("bus_speeds", BUS_DATASET_ID, BUS_FILE, limit),
        DatasetSource {
            name: "bus_stops",
            url: BUS_STOPS_URL.to_string(),
            file_name: BUS_STOPS_FILE,
        },
    ]
}
