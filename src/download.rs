//! Downloads the raw datasets the cleaner consumes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::DatasetSource;
use crate::fetch::{HttpClient, fetch_bytes};

/// Per-dataset results of a download run.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub saved: Vec<SavedDataset>,
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDataset {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
}

impl DownloadSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches one dataset and saves it under `data_dir`, replacing any previous
/// copy. The saved file is re-read as CSV to report its row count.
#[tracing::instrument(skip(client, data_dir), fields(dataset = source.name, url = %source.url))]
pub async fn download_dataset<C: HttpClient>(
    client: &C,
    source: &DatasetSource,
    data_dir: &Path,
) -> Result<SavedDataset> {
    info!("Downloading dataset");
    let bytes = fetch_bytes(client, &source.url).await?;

    let path = data_dir.join(source.file_name);
    fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;

    let rows = count_rows(&path)?;
    info!(path = %path.display(), rows, "Dataset saved");

    Ok(SavedDataset {
        name: source.name.to_string(),
        path,
        rows,
    })
}

/// Downloads every source in order. A failing dataset is recorded and the
/// remaining ones are still attempted.
pub async fn download_all<C: HttpClient>(
    client: &C,
    sources: &[DatasetSource],
    data_dir: &Path,
) -> Result<DownloadSummary> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;

    let mut summary = DownloadSummary::default();
    for source in sources {
        match download_dataset(client, source, data_dir).await {
            Ok(saved) => summary.saved.push(saved),
            Err(e) => {
                error!(dataset = source.name, error = %e, "Download failed");
                summary.failed.push((source.name.to_string(), format!("{e:#}")));
            }
        }
    }
    Ok(summary)
}

fn count_rows(path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = 0;
    for record in reader.records() {
        record.with_context(|| format!("{} is not valid CSV", path.display()))?;
        rows += 1;
    }
    Ok(rows)
}
