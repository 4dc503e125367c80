//! Baseline linear regression of subway ridership.
//!
//! Features are `hour` plus one-hot `borough` and `day_of_week` indicators.
//! The alphabetically first category of each is dropped as the reference
//! level. Rows are shuffled with a fixed seed and split 80/20 into train
//! and test sets.

use crate::analyzers::analyzer::load_rows;
use crate::analyzers::types::SubwayRow;
use crate::config::DataPaths;
use anyhow::{Result, anyhow, bail};
use linfa::metrics::SingleTargetRegression;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

pub const DEFAULT_SEED: u64 = 42;
pub const TEST_FRACTION: f64 = 0.2;

/// Fitted coefficient for one feature column.
#[derive(Debug, Serialize)]
pub struct Coefficient {
    pub feature: String,
    pub weight: f64,
}

/// Fit and evaluation results of the baseline model.
#[derive(Debug, Serialize)]
pub struct ModelReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub intercept: f64,
    pub coefficients: Vec<Coefficient>,
    pub mean_squared_error: f64,
    pub r2: f64,
}

/// Trains the model on the cleaned subway file. Returns `None` if the file
/// has not been produced yet.
#[tracing::instrument(skip(paths), fields(input = %paths.subway.output.display()))]
pub fn train_ridership_model(paths: &DataPaths, seed: u64) -> Result<Option<ModelReport>> {
    let Some(rows) = load_rows::<SubwayRow>(&paths.subway.output)? else {
        return Ok(None);
    };
    let report = fit_baseline(&rows, seed)?;
    info!(
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        mse = report.mean_squared_error,
        r2 = report.r2,
        "Ridership model trained"
    );
    Ok(Some(report))
}

/// Encodes, splits, fits and evaluates the model on in-memory rows.
pub fn fit_baseline(rows: &[SubwayRow], seed: u64) -> Result<ModelReport> {
    let encoder = FeatureEncoder::new(rows);

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_rows = (rows.len() as f64 * TEST_FRACTION).ceil() as usize;
    let (test_idx, train_idx) = order.split_at(test_rows);

    // Columns constant at zero in the training set would make the fit singular.
    let (train_x, train_y) = encoder.encode(rows, train_idx)?;
    let kept: Vec<usize> = (0..encoder.names.len())
        .filter(|&c| train_x.column(c).iter().any(|v| *v != 0.0))
        .collect();
    if train_idx.len() <= kept.len() || test_idx.is_empty() {
        bail!(
            "not enough rows to fit {} features: {} train, {} test",
            kept.len(),
            train_idx.len(),
            test_idx.len()
        );
    }
    let train_x = train_x.select(ndarray::Axis(1), &kept);
    let (test_x, test_y) = encoder.encode(rows, test_idx)?;
    let test_x = test_x.select(ndarray::Axis(1), &kept);

    let model = LinearRegression::new()
        .fit(&Dataset::new(train_x, train_y))
        .map_err(|e| anyhow!("linear regression fit failed: {e}"))?;

    let predicted = model.predict(&test_x);
    let mean_squared_error = predicted
        .mean_squared_error(&test_y)
        .map_err(|e| anyhow!("cannot compute MSE: {e}"))?;
    let r2 = predicted
        .r2(&test_y)
        .map_err(|e| anyhow!("cannot compute R2: {e}"))?;

    Ok(ModelReport {
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        intercept: model.intercept(),
        coefficients: kept
            .iter()
            .zip(model.params())
            .map(|(&c, &weight)| Coefficient {
                feature: encoder.names[c].clone(),
                weight,
            })
            .collect(),
        mean_squared_error,
        r2,
    })
}

/// One-hot encoding with the first category of each column dropped.
struct FeatureEncoder {
    boroughs: Vec<String>,
    days: Vec<String>,
    names: Vec<String>,
}

impl FeatureEncoder {
    fn new(rows: &[SubwayRow]) -> Self {
        let boroughs = levels(rows.iter().map(|r| r.borough.as_str()));
        let days = levels(rows.iter().map(|r| r.day_of_week.as_str()));

        let mut names = vec!["hour".to_string()];
        names.extend(boroughs.iter().map(|b| format!("borough_{b}")));
        names.extend(days.iter().map(|d| format!("day_of_week_{d}")));

        Self {
            boroughs,
            days,
            names,
        }
    }

    fn encode(&self, rows: &[SubwayRow], idx: &[usize]) -> Result<(Array2<f64>, Array1<f64>)> {
        let width = self.names.len();
        let mut flat = Vec::with_capacity(idx.len() * width);
        for &i in idx {
            let row = &rows[i];
            flat.push(f64::from(row.hour));
            flat.extend(self.boroughs.iter().map(|b| indicator(b == &row.borough)));
            flat.extend(self.days.iter().map(|d| indicator(d == &row.day_of_week)));
        }
        let x = Array2::from_shape_vec((idx.len(), width), flat)?;
        let y = idx.iter().map(|&i| rows[i].ridership).collect();
        Ok((x, y))
    }
}

/// Sorted distinct values without the first, which becomes the reference level.
fn levels<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let all: BTreeSet<&str> = values.collect();
    all.into_iter().skip(1).map(str::to_string).collect()
}

fn indicator(hit: bool) -> f64 {
    if hit { 1.0 } else { 0.0 }
}
