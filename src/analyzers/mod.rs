//! Summary metrics over the cleaned files.
//!
//! This module reads the cleaned subway and bus tables, optionally filters
//! them to a set of boroughs, and computes the headline numbers and trends
//! shown on the dashboard. [`model`] fits the baseline ridership regression
//! on the same rows.

pub mod aggregate;
pub mod analyzer;
pub mod model;
pub mod types;
