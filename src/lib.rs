//! FleetLens - Car Rental Fleet Analytics Dashboard
//!
//! Loads vehicle and rental datasets, joins and filters them, and reduces
//! the result to the KPI and chart tables rendered by the egui dashboard.

pub mod config;
pub mod data;
pub mod gui;
pub mod stats;

use polars::prelude::PolarsResult;

use data::filter::{self, FilterCriteria};
use data::processor::PreparedData;
use stats::{DashboardSummary, StatsCalculator};

/// One full Filter -> Aggregation run over the prepared datasets.
///
/// Stateless and re-entrant: the prepared data is never mutated, so the
/// surrounding UI can invoke this on every filter interaction.
pub fn run_pipeline(
    data: &PreparedData,
    criteria: &FilterCriteria,
) -> PolarsResult<DashboardSummary> {
    let filtered = filter::apply(data, criteria)?;
    StatsCalculator::summarize(&filtered)
}
