//! CSV Data Loader Module
//! Reads the vehicle and rental datasets with Polars, falling back to
//! synthetic sample data when the source files cannot be read.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::AppConfig;

use super::sample;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Which source produced the loaded datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Both CSV files were read from the configured data directory.
    Files,
    /// At least one file was unreadable; synthetic sample data is in use.
    Sample,
}

/// The two raw tabular datasets, before derivation and joining.
#[derive(Debug, Clone)]
pub struct RawData {
    pub vehicles: DataFrame,
    pub rentals: DataFrame,
    pub origin: DataOrigin,
}

/// Legacy spreadsheet headers accepted on ingest.
const VEHICLE_COLUMN_ALIASES: [(&str, &str); 3] = [
    ("make", "brand"),
    ("vehicle_type", "category"),
    ("rental_price_per_day", "daily_rate"),
];

/// Reads the two CSV datasets for a configured data directory.
pub struct DataLoader {
    vehicles_path: PathBuf,
    rentals_path: PathBuf,
}

impl DataLoader {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            vehicles_path: config.vehicles_path(),
            rentals_path: config.rentals_path(),
        }
    }

    pub fn from_paths(vehicles_path: PathBuf, rentals_path: PathBuf) -> Self {
        Self {
            vehicles_path,
            rentals_path,
        }
    }

    /// Load both datasets. A single synchronous attempt; on failure the
    /// sample fallback is generated and a warning is logged.
    pub fn load(&self) -> Result<RawData, LoaderError> {
        match self.read_files() {
            Ok((vehicles, rentals)) => {
                log::info!(
                    "Loaded {} vehicles and {} rentals from {}",
                    vehicles.height(),
                    rentals.height(),
                    self.vehicles_path
                        .parent()
                        .unwrap_or(Path::new("."))
                        .display()
                );
                Ok(RawData {
                    vehicles,
                    rentals,
                    origin: DataOrigin::Files,
                })
            }
            Err(e) => {
                log::warn!(
                    "CSV files not found or unreadable ({}). Using sample data instead.",
                    e
                );
                let mut rng = rand::thread_rng();
                Ok(RawData {
                    vehicles: sample::sample_vehicles(&mut rng)?,
                    rentals: sample::sample_rentals(&mut rng)?,
                    origin: DataOrigin::Sample,
                })
            }
        }
    }

    fn read_files(&self) -> Result<(DataFrame, DataFrame), LoaderError> {
        let vehicles = normalize_vehicle_columns(read_csv(&self.vehicles_path)?)?;
        let rentals = read_csv(&self.rentals_path)?;
        Ok((vehicles, rentals))
    }
}

/// Load a single CSV file using Polars lazy evaluation.
fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Rename legacy spreadsheet headers to the canonical column names.
fn normalize_vehicle_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
    for (legacy, canonical) in VEHICLE_COLUMN_ALIASES {
        let has_legacy = df
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == legacy);
        if has_legacy {
            df.rename(legacy, canonical.into())?;
        }
    }
    Ok(df)
}
