//! Data Processor Module
//! Derivation stage (date normalization, calendar columns) and the
//! rental-to-vehicle join.

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

use super::loader::{DataOrigin, RawData};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// The loaded datasets after derivation and joining, ready for filtering.
///
/// `merged` is a left join of rentals onto vehicles by `vehicle_id`;
/// colliding vehicle columns carry a `_vehicle` suffix (`status_vehicle`,
/// `year_vehicle`).
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub vehicles: DataFrame,
    pub rentals: DataFrame,
    pub merged: DataFrame,
    pub origin: DataOrigin,
}

/// Handles derivation and joining of the raw datasets.
pub struct DataProcessor;

impl DataProcessor {
    /// Run the derivation and join stages on freshly loaded data.
    pub fn prepare(raw: RawData) -> Result<PreparedData, ProcessorError> {
        require_column(&raw.vehicles, "vehicle_id")?;
        require_column(&raw.rentals, "vehicle_id")?;
        require_column(&raw.rentals, "start_date")?;

        let mut vehicles = raw.vehicles;
        if has_column(&vehicles, "last_maintenance") {
            vehicles = ensure_date(vehicles, "last_maintenance")?;
        }
        let rentals = Self::derive_rental_columns(raw.rentals)?;
        let merged = Self::join(&rentals, &vehicles)?;

        Ok(PreparedData {
            vehicles,
            rentals,
            merged,
            origin: raw.origin,
        })
    }

    /// Normalize rental dates, fill the end date (start + duration) when it
    /// is absent, and append the calendar columns derived from the start
    /// date. Idempotent: applying it to already-derived data yields the
    /// same values.
    pub fn derive_rental_columns(df: DataFrame) -> Result<DataFrame, ProcessorError> {
        let df = ensure_date(df, "start_date")?;

        let has_duration = has_column(&df, "rental_days");
        let end_from_duration = (col("start_date").cast(DataType::Int32)
            + col("rental_days").cast(DataType::Int32))
        .cast(DataType::Date);

        let df = match (has_column(&df, "end_date"), has_duration) {
            (true, true) => {
                let df = ensure_date(df, "end_date")?;
                df.lazy()
                    .with_column(
                        when(col("end_date").is_null())
                            .then(end_from_duration)
                            .otherwise(col("end_date"))
                            .alias("end_date"),
                    )
                    .collect()?
            }
            (true, false) => ensure_date(df, "end_date")?,
            (false, true) => df
                .lazy()
                .with_column(end_from_duration.alias("end_date"))
                .collect()?,
            (false, false) => return Err(ProcessorError::MissingColumn("end_date".to_string())),
        };

        // legacy files carry only the date pair; recover the duration
        let df = if has_duration {
            df
        } else {
            df.lazy()
                .with_column(
                    (col("end_date").cast(DataType::Int32)
                        - col("start_date").cast(DataType::Int32))
                    .cast(DataType::Int64)
                    .alias("rental_days"),
                )
                .collect()?
        };

        let df = df
            .lazy()
            .with_columns([
                col("start_date").dt().to_string("%B").alias("month"),
                col("start_date").dt().year().alias("year"),
                col("start_date").dt().to_string("%b %Y").alias("month_label"),
            ])
            .collect()?;
        Ok(df)
    }

    /// Left-outer join of rentals onto vehicle attributes. One output row
    /// per rental row; unmatched vehicle ids yield null vehicle columns.
    pub fn join(rentals: &DataFrame, vehicles: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let merged = rentals
            .clone()
            .lazy()
            .join(
                vehicles.clone().lazy(),
                [col("vehicle_id")],
                [col("vehicle_id")],
                JoinArgs::new(JoinType::Left).with_suffix(Some("_vehicle".into())),
            )
            .collect()?;
        Ok(merged)
    }

    /// Sorted unique non-null values of a column, for filter vocabularies.
    pub fn unique_values(df: &DataFrame, column: &str) -> Vec<String> {
        df.column(column)
            .ok()
            .and_then(|col| col.unique().ok())
            .map(|unique| {
                let series = unique.as_materialized_series();
                let mut values: Vec<String> = (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();
                values.sort();
                values
            })
            .unwrap_or_default()
    }
}

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

fn require_column(df: &DataFrame, name: &str) -> Result<(), ProcessorError> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(ProcessorError::MissingColumn(name.to_string()))
    }
}

/// Cast a column to the Date dtype, parsing `%Y-%m-%d` strings if needed.
fn ensure_date(df: DataFrame, column: &str) -> Result<DataFrame, ProcessorError> {
    let dtype = df.column(column)?.dtype().clone();
    let df = match dtype {
        DataType::Date => df,
        DataType::String => df
            .lazy()
            .with_column(
                col(column)
                    .str()
                    .to_date(StrptimeOptions {
                        format: Some("%Y-%m-%d".into()),
                        strict: false,
                        ..Default::default()
                    })
                    .alias(column),
            )
            .collect()?,
        _ => df
            .lazy()
            .with_column(col(column).cast(DataType::Date).alias(column))
            .collect()?,
    };
    Ok(df)
}

/// Min and max of a date column, if it has any non-null values.
pub fn date_bounds(df: &DataFrame, column: &str) -> Option<(NaiveDate, NaiveDate)> {
    let column = df.column(column).ok()?.cast(&DataType::Int32).ok()?;
    let ca = column.i32().ok()?;
    match (ca.min(), ca.max()) {
        (Some(min), Some(max)) => Some((date_from_days(min), date_from_days(max))),
        _ => None,
    }
}

pub(crate) fn unix_epoch() -> NaiveDate {
    chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.date_naive()
}

pub(crate) fn days_since_epoch(date: NaiveDate) -> i32 {
    (date - unix_epoch()).num_days() as i32
}

pub(crate) fn date_from_days(days: i32) -> NaiveDate {
    unix_epoch() + chrono::Duration::days(days as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataOrigin;

    fn rentals_fixture() -> DataFrame {
        DataFrame::new(vec![
            Column::new("rental_id".into(), vec!["RENT0001", "RENT0002", "RENT0003"]),
            Column::new("vehicle_id".into(), vec!["VEH001", "VEH002", "VEH009"]),
            Column::new("client_name".into(), vec!["Aya", "Imad", "Salma"]),
            Column::new(
                "start_date".into(),
                vec!["2023-02-10", "2023-11-03", "2023-02-27"],
            ),
            Column::new(
                "end_date".into(),
                vec![Some("2023-02-14"), None, Some("2023-03-04")],
            ),
            Column::new("rental_days".into(), vec![4i64, 7, 5]),
            Column::new("total_price".into(), vec![400.0, 700.0, 500.0]),
            Column::new("status".into(), vec!["Completed", "Ongoing", "Completed"]),
        ])
        .unwrap()
    }

    fn vehicles_fixture() -> DataFrame {
        DataFrame::new(vec![
            Column::new("vehicle_id".into(), vec!["VEH001", "VEH002"]),
            Column::new("brand".into(), vec!["Renault", "Dacia"]),
            Column::new("category".into(), vec!["SUV", "Sedan"]),
            Column::new("status".into(), vec!["Available", "Rented"]),
        ])
        .unwrap()
    }

    #[test]
    fn absent_end_date_is_start_plus_duration() {
        let derived = DataProcessor::derive_rental_columns(rentals_fixture()).unwrap();
        let ends = derived
            .column("end_date")
            .unwrap()
            .cast(&DataType::Int32)
            .unwrap();
        let ends = ends.i32().unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 11, 10).unwrap();
        assert_eq!(date_from_days(ends.get(1).unwrap()), expected);
        // provided end dates are left untouched
        let provided = NaiveDate::from_ymd_opt(2023, 2, 14).unwrap();
        assert_eq!(date_from_days(ends.get(0).unwrap()), provided);
    }

    #[test]
    fn calendar_columns_derive_from_start_date() {
        let derived = DataProcessor::derive_rental_columns(rentals_fixture()).unwrap();
        let labels = derived.column("month_label").unwrap().clone();
        let labels = labels.str().unwrap();
        assert_eq!(labels.get(0), Some("Feb 2023"));
        assert_eq!(labels.get(1), Some("Nov 2023"));

        let months = derived.column("month").unwrap().clone();
        let months = months.str().unwrap();
        assert_eq!(months.get(0), Some("February"));

        let years = derived.column("year").unwrap().i32().unwrap();
        assert_eq!(years.get(0), Some(2023));
    }

    #[test]
    fn duration_is_recovered_from_the_date_pair() {
        let df = DataFrame::new(vec![
            Column::new("rental_id".into(), vec!["RENT0001", "RENT0002"]),
            Column::new("vehicle_id".into(), vec!["VEH001", "VEH002"]),
            Column::new("start_date".into(), vec!["2023-05-01", "2023-05-10"]),
            Column::new("end_date".into(), vec!["2023-05-04", "2023-05-24"]),
        ])
        .unwrap();
        let derived = DataProcessor::derive_rental_columns(df).unwrap();
        let days = derived.column("rental_days").unwrap().i64().unwrap();
        assert_eq!(days.get(0), Some(3));
        assert_eq!(days.get(1), Some(14));
    }

    #[test]
    fn derivation_is_idempotent() {
        let once = DataProcessor::derive_rental_columns(rentals_fixture()).unwrap();
        let twice = DataProcessor::derive_rental_columns(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }

    #[test]
    fn join_preserves_rental_row_count() {
        let rentals = DataProcessor::derive_rental_columns(rentals_fixture()).unwrap();
        let merged = DataProcessor::join(&rentals, &vehicles_fixture()).unwrap();
        assert_eq!(merged.height(), rentals.height());

        // unmatched vehicle id yields null vehicle attributes
        let brands = merged.column("brand").unwrap().clone();
        let brands = brands.str().unwrap();
        assert_eq!(brands.get(0), Some("Renault"));
        assert_eq!(brands.get(2), None);
    }

    #[test]
    fn prepare_flags_missing_columns() {
        let raw = RawData {
            vehicles: vehicles_fixture(),
            rentals: DataFrame::new(vec![Column::new("rental_id".into(), vec!["RENT0001"])])
                .unwrap(),
            origin: DataOrigin::Files,
        };
        assert!(matches!(
            DataProcessor::prepare(raw),
            Err(ProcessorError::MissingColumn(_))
        ));
    }

    #[test]
    fn epoch_day_conversions_round_trip() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(date_from_days(days_since_epoch(date)), date);
    }
}
