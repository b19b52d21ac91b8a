//! Filter Stage
//! Narrows the prepared datasets by date range, category, status, and
//! brand. `None` on any criterion is the "All" sentinel.

use chrono::NaiveDate;
use polars::prelude::*;

use super::processor::{days_since_epoch, PreparedData};

/// User-selected filter criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive range on the rental start date.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub category: Option<String>,
    /// Current vehicle status; narrows the vehicle set only (status is not
    /// a historical rental attribute).
    pub status: Option<String>,
    pub brand: Option<String>,
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.brand.is_none()
    }
}

/// Narrowed copies of the prepared datasets.
#[derive(Debug, Clone)]
pub struct FilteredData {
    pub vehicles: DataFrame,
    pub rentals: DataFrame,
    pub merged: DataFrame,
}

/// Apply the criteria, producing narrowed copies. The source datasets are
/// never mutated; applying the same criteria twice yields the same output.
pub fn apply(data: &PreparedData, criteria: &FilterCriteria) -> PolarsResult<FilteredData> {
    let mut vehicles = data.vehicles.clone();
    let mut rentals = data.rentals.clone();
    let mut merged = data.merged.clone();

    if let Some((from, to)) = criteria.date_range {
        let in_range = col("start_date")
            .gt_eq(date_lit(from))
            .and(col("start_date").lt_eq(date_lit(to)));
        rentals = rentals.lazy().filter(in_range.clone()).collect()?;
        merged = merged.lazy().filter(in_range).collect()?;
    }

    // Category and brand are immutable vehicle attributes: narrow the fleet,
    // then propagate to the rental sets through vehicle-id membership.
    if let Some(category) = &criteria.category {
        vehicles = equals_filter(vehicles, "category", category)?;
        rentals = retain_vehicle_ids(rentals, &vehicles)?;
        merged = equals_filter(merged, "category", category)?;
    }

    if let Some(brand) = &criteria.brand {
        vehicles = equals_filter(vehicles, "brand", brand)?;
        rentals = retain_vehicle_ids(rentals, &vehicles)?;
        merged = equals_filter(merged, "brand", brand)?;
    }

    if let Some(status) = &criteria.status {
        vehicles = equals_filter(vehicles, "status", status)?;
    }

    Ok(FilteredData {
        vehicles,
        rentals,
        merged,
    })
}

fn date_lit(date: NaiveDate) -> Expr {
    lit(days_since_epoch(date)).cast(DataType::Date)
}

fn equals_filter(df: DataFrame, column: &str, value: &str) -> PolarsResult<DataFrame> {
    df.lazy().filter(col(column).eq(lit(value))).collect()
}

/// Keep only rental rows whose vehicle id appears in the (already
/// narrowed) vehicle set.
fn retain_vehicle_ids(rentals: DataFrame, vehicles: &DataFrame) -> PolarsResult<DataFrame> {
    let ids = vehicles.column("vehicle_id")?.clone();
    rentals
        .lazy()
        .filter(col("vehicle_id").is_in(lit(ids.as_materialized_series().clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{DataOrigin, RawData};
    use crate::data::processor::DataProcessor;

    fn prepared_fixture() -> PreparedData {
        let vehicles = DataFrame::new(vec![
            Column::new("vehicle_id".into(), vec!["VEH001", "VEH002", "VEH003"]),
            Column::new("brand".into(), vec!["Renault", "Dacia", "Renault"]),
            Column::new("category".into(), vec!["SUV", "Sedan", "SUV"]),
            Column::new(
                "status".into(),
                vec!["Available", "Rented", "Under Maintenance"],
            ),
        ])
        .unwrap();
        let rentals = DataFrame::new(vec![
            Column::new(
                "rental_id".into(),
                vec!["RENT0001", "RENT0002", "RENT0003", "RENT0004"],
            ),
            Column::new(
                "vehicle_id".into(),
                vec!["VEH001", "VEH002", "VEH003", "VEH001"],
            ),
            Column::new("client_name".into(), vec!["Aya", "Imad", "Salma", "Chadi"]),
            Column::new(
                "start_date".into(),
                vec!["2023-01-05", "2023-03-17", "2023-06-02", "2023-09-24"],
            ),
            Column::new(
                "end_date".into(),
                vec!["2023-01-08", "2023-03-20", "2023-06-09", "2023-09-30"],
            ),
            Column::new("rental_days".into(), vec![3i64, 3, 7, 6]),
            Column::new("total_price".into(), vec![300.0, 450.0, 700.0, 660.0]),
            Column::new(
                "status".into(),
                vec!["Completed", "Completed", "Ongoing", "Completed"],
            ),
        ])
        .unwrap();
        DataProcessor::prepare(RawData {
            vehicles,
            rentals,
            origin: DataOrigin::Files,
        })
        .unwrap()
    }

    fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> Option<(NaiveDate, NaiveDate)> {
        Some((
            NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        ))
    }

    #[test]
    fn unrestricted_criteria_keep_everything() {
        let data = prepared_fixture();
        let filtered = apply(&data, &FilterCriteria::default()).unwrap();
        assert_eq!(filtered.vehicles.height(), 3);
        assert_eq!(filtered.rentals.height(), 4);
        assert_eq!(filtered.merged.height(), 4);
    }

    #[test]
    fn date_range_is_inclusive() {
        let data = prepared_fixture();
        let criteria = FilterCriteria {
            date_range: range((2023, 1, 5), (2023, 6, 2)),
            ..Default::default()
        };
        let filtered = apply(&data, &criteria).unwrap();
        assert_eq!(filtered.rentals.height(), 3);
        assert_eq!(filtered.merged.height(), 3);
        // vehicle table is not date-filtered
        assert_eq!(filtered.vehicles.height(), 3);
    }

    #[test]
    fn category_propagates_to_rentals_by_vehicle_membership() {
        let data = prepared_fixture();
        let criteria = FilterCriteria {
            category: Some("SUV".to_string()),
            ..Default::default()
        };
        let filtered = apply(&data, &criteria).unwrap();
        assert_eq!(filtered.vehicles.height(), 2);
        // rentals of VEH001 and VEH003
        assert_eq!(filtered.rentals.height(), 3);
        assert_eq!(filtered.merged.height(), 3);
    }

    #[test]
    fn status_narrows_vehicles_only() {
        let data = prepared_fixture();
        let criteria = FilterCriteria {
            status: Some("Available".to_string()),
            ..Default::default()
        };
        let filtered = apply(&data, &criteria).unwrap();
        assert_eq!(filtered.vehicles.height(), 1);
        assert_eq!(filtered.rentals.height(), 4);
        assert_eq!(filtered.merged.height(), 4);
    }

    #[test]
    fn category_and_brand_intersect() {
        let data = prepared_fixture();
        let criteria = FilterCriteria {
            category: Some("SUV".to_string()),
            brand: Some("Renault".to_string()),
            ..Default::default()
        };
        let filtered = apply(&data, &criteria).unwrap();
        assert_eq!(filtered.vehicles.height(), 2);
        assert_eq!(filtered.rentals.height(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let data = prepared_fixture();
        let criteria = FilterCriteria {
            date_range: range((2023, 1, 1), (2023, 12, 31)),
            category: Some("SUV".to_string()),
            ..Default::default()
        };
        let once = apply(&data, &criteria).unwrap();
        let again = apply(&data, &criteria).unwrap();
        assert!(once.rentals.equals_missing(&again.rentals));
        assert!(once.vehicles.equals_missing(&again.vehicles));
        assert!(once.merged.equals_missing(&again.merged));
    }
}
