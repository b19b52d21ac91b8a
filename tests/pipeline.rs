//! End-to-end pipeline properties over generated CSV data.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fleetlens::data::filter::{self, FilterCriteria};
use fleetlens::data::generator;
use fleetlens::data::loader::{DataLoader, DataOrigin};
use fleetlens::data::processor::{DataProcessor, PreparedData};
use fleetlens::run_pipeline;
use fleetlens::stats::month_calendar;

fn prepared_from_generated(seed: u64) -> PreparedData {
    let dir = tempfile::tempdir().unwrap();
    let vehicles_path = dir.path().join("vehicles.csv");
    let rentals_path = dir.path().join("rentals.csv");

    let mut rng = StdRng::seed_from_u64(seed);
    let vehicles = generator::generate_vehicles(&mut rng);
    let rentals = generator::generate_rentals(&mut rng, &vehicles);
    generator::write_vehicles_csv(&vehicles_path, &vehicles).unwrap();
    generator::write_rentals_csv(&rentals_path, &rentals).unwrap();

    let raw = DataLoader::from_paths(vehicles_path, rentals_path)
        .load()
        .unwrap();
    assert_eq!(raw.origin, DataOrigin::Files);
    DataProcessor::prepare(raw).unwrap()
}

fn full_year() -> FilterCriteria {
    FilterCriteria {
        date_range: Some((
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )),
        ..Default::default()
    }
}

#[test]
fn join_preserves_rental_row_count() {
    let prepared = prepared_from_generated(17);
    assert_eq!(prepared.rentals.height(), generator::GENERATED_RENTALS);
    assert_eq!(prepared.merged.height(), prepared.rentals.height());
}

#[test]
fn aggregation_totals_reconcile() {
    let prepared = prepared_from_generated(23);
    let summary = run_pipeline(&prepared, &FilterCriteria::default()).unwrap();

    assert_eq!(summary.kpis.total_rentals, generator::GENERATED_RENTALS);
    // every rental joins a generated vehicle, so the per-category counts
    // must add up to the filtered total
    let per_category: u32 = summary.categories.iter().map(|c| c.rentals).sum();
    assert_eq!(per_category as usize, summary.kpis.total_rentals);

    // revenue is additive across any partition
    let per_category_revenue: f64 = summary.categories.iter().map(|c| c.revenue).sum();
    assert!((per_category_revenue - summary.kpis.total_revenue).abs() < 1e-6);
}

#[test]
fn refiltering_with_same_criteria_is_idempotent() {
    let prepared = prepared_from_generated(31);
    let criteria = FilterCriteria {
        category: Some("SUV".to_string()),
        ..full_year()
    };
    let once = filter::apply(&prepared, &criteria).unwrap();
    let again = filter::apply(&prepared, &criteria).unwrap();
    assert!(once.vehicles.equals_missing(&again.vehicles));
    assert!(once.rentals.equals_missing(&again.rentals));
    assert!(once.merged.equals_missing(&again.merged));
}

#[test]
fn impossible_filter_degrades_to_zeroes() {
    let prepared = prepared_from_generated(5);
    let criteria = FilterCriteria {
        brand: Some("Nonexistent".to_string()),
        ..Default::default()
    };
    let summary = run_pipeline(&prepared, &criteria).unwrap();
    assert_eq!(summary.kpis.total_rentals, 0);
    assert_eq!(summary.kpis.total_revenue, 0.0);
    assert_eq!(summary.kpis.avg_rental_price, 0.0);
    assert_eq!(summary.delays.percent_delayed, 0.0);
    assert!(summary.monthly.is_empty());
    assert!(summary.recent_rentals.is_empty());
}

#[test]
fn monthly_series_follows_the_calendar() {
    let prepared = prepared_from_generated(47);
    let summary = run_pipeline(&prepared, &full_year()).unwrap();
    assert!(!summary.monthly.is_empty());

    let calendar = month_calendar(
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    );
    let mut last_index = 0;
    for point in &summary.monthly {
        let index = calendar
            .iter()
            .position(|label| label == &point.label)
            .expect("month label comes from the 2023 calendar");
        assert!(index >= last_index, "labels must be chronological");
        last_index = index;
    }
}

#[test]
fn recent_rentals_are_capped_and_sorted() {
    let prepared = prepared_from_generated(53);
    let summary = run_pipeline(&prepared, &FilterCriteria::default()).unwrap();
    assert_eq!(summary.recent_rentals.len(), 20);
    for pair in summary.recent_rentals.windows(2) {
        assert!(pair[0].start_date >= pair[1].start_date);
    }
}

#[test]
fn status_filter_keeps_rental_history_intact() {
    let prepared = prepared_from_generated(61);
    let criteria = FilterCriteria {
        status: Some("Available".to_string()),
        ..Default::default()
    };
    let filtered = filter::apply(&prepared, &criteria).unwrap();
    // current vehicle status narrows the fleet view only
    assert_eq!(filtered.rentals.height(), generator::GENERATED_RENTALS);
    assert!(filtered.vehicles.height() <= generator::GENERATED_VEHICLES);
}
