//! Sample Data Fallback
//! In-memory synthetic datasets used when the CSV sources cannot be read.

use chrono::{Duration, Utc};
use polars::prelude::*;
use rand::Rng;

use super::generator::{COLORS, FUEL_TYPES, PAYMENT_METHODS, VEHICLE_STATUSES};

/// Number of vehicles in the fallback fleet.
pub const SAMPLE_VEHICLE_COUNT: usize = 20;
/// Number of rentals in the fallback history.
pub const SAMPLE_RENTAL_COUNT: usize = 200;

const SAMPLE_BRANDS: [&str; 7] = [
    "Toyota", "Honda", "Ford", "BMW", "Mercedes", "Audi", "Hyundai",
];
const SAMPLE_MODELS: [&str; 5] = ["Corolla", "Civic", "Focus", "X3", "Tucson"];
const SAMPLE_CATEGORIES: [&str; 4] = ["Economy", "Standard", "Premium", "Luxury"];
const SAMPLE_CLIENTS: [&str; 10] = [
    "John Smith",
    "Mary Johnson",
    "Robert Williams",
    "Sarah Davis",
    "Michael Brown",
    "Jennifer Miller",
    "David Garcia",
    "Lisa Wilson",
    "James Moore",
    "Patricia Taylor",
];

/// Fleet status mix: 60% Available, 30% Rented, 10% Under Maintenance.
const VEHICLE_STATUS_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

const RENTAL_STATUSES: [&str; 3] = ["Completed", "Active", "Reserved"];
/// 70% Completed, 20% Active, 10% Reserved.
const RENTAL_STATUS_WEIGHTS: [f64; 3] = [0.7, 0.2, 0.1];

/// Return delays of 0..=4 days, heavily skewed towards on-time.
const DELAY_WEIGHTS: [f64; 5] = [0.8, 0.1, 0.05, 0.03, 0.02];

/// Ratings: absent 20%, then 3/4/5 stars at 10/30/40%.
const RATING_CHOICES: [Option<f64>; 4] = [None, Some(3.0), Some(4.0), Some(5.0)];
const RATING_WEIGHTS: [f64; 4] = [0.2, 0.1, 0.3, 0.4];

/// Pick from `items` with the given relative weights.
pub(crate) fn weighted_choice<'a, T: Copy>(
    rng: &mut impl Rng,
    items: &'a [T],
    weights: &[f64],
) -> T {
    let total: f64 = weights.iter().sum();
    let mut draw = rng.gen::<f64>() * total;
    for (item, weight) in items.iter().zip(weights) {
        if draw < *weight {
            return *item;
        }
        draw -= weight;
    }
    items[items.len() - 1]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Synthesize the fallback vehicle fleet.
pub fn sample_vehicles(rng: &mut impl Rng) -> PolarsResult<DataFrame> {
    let n = SAMPLE_VEHICLE_COUNT;
    let mut vehicle_ids = Vec::with_capacity(n);
    let mut brands = Vec::with_capacity(n);
    let mut models = Vec::with_capacity(n);
    let mut years = Vec::with_capacity(n);
    let mut categories = Vec::with_capacity(n);
    let mut fuels = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);
    let mut rates = Vec::with_capacity(n);
    let mut statuses = Vec::with_capacity(n);
    let mut mileages = Vec::with_capacity(n);
    let mut maintenance = Vec::with_capacity(n);
    let mut conditions = Vec::with_capacity(n);

    let maintenance_start = Utc::now().date_naive() - Duration::days(n as i64);
    for i in 0..n {
        vehicle_ids.push(format!("VEH{:03}", i + 1));
        brands.push(SAMPLE_BRANDS[rng.gen_range(0..SAMPLE_BRANDS.len())].to_string());
        models.push(SAMPLE_MODELS[rng.gen_range(0..SAMPLE_MODELS.len())].to_string());
        years.push(rng.gen_range(2018..=2022) as i32);
        categories.push(SAMPLE_CATEGORIES[rng.gen_range(0..SAMPLE_CATEGORIES.len())].to_string());
        fuels.push(FUEL_TYPES[rng.gen_range(0..FUEL_TYPES.len())].to_string());
        colors.push(COLORS[rng.gen_range(0..COLORS.len())].to_string());
        rates.push(round2(rng.gen_range(30.0..150.0)));
        statuses.push(weighted_choice(rng, &VEHICLE_STATUSES, &VEHICLE_STATUS_WEIGHTS).to_string());
        mileages.push(rng.gen_range(10_000.0_f64..80_000.0).round());
        maintenance.push((maintenance_start + Duration::days(i as i64)).format("%Y-%m-%d").to_string());
        conditions.push((rng.gen_range(3.0_f64..5.0) * 10.0).round() / 10.0);
    }

    DataFrame::new(vec![
        Column::new("vehicle_id".into(), vehicle_ids),
        Column::new("brand".into(), brands),
        Column::new("model".into(), models),
        Column::new("year".into(), years),
        Column::new("category".into(), categories),
        Column::new("fuel_type".into(), fuels),
        Column::new("color".into(), colors),
        Column::new("daily_rate".into(), rates),
        Column::new("status".into(), statuses),
        Column::new("mileage".into(), mileages),
        Column::new("last_maintenance".into(), maintenance),
        Column::new("condition_score".into(), conditions),
    ])
}

/// Synthesize the fallback rental history against a fallback fleet.
pub fn sample_rentals(rng: &mut impl Rng) -> PolarsResult<DataFrame> {
    let n = SAMPLE_RENTAL_COUNT;
    let mut rental_ids = Vec::with_capacity(n);
    let mut vehicle_ids = Vec::with_capacity(n);
    let mut clients = Vec::with_capacity(n);
    let mut start_dates = Vec::with_capacity(n);
    let mut end_dates = Vec::with_capacity(n);
    let mut days = Vec::with_capacity(n);
    let mut prices = Vec::with_capacity(n);
    let mut statuses = Vec::with_capacity(n);
    let mut payments = Vec::with_capacity(n);
    let mut delays = Vec::with_capacity(n);
    let mut ratings: Vec<Option<f64>> = Vec::with_capacity(n);

    let today = Utc::now().date_naive();
    let delay_values: [i64; 5] = [0, 1, 2, 3, 4];

    for i in 0..n {
        rental_ids.push(format!("RENT{:04}", i + 1));
        vehicle_ids.push(format!("VEH{:03}", rng.gen_range(1..=SAMPLE_VEHICLE_COUNT)));
        clients.push(SAMPLE_CLIENTS[rng.gen_range(0..SAMPLE_CLIENTS.len())].to_string());

        let start = today - Duration::days(rng.gen_range(0..365));
        let rental_days = rng.gen_range(1..15) as i64;
        start_dates.push(start.format("%Y-%m-%d").to_string());
        end_dates.push((start + Duration::days(rental_days)).format("%Y-%m-%d").to_string());
        days.push(rental_days);

        prices.push(round2(rng.gen_range(100.0..2000.0)));
        statuses.push(weighted_choice(rng, &RENTAL_STATUSES, &RENTAL_STATUS_WEIGHTS).to_string());
        payments.push(PAYMENT_METHODS[rng.gen_range(0..PAYMENT_METHODS.len())].to_string());
        delays.push(weighted_choice(rng, &delay_values, &DELAY_WEIGHTS));
        ratings.push(weighted_choice(rng, &RATING_CHOICES, &RATING_WEIGHTS));
    }

    DataFrame::new(vec![
        Column::new("rental_id".into(), rental_ids),
        Column::new("vehicle_id".into(), vehicle_ids),
        Column::new("client_name".into(), clients),
        Column::new("start_date".into(), start_dates),
        Column::new("end_date".into(), end_dates),
        Column::new("rental_days".into(), days),
        Column::new("total_price".into(), prices),
        Column::new("status".into(), statuses),
        Column::new("payment_method".into(), payments),
        Column::new("return_delay_days".into(), delays),
        Column::new("customer_rating".into(), ratings),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_vehicles_shape_and_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let df = sample_vehicles(&mut rng).unwrap();
        assert_eq!(df.height(), SAMPLE_VEHICLE_COUNT);

        let statuses = df.column("status").unwrap().str().unwrap();
        for status in statuses.into_iter().flatten() {
            assert!(VEHICLE_STATUSES.contains(&status));
        }
        let rates = df.column("daily_rate").unwrap().f64().unwrap();
        for rate in rates.into_iter().flatten() {
            assert!((30.0..=150.0).contains(&rate));
        }
    }

    #[test]
    fn sample_rentals_shape_and_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let df = sample_rentals(&mut rng).unwrap();
        assert_eq!(df.height(), SAMPLE_RENTAL_COUNT);

        let delays = df.column("return_delay_days").unwrap().i64().unwrap();
        for delay in delays.into_iter().flatten() {
            assert!((0..=4).contains(&delay));
        }
        let ratings = df.column("customer_rating").unwrap().f64().unwrap();
        for rating in ratings.into_iter().flatten() {
            assert!((1.0..=5.0).contains(&rating));
        }
    }

    #[test]
    fn weighted_choice_respects_zero_weight() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let picked = weighted_choice(&mut rng, &["a", "b"], &[0.0, 1.0]);
            assert_eq!(picked, "b");
        }
    }
}
