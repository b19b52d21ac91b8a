//! Sample File Generator
//! Synthesizes the two demo CSV datasets consumed by the dashboard.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Number of vehicles written by the generator.
pub const GENERATED_VEHICLES: usize = 21;
/// Number of rentals written by the generator.
pub const GENERATED_RENTALS: usize = 250;

pub const BRANDS: [&str; 5] = ["Renault", "Dacia", "Peugeot", "Citroen", "Ford"];
pub const CATEGORIES: [&str; 4] = ["Sedan", "SUV", "Hatchback", "Truck"];
pub const FUEL_TYPES: [&str; 4] = ["Petrol", "Diesel", "Hybrid", "Electric"];
pub const COLORS: [&str; 6] = ["Red", "White", "Black", "Blue", "Silver", "Grey"];
pub const VEHICLE_STATUSES: [&str; 3] = ["Available", "Rented", "Under Maintenance"];
pub const RENTAL_STATUSES: [&str; 3] = ["Completed", "Cancelled", "Ongoing"];
pub const PAYMENT_METHODS: [&str; 4] = ["Cash", "Credit Card", "Debit Card", "Online Payment"];

const CLIENT_NAMES: [&str; 10] = [
    "Aya", "Salma", "Koki", "Chadi", "Imad", "Sana", "Amine", "Laila", "Youssef", "Fatima",
];

/// Model line-up per brand.
pub fn models_for(brand: &str) -> &'static [&'static str] {
    match brand {
        "Renault" => &["Clio", "Megane", "Captur"],
        "Dacia" => &["Logan", "Sandero", "Duster"],
        "Peugeot" => &["208", "308", "3008"],
        "Citroen" => &["C3", "C4", "C5"],
        _ => &["Focus", "Fiesta", "Kuga"],
    }
}

/// One generated fleet vehicle.
#[derive(Debug, Clone)]
pub struct VehicleRow {
    pub vehicle_id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: String,
    pub fuel_type: String,
    pub color: String,
    pub daily_rate: f64,
    pub status: String,
    pub mileage: f64,
    pub last_maintenance: NaiveDate,
    pub condition_score: f64,
}

/// One generated rental transaction.
#[derive(Debug, Clone)]
pub struct RentalRow {
    pub rental_id: String,
    pub vehicle_id: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rental_days: i64,
    pub total_price: f64,
    pub status: String,
    pub payment_method: Option<String>,
    pub return_delay_days: Option<i64>,
    pub customer_rating: Option<f64>,
}

/// Rental start dates span this fixed one-year window.
pub fn rental_window() -> (NaiveDate, NaiveDate) {
    let from = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid calendar date");
    let to = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid calendar date");
    (from, to)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generate the fleet.
pub fn generate_vehicles(rng: &mut impl Rng) -> Vec<VehicleRow> {
    let (window_start, _) = rental_window();
    (1..=GENERATED_VEHICLES)
        .map(|i| {
            let brand = BRANDS[rng.gen_range(0..BRANDS.len())];
            let models = models_for(brand);
            VehicleRow {
                vehicle_id: format!("VEH{:03}", i),
                brand: brand.to_string(),
                model: models[rng.gen_range(0..models.len())].to_string(),
                year: rng.gen_range(2015..=2023),
                category: CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
                fuel_type: FUEL_TYPES[rng.gen_range(0..FUEL_TYPES.len())].to_string(),
                color: COLORS[rng.gen_range(0..COLORS.len())].to_string(),
                daily_rate: round2(rng.gen_range(150.0..500.0)),
                status: VEHICLE_STATUSES[rng.gen_range(0..VEHICLE_STATUSES.len())].to_string(),
                mileage: rng.gen_range(5_000.0_f64..120_000.0).round(),
                last_maintenance: window_start - Duration::days(rng.gen_range(0..180)),
                condition_score: (rng.gen_range(1.0_f64..5.0) * 10.0).round() / 10.0,
            }
        })
        .collect()
}

/// Generate the rental history. Total price is daily rate times duration;
/// rating, delay and payment method are recorded for completed rentals only.
pub fn generate_rentals(rng: &mut impl Rng, vehicles: &[VehicleRow]) -> Vec<RentalRow> {
    let (window_start, window_end) = rental_window();
    let window_days = (window_end - window_start).num_days();

    (1..=GENERATED_RENTALS)
        .map(|i| {
            let vehicle = &vehicles[rng.gen_range(0..vehicles.len())];
            let start_date = window_start + Duration::days(rng.gen_range(0..=window_days));
            let rental_days = rng.gen_range(1..=14) as i64;
            let status = RENTAL_STATUSES[rng.gen_range(0..RENTAL_STATUSES.len())];
            let completed = status == "Completed";

            RentalRow {
                rental_id: format!("RENT{:04}", i),
                vehicle_id: vehicle.vehicle_id.clone(),
                client_name: CLIENT_NAMES[rng.gen_range(0..CLIENT_NAMES.len())].to_string(),
                start_date,
                end_date: start_date + Duration::days(rental_days),
                rental_days,
                total_price: round2(vehicle.daily_rate * rental_days as f64),
                status: status.to_string(),
                payment_method: completed
                    .then(|| PAYMENT_METHODS[rng.gen_range(0..PAYMENT_METHODS.len())].to_string()),
                return_delay_days: completed.then(|| rng.gen_range(0..=10)),
                customer_rating: completed
                    .then(|| (rng.gen_range(1.0_f64..5.0) * 10.0).round() / 10.0),
            }
        })
        .collect()
}

/// Write the fleet to a headered CSV file.
pub fn write_vehicles_csv(path: &Path, vehicles: &[VehicleRow]) -> Result<(), GeneratorError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "vehicle_id",
        "brand",
        "model",
        "year",
        "category",
        "fuel_type",
        "color",
        "daily_rate",
        "status",
        "mileage",
        "last_maintenance",
        "condition_score",
    ])?;
    for v in vehicles {
        writer.write_record([
            v.vehicle_id.clone(),
            v.brand.clone(),
            v.model.clone(),
            v.year.to_string(),
            v.category.clone(),
            v.fuel_type.clone(),
            v.color.clone(),
            format!("{:.2}", v.daily_rate),
            v.status.clone(),
            format!("{}", v.mileage),
            v.last_maintenance.format("%Y-%m-%d").to_string(),
            format!("{:.1}", v.condition_score),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the rental history to a headered CSV file. Optional fields are
/// written as empty cells so they load back as nulls.
pub fn write_rentals_csv(path: &Path, rentals: &[RentalRow]) -> Result<(), GeneratorError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "rental_id",
        "vehicle_id",
        "client_name",
        "start_date",
        "end_date",
        "rental_days",
        "total_price",
        "status",
        "payment_method",
        "return_delay_days",
        "customer_rating",
    ])?;
    for r in rentals {
        writer.write_record([
            r.rental_id.clone(),
            r.vehicle_id.clone(),
            r.client_name.clone(),
            r.start_date.format("%Y-%m-%d").to_string(),
            r.end_date.format("%Y-%m-%d").to_string(),
            r.rental_days.to_string(),
            format!("{:.2}", r.total_price),
            r.status.clone(),
            r.payment_method.clone().unwrap_or_default(),
            r.return_delay_days.map(|d| d.to_string()).unwrap_or_default(),
            r.customer_rating.map(|c| format!("{:.1}", c)).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
