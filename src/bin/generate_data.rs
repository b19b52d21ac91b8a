//! Sample data generator.
//!
//! Writes `vehicles.csv` and `rentals.csv` into the target directory
//! (first argument, default `data/`).

use std::path::PathBuf;

use anyhow::Context;
use fleetlens::data::generator::{
    generate_rentals, generate_vehicles, write_rentals_csv, write_vehicles_csv,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut rng = rand::thread_rng();
    let vehicles = generate_vehicles(&mut rng);
    let rentals = generate_rentals(&mut rng, &vehicles);

    let vehicles_path = out_dir.join("vehicles.csv");
    let rentals_path = out_dir.join("rentals.csv");
    write_vehicles_csv(&vehicles_path, &vehicles)
        .with_context(|| format!("writing {}", vehicles_path.display()))?;
    write_rentals_csv(&rentals_path, &rentals)
        .with_context(|| format!("writing {}", rentals_path.display()))?;

    println!(
        "Wrote {} vehicles and {} rentals to {}",
        vehicles.len(),
        rentals.len(),
        out_dir.display()
    );
    Ok(())
}
