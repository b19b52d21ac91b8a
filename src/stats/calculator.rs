//! Aggregation Stage
//! Pure reducers turning the filtered datasets into the summary tables and
//! scalar KPIs consumed by the dashboard.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::data::filter::FilteredData;
use crate::data::processor::{date_from_days, has_column};

/// Scalar key performance indicators over the filtered data.
#[derive(Debug, Clone, Default)]
pub struct KpiSummary {
    pub total_rentals: usize,
    pub total_revenue: f64,
    pub avg_rental_price: f64,
    pub avg_rental_days: f64,
    pub avg_rating: f64,
    pub available_vehicles: usize,
    pub rented_vehicles: usize,
    pub maintenance_vehicles: usize,
}

/// One month on the rental/revenue time series.
#[derive(Debug, Clone)]
pub struct MonthlyPoint {
    pub label: String,
    pub rentals: u32,
    pub revenue: f64,
}

/// Per-category rental performance.
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub category: String,
    pub rentals: u32,
    pub revenue: f64,
    pub avg_rating: f64,
}

/// Per-brand rental performance (top brands only).
#[derive(Debug, Clone)]
pub struct BrandSummary {
    pub brand: String,
    pub rentals: u32,
    pub revenue: f64,
    pub avg_rating: f64,
}

#[derive(Debug, Clone)]
pub struct StatusCount {
    pub status: String,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct ClientCount {
    pub client: String,
    pub rentals: u32,
}

#[derive(Debug, Clone)]
pub struct RatingCount {
    pub rating: f64,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct PaymentSummary {
    pub method: String,
    pub revenue: f64,
    pub rentals: u32,
}

/// Return-delay breakdown. Percentages are over all filtered rentals.
#[derive(Debug, Clone, Default)]
pub struct DelayAnalysis {
    /// (delay in days, rental count), sorted by delay.
    pub distribution: Vec<(i64, u32)>,
    pub avg_delay: f64,
    pub delayed: u32,
    pub on_time: u32,
    pub percent_delayed: f64,
}

/// One point of the duration-vs-price scatter.
#[derive(Debug, Clone)]
pub struct DurationPricePoint {
    pub days: f64,
    pub price: f64,
    pub delay: f64,
}

/// One row of the fleet detail table.
#[derive(Debug, Clone)]
pub struct FleetRow {
    pub vehicle_id: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub category: String,
    pub fuel_type: String,
    pub color: String,
    pub daily_rate: String,
    pub status: String,
}

/// One row of the recent-rentals table.
#[derive(Debug, Clone)]
pub struct RecentRental {
    pub rental_id: String,
    pub vehicle_id: String,
    pub client: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days: Option<i64>,
    pub price: Option<f64>,
    pub status: String,
    pub delay: Option<i64>,
    pub rating: Option<f64>,
}

/// Everything the dashboard renders, computed in one pass.
#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub kpis: KpiSummary,
    pub monthly: Vec<MonthlyPoint>,
    pub categories: Vec<CategorySummary>,
    pub brands: Vec<BrandSummary>,
    pub status_distribution: Vec<StatusCount>,
    pub condition_scores: Vec<f64>,
    pub top_clients: Vec<ClientCount>,
    pub delays: DelayAnalysis,
    pub ratings: Vec<RatingCount>,
    pub high_rating_percent: f64,
    pub payments: Vec<PaymentSummary>,
    pub duration_price: Vec<DurationPricePoint>,
    pub fleet: Vec<FleetRow>,
    pub recent_rentals: Vec<RecentRental>,
}

/// How many brands and clients the ranked summaries keep.
const TOP_N: usize = 10;
/// How many rows the recent-rentals table shows.
const RECENT_LIMIT: usize = 20;

/// Classify a return delay.
pub fn timeliness(delay_days: i64) -> &'static str {
    if delay_days > 0 {
        "Delayed"
    } else {
        "On Time"
    }
}

/// Chronological `%b %Y` labels covering every month from `from` to `to`.
pub fn month_calendar(from: NaiveDate, to: NaiveDate) -> Vec<String> {
    let mut labels = Vec::new();
    let (mut year, mut month) = (from.year(), from.month());
    let end = (to.year(), to.month());
    while (year, month) <= end {
        if let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) {
            labels.push(first.format("%b %Y").to_string());
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    labels
}

/// Computes the dashboard aggregations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Reduce the filtered datasets to the full dashboard summary.
    pub fn summarize(data: &FilteredData) -> PolarsResult<DashboardSummary> {
        let ratings = f64_values(&data.rentals, "customer_rating")?;
        let delays = i64_values(&data.rentals, "return_delay_days")?;

        let (rating_counts, high_rating_percent) = Self::rating_distribution(&ratings);

        Ok(DashboardSummary {
            kpis: Self::kpis(data, &ratings)?,
            monthly: Self::monthly(&data.rentals)?,
            categories: Self::categories(&data.merged)?,
            brands: Self::brands(&data.merged)?,
            status_distribution: Self::status_distribution(&data.vehicles)?,
            condition_scores: f64_values(&data.vehicles, "condition_score")?
                .into_iter()
                .flatten()
                .collect(),
            top_clients: Self::top_clients(&data.rentals)?,
            delays: Self::delay_analysis(&delays, data.rentals.height()),
            ratings: rating_counts,
            high_rating_percent,
            payments: Self::payments(&data.rentals)?,
            duration_price: Self::duration_price(&data.rentals, &delays)?,
            fleet: Self::fleet_rows(&data.vehicles)?,
            recent_rentals: Self::recent_rentals(&data.rentals, &delays, &ratings)?,
        })
    }

    fn kpis(data: &FilteredData, ratings: &[Option<f64>]) -> PolarsResult<KpiSummary> {
        let rentals = &data.rentals;
        let total_rentals = rentals.height();

        let prices = f64_values(rentals, "total_price")?;
        let total_revenue: f64 = prices.iter().flatten().sum();
        let avg_rental_price = mean_or_zero(prices.iter().flatten().copied());

        // rental duration recomputed from the date pair
        let starts = date_values(rentals, "start_date")?;
        let ends = date_values(rentals, "end_date")?;
        let durations: Vec<i64> = starts
            .iter()
            .zip(&ends)
            .filter_map(|(s, e)| match (s, e) {
                (Some(s), Some(e)) => Some((*e - *s).num_days()),
                _ => None,
            })
            .collect();
        let avg_rental_days = mean_or_zero(durations.iter().map(|d| *d as f64));

        let avg_rating = mean_or_zero(ratings.iter().flatten().copied());

        let statuses = str_values_or_empty(&data.vehicles, "status", data.vehicles.height())?;
        let count_status = |wanted: &str| {
            statuses
                .iter()
                .flatten()
                .filter(|s| s.as_str() == wanted)
                .count()
        };

        Ok(KpiSummary {
            total_rentals,
            total_revenue,
            avg_rental_price,
            avg_rental_days,
            avg_rating,
            available_vehicles: count_status("Available"),
            rented_vehicles: count_status("Rented"),
            maintenance_vehicles: count_status("Under Maintenance"),
        })
    }

    /// Rentals and revenue per month label, chronologically ordered via the
    /// full-month calendar spanning the filtered date extent.
    fn monthly(rentals: &DataFrame) -> PolarsResult<Vec<MonthlyPoint>> {
        let labels = str_values(rentals, "month_label")?;
        let prices = f64_values(rentals, "total_price")?;
        let starts = date_values(rentals, "start_date")?;

        let mut by_label: BTreeMap<String, (u32, f64)> = BTreeMap::new();
        for (label, price) in labels.iter().zip(&prices) {
            if let Some(label) = label {
                let entry = by_label.entry(label.clone()).or_default();
                entry.0 += 1;
                entry.1 += price.unwrap_or(0.0);
            }
        }

        let dates: Vec<NaiveDate> = starts.into_iter().flatten().collect();
        let (min, max) = match (dates.iter().min(), dates.iter().max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => return Ok(Vec::new()),
        };

        Ok(month_calendar(min, max)
            .into_iter()
            .filter_map(|label| {
                by_label.get(&label).map(|(rentals, revenue)| MonthlyPoint {
                    label: label.clone(),
                    rentals: *rentals,
                    revenue: *revenue,
                })
            })
            .collect())
    }

    fn categories(merged: &DataFrame) -> PolarsResult<Vec<CategorySummary>> {
        let groups = Self::group_performance(merged, "category")?;
        Ok(groups
            .into_iter()
            .map(|(category, acc)| CategorySummary {
                category,
                rentals: acc.count,
                revenue: acc.revenue,
                avg_rating: acc.avg_rating(),
            })
            .collect())
    }

    /// Top brands by rental count.
    fn brands(merged: &DataFrame) -> PolarsResult<Vec<BrandSummary>> {
        let groups = Self::group_performance(merged, "brand")?;
        let mut brands: Vec<BrandSummary> = groups
            .into_iter()
            .map(|(brand, acc)| BrandSummary {
                brand,
                rentals: acc.count,
                revenue: acc.revenue,
                avg_rating: acc.avg_rating(),
            })
            .collect();
        brands.sort_by(|a, b| b.rentals.cmp(&a.rentals).then(a.brand.cmp(&b.brand)));
        brands.truncate(TOP_N);
        Ok(brands)
    }

    /// Count, revenue and rating sums per non-null group value.
    fn group_performance(
        merged: &DataFrame,
        group_column: &str,
    ) -> PolarsResult<BTreeMap<String, GroupAcc>> {
        if !has_column(merged, group_column) {
            return Ok(BTreeMap::new());
        }
        let groups = str_values(merged, group_column)?;
        let prices = f64_values(merged, "total_price")?;
        let ratings = f64_values(merged, "customer_rating")?;

        let mut by_group: BTreeMap<String, GroupAcc> = BTreeMap::new();
        for ((group, price), rating) in groups.iter().zip(&prices).zip(&ratings) {
            let Some(group) = group else { continue };
            let acc = by_group.entry(group.clone()).or_default();
            acc.count += 1;
            acc.revenue += price.unwrap_or(0.0);
            if let Some(rating) = rating {
                acc.rating_sum += rating;
                acc.rated += 1;
            }
        }
        Ok(by_group)
    }

    fn status_distribution(vehicles: &DataFrame) -> PolarsResult<Vec<StatusCount>> {
        let statuses = str_values_or_empty(vehicles, "status", vehicles.height())?;
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for status in statuses.into_iter().flatten() {
            *counts.entry(status).or_default() += 1;
        }
        let mut distribution: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        distribution.sort_by(|a, b| b.count.cmp(&a.count).then(a.status.cmp(&b.status)));
        Ok(distribution)
    }

    fn top_clients(rentals: &DataFrame) -> PolarsResult<Vec<ClientCount>> {
        let clients = str_values_or_empty(rentals, "client_name", rentals.height())?;
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for client in clients.into_iter().flatten() {
            *counts.entry(client).or_default() += 1;
        }
        let mut ranked: Vec<ClientCount> = counts
            .into_iter()
            .map(|(client, rentals)| ClientCount { client, rentals })
            .collect();
        ranked.sort_by(|a, b| b.rentals.cmp(&a.rentals).then(a.client.cmp(&b.client)));
        ranked.truncate(TOP_N);
        Ok(ranked)
    }

    /// Null delays (e.g. rentals that never completed) are excluded from
    /// the distribution and the average; the percentage is over all
    /// filtered rentals.
    fn delay_analysis(delays: &[Option<i64>], total_rentals: usize) -> DelayAnalysis {
        let recorded: Vec<i64> = delays.iter().flatten().copied().collect();
        let mut distribution: BTreeMap<i64, u32> = BTreeMap::new();
        for delay in &recorded {
            *distribution.entry(*delay).or_default() += 1;
        }

        let delayed = recorded.iter().filter(|d| **d > 0).count() as u32;
        let on_time = recorded.iter().filter(|d| **d == 0).count() as u32;
        let percent_delayed = if total_rentals > 0 {
            delayed as f64 / total_rentals as f64 * 100.0
        } else {
            0.0
        };

        DelayAnalysis {
            distribution: distribution.into_iter().collect(),
            avg_delay: mean_or_zero(recorded.iter().map(|d| *d as f64)),
            delayed,
            on_time,
            percent_delayed,
        }
    }

    /// Distribution of recorded ratings plus the share of 4+ ratings.
    fn rating_distribution(ratings: &[Option<f64>]) -> (Vec<RatingCount>, f64) {
        let recorded: Vec<f64> = ratings.iter().flatten().copied().collect();
        let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
        for rating in &recorded {
            *counts.entry((rating * 10.0).round() as i64).or_default() += 1;
        }
        let distribution = counts
            .into_iter()
            .map(|(key, count)| RatingCount {
                rating: key as f64 / 10.0,
                count,
            })
            .collect();

        let high = recorded.iter().filter(|r| **r >= 4.0).count();
        let high_percent = if recorded.is_empty() {
            0.0
        } else {
            high as f64 / recorded.len() as f64 * 100.0
        };
        (distribution, high_percent)
    }

    /// Revenue and rental count per payment method, highest revenue first.
    fn payments(rentals: &DataFrame) -> PolarsResult<Vec<PaymentSummary>> {
        if !has_column(rentals, "payment_method") {
            return Ok(Vec::new());
        }
        let methods = str_values(rentals, "payment_method")?;
        let prices = f64_values(rentals, "total_price")?;

        let mut by_method: BTreeMap<String, (f64, u32)> = BTreeMap::new();
        for (method, price) in methods.iter().zip(&prices) {
            let Some(method) = method else { continue };
            if method.is_empty() {
                continue;
            }
            let entry = by_method.entry(method.clone()).or_default();
            entry.0 += price.unwrap_or(0.0);
            entry.1 += 1;
        }
        let mut summaries: Vec<PaymentSummary> = by_method
            .into_iter()
            .map(|(method, (revenue, rentals))| PaymentSummary {
                method,
                revenue,
                rentals,
            })
            .collect();
        summaries.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then(a.method.cmp(&b.method)));
        Ok(summaries)
    }

    /// Scatter of rental duration against price; rows without a positive
    /// duration are dropped.
    fn duration_price(
        rentals: &DataFrame,
        delays: &[Option<i64>],
    ) -> PolarsResult<Vec<DurationPricePoint>> {
        let starts = date_values(rentals, "start_date")?;
        let ends = date_values(rentals, "end_date")?;
        let prices = f64_values(rentals, "total_price")?;

        let mut points = Vec::new();
        for i in 0..rentals.height() {
            let (Some(start), Some(end)) = (starts[i], ends[i]) else {
                continue;
            };
            let Some(price) = prices[i] else { continue };
            let days = (end - start).num_days();
            if days <= 0 {
                continue;
            }
            points.push(DurationPricePoint {
                days: days as f64,
                price,
                delay: delays.get(i).copied().flatten().unwrap_or(0) as f64,
            });
        }
        Ok(points)
    }

    fn fleet_rows(vehicles: &DataFrame) -> PolarsResult<Vec<FleetRow>> {
        let n = vehicles.height();
        let ids = str_values(vehicles, "vehicle_id")?;
        let brands = str_values_or_empty(vehicles, "brand", n)?;
        let models = str_values_or_empty(vehicles, "model", n)?;
        let years = str_values_or_empty(vehicles, "year", n)?;
        let categories = str_values_or_empty(vehicles, "category", n)?;
        let fuels = str_values_or_empty(vehicles, "fuel_type", n)?;
        let colors = str_values_or_empty(vehicles, "color", n)?;
        let rates = str_values_or_empty(vehicles, "daily_rate", n)?;
        let statuses = str_values_or_empty(vehicles, "status", n)?;

        let display = |v: &Option<String>| v.clone().unwrap_or_default();
        Ok((0..n)
            .map(|i| FleetRow {
                vehicle_id: display(&ids[i]),
                brand: display(&brands[i]),
                model: display(&models[i]),
                year: display(&years[i]),
                category: display(&categories[i]),
                fuel_type: display(&fuels[i]),
                color: display(&colors[i]),
                daily_rate: display(&rates[i]),
                status: display(&statuses[i]),
            })
            .collect())
    }

    /// Latest rentals by start date, newest first.
    fn recent_rentals(
        rentals: &DataFrame,
        delays: &[Option<i64>],
        ratings: &[Option<f64>],
    ) -> PolarsResult<Vec<RecentRental>> {
        let n = rentals.height();
        let ids = str_values_or_empty(rentals, "rental_id", n)?;
        let vehicle_ids = str_values(rentals, "vehicle_id")?;
        let clients = str_values_or_empty(rentals, "client_name", n)?;
        let starts = date_values(rentals, "start_date")?;
        let ends = date_values(rentals, "end_date")?;
        let days = i64_values(rentals, "rental_days")?;
        let prices = f64_values(rentals, "total_price")?;
        let statuses = str_values_or_empty(rentals, "status", n)?;

        let mut rows: Vec<RecentRental> = (0..n)
            .map(|i| RecentRental {
                rental_id: ids[i].clone().unwrap_or_default(),
                vehicle_id: vehicle_ids[i].clone().unwrap_or_default(),
                client: clients[i].clone().unwrap_or_default(),
                start_date: starts[i],
                end_date: ends[i],
                days: days.get(i).copied().flatten(),
                price: prices[i],
                status: statuses[i].clone().unwrap_or_default(),
                delay: delays.get(i).copied().flatten(),
                rating: ratings.get(i).copied().flatten(),
            })
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        rows.truncate(RECENT_LIMIT);
        Ok(rows)
    }
}

#[derive(Default)]
struct GroupAcc {
    count: u32,
    revenue: f64,
    rating_sum: f64,
    rated: u32,
}

impl GroupAcc {
    fn avg_rating(&self) -> f64 {
        if self.rated > 0 {
            self.rating_sum / self.rated as f64
        } else {
            0.0
        }
    }
}

fn mean_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n > 0 {
        sum / n as f64
    } else {
        0.0
    }
}

fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let ca = column.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Like [`str_values`], but a missing column yields all-empty cells.
fn str_values_or_empty(df: &DataFrame, name: &str, len: usize) -> PolarsResult<Vec<Option<String>>> {
    if has_column(df, name) {
        str_values(df, name)
    } else {
        Ok(vec![None; len])
    }
}

fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok(ca.into_iter().collect())
}

fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let column = df.column(name)?.cast(&DataType::Int64)?;
    let ca = column.i64()?;
    Ok(ca.into_iter().collect())
}

fn date_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    let column = df.column(name)?.cast(&DataType::Int32)?;
    let ca = column.i32()?;
    Ok(ca.into_iter().map(|v| v.map(date_from_days)).collect())
}
