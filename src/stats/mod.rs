//! Stats module - dashboard aggregations and KPIs

pub mod calculator;

pub use calculator::{
    month_calendar, timeliness, BrandSummary, CategorySummary, ClientCount, DashboardSummary,
    DelayAnalysis, DurationPricePoint, FleetRow, KpiSummary, MonthlyPoint, PaymentSummary,
    RatingCount, RecentRental, StatsCalculator, StatusCount,
};
