//! Dashboard View
//! Central scrollable panel with KPI tiles, charts, and the detail tables.

use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::stats::{timeliness, DashboardSummary};

const ACCENT_BLUE: Color32 = Color32::from_rgb(59, 130, 246);
const ACCENT_GREEN: Color32 = Color32::from_rgb(16, 185, 129);
const ACCENT_AMBER: Color32 = Color32::from_rgb(243, 156, 18);
const ACCENT_RED: Color32 = Color32::from_rgb(239, 68, 68);
const ACCENT_TEAL: Color32 = Color32::from_rgb(26, 188, 156);
const ACCENT_PURPLE: Color32 = Color32::from_rgb(155, 89, 182);

const CHART_HEIGHT: f32 = 260.0;

/// Central dashboard area rendering one [`DashboardSummary`].
pub struct DashboardView;

impl DashboardView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        ScrollArea::vertical().show(ui, |ui| {
            self.kpi_section(ui, summary);
            ui.add_space(12.0);
            self.trends_section(ui, summary);
            ui.add_space(12.0);
            self.vehicle_section(ui, summary);
            ui.add_space(12.0);
            self.client_section(ui, summary);
            ui.add_space(12.0);
            self.advanced_section(ui, summary);
            ui.add_space(12.0);
            self.tables_section(ui, summary);
            ui.add_space(20.0);
        });
    }

    fn section_header(&self, ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(17.0).strong());
        ui.add_space(6.0);
    }

    fn kpi_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "📊 Key Performance Indicators");
        let kpis = &summary.kpis;

        ui.columns(4, |cols| {
            kpi_tile(&mut cols[0], &format!("{}", kpis.total_rentals), "Total Rentals", ACCENT_BLUE);
            kpi_tile(
                &mut cols[1],
                &format!("{:.2} MAD", kpis.total_revenue),
                "Total Revenue",
                ACCENT_GREEN,
            );
            kpi_tile(
                &mut cols[2],
                &format!("{:.2} MAD", kpis.avg_rental_price),
                "Avg. Rental Price",
                ACCENT_TEAL,
            );
            kpi_tile(
                &mut cols[3],
                &format!("{:.1} ⭐", kpis.avg_rating),
                "Avg. Customer Rating",
                ACCENT_AMBER,
            );
        });
        ui.add_space(6.0);
        ui.columns(3, |cols| {
            kpi_tile(
                &mut cols[0],
                &format!("{}", kpis.available_vehicles),
                "Available Vehicles",
                ACCENT_GREEN,
            );
            kpi_tile(
                &mut cols[1],
                &format!("{}", kpis.rented_vehicles),
                "Rented Vehicles",
                ACCENT_BLUE,
            );
            kpi_tile(
                &mut cols[2],
                &format!("{}", kpis.maintenance_vehicles),
                "Under Maintenance",
                ACCENT_RED,
            );
        });
    }

    fn trends_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "📈 Rental Trends");

        let labels: Vec<String> = summary.monthly.iter().map(|m| m.label.clone()).collect();
        let rental_points: Vec<[f64; 2]> = summary
            .monthly
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, m.rentals as f64])
            .collect();
        let revenue_points: Vec<[f64; 2]> = summary
            .monthly
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, m.revenue])
            .collect();

        ui.columns(2, |cols| {
            month_line_chart(
                &mut cols[0],
                "monthly_rentals",
                "Number of Rentals",
                labels.clone(),
                rental_points,
                ACCENT_BLUE,
                "Rentals",
            );
            month_line_chart(
                &mut cols[1],
                "monthly_revenue",
                "Revenue (MAD)",
                labels,
                revenue_points,
                ACCENT_GREEN,
                "Revenue",
            );
        });
    }

    fn vehicle_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "🚙 Vehicle Performance");

        ui.columns(2, |cols| {
            let categories: Vec<String> =
                summary.categories.iter().map(|c| c.category.clone()).collect();
            let counts: Vec<f64> = summary.categories.iter().map(|c| c.rentals as f64).collect();
            labeled_bar_chart(
                &mut cols[0],
                "category_rentals",
                "Rentals by Vehicle Category",
                categories,
                counts,
                ACCENT_BLUE,
            );

            let brands: Vec<String> = summary.brands.iter().map(|b| b.brand.clone()).collect();
            let counts: Vec<f64> = summary.brands.iter().map(|b| b.rentals as f64).collect();
            labeled_bar_chart(
                &mut cols[1],
                "brand_rentals",
                "Top Brands by Rental Count",
                brands,
                counts,
                ACCENT_GREEN,
            );
        });

        ui.add_space(8.0);
        ui.columns(2, |cols| {
            let statuses: Vec<String> = summary
                .status_distribution
                .iter()
                .map(|s| s.status.clone())
                .collect();
            let counts: Vec<f64> = summary
                .status_distribution
                .iter()
                .map(|s| s.count as f64)
                .collect();
            labeled_bar_chart(
                &mut cols[0],
                "status_distribution",
                "Vehicle Status Distribution",
                statuses,
                counts,
                ACCENT_TEAL,
            );

            let (bins, counts) = histogram(&summary.condition_scores, 1.0, 5.0, 8);
            labeled_bar_chart(
                &mut cols[1],
                "condition_scores",
                "Condition Score Distribution",
                bins,
                counts,
                ACCENT_PURPLE,
            );
        });
    }

    fn client_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "👥 Client Insights");

        ui.columns(2, |cols| {
            let clients: Vec<String> =
                summary.top_clients.iter().map(|c| c.client.clone()).collect();
            let counts: Vec<f64> = summary.top_clients.iter().map(|c| c.rentals as f64).collect();
            labeled_bar_chart(
                &mut cols[0],
                "top_clients",
                "Top Clients by Rental Frequency",
                clients,
                counts,
                ACCENT_BLUE,
            );

            let ratings: Vec<String> = summary
                .ratings
                .iter()
                .map(|r| format!("{:.1}", r.rating))
                .collect();
            let counts: Vec<f64> = summary.ratings.iter().map(|r| r.count as f64).collect();
            labeled_bar_chart(
                &mut cols[1],
                "rating_distribution",
                "Customer Rating Distribution",
                ratings,
                counts,
                ACCENT_AMBER,
            );
        });
        ui.label(
            RichText::new(format!(
                "Percentage of 4+ star ratings: {:.2}%",
                summary.high_rating_percent
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );

        ui.add_space(8.0);
        let delays = &summary.delays;
        ui.columns(2, |cols| {
            let days: Vec<String> = delays
                .distribution
                .iter()
                .map(|(day, _)| format!("{} d", day))
                .collect();
            let counts: Vec<f64> = delays.distribution.iter().map(|(_, n)| *n as f64).collect();
            labeled_bar_chart(
                &mut cols[0],
                "delay_distribution",
                "Return Delay Distribution",
                days,
                counts,
                ACCENT_RED,
            );

            let timely: Vec<String> = vec![timeliness(0).to_string(), timeliness(1).to_string()];
            let counts: Vec<f64> = vec![delays.on_time as f64, delays.delayed as f64];
            labeled_bar_chart(
                &mut cols[1],
                "return_timeliness",
                "Rental Return Timeliness",
                timely,
                counts,
                ACCENT_GREEN,
            );
        });
        ui.label(
            RichText::new(format!(
                "Average return delay: {:.2} days, {} delayed ({:.1}%)",
                delays.avg_delay, delays.delayed, delays.percent_delayed
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );
    }

    fn advanced_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "🔍 Advanced Analytics");

        ui.columns(2, |cols| {
            let on_time: Vec<[f64; 2]> = summary
                .duration_price
                .iter()
                .filter(|p| p.delay <= 0.0)
                .map(|p| [p.days, p.price])
                .collect();
            let delayed: Vec<[f64; 2]> = summary
                .duration_price
                .iter()
                .filter(|p| p.delay > 0.0)
                .map(|p| [p.days, p.price])
                .collect();

            Plot::new("duration_vs_price")
                .height(CHART_HEIGHT)
                .allow_scroll(false)
                .legend(Legend::default())
                .x_axis_label("Rental Duration (days)")
                .y_axis_label("Total Price (MAD)")
                .show(&mut cols[0], |plot_ui| {
                    plot_ui.points(
                        Points::new(on_time)
                            .radius(3.0)
                            .color(ACCENT_GREEN)
                            .name(timeliness(0)),
                    );
                    plot_ui.points(
                        Points::new(delayed)
                            .radius(3.0)
                            .color(ACCENT_RED)
                            .name(timeliness(1)),
                    );
                });

            let methods: Vec<String> = summary.payments.iter().map(|p| p.method.clone()).collect();
            let revenue: Vec<f64> = summary.payments.iter().map(|p| p.revenue).collect();
            labeled_bar_chart(
                &mut cols[1],
                "payment_revenue",
                "Revenue by Payment Method",
                methods,
                revenue,
                ACCENT_PURPLE,
            );
        });
    }

    fn tables_section(&self, ui: &mut egui::Ui, summary: &DashboardSummary) {
        self.section_header(ui, "📝 Details");

        egui::CollapsingHeader::new("Vehicle Fleet Details")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("fleet_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for header in [
                            "ID", "Brand", "Model", "Year", "Category", "Fuel", "Color",
                            "Daily Rate", "Status",
                        ] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();
                        for row in &summary.fleet {
                            ui.label(&row.vehicle_id);
                            ui.label(&row.brand);
                            ui.label(&row.model);
                            ui.label(&row.year);
                            ui.label(&row.category);
                            ui.label(&row.fuel_type);
                            ui.label(&row.color);
                            ui.label(&row.daily_rate);
                            ui.label(&row.status);
                            ui.end_row();
                        }
                    });
            });

        egui::CollapsingHeader::new("Recent Rentals")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("recent_rentals_table")
                    .striped(true)
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        for header in [
                            "ID", "Vehicle", "Client", "Start", "End", "Days", "Price",
                            "Status", "Delay", "Rating",
                        ] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();
                        for row in &summary.recent_rentals {
                            ui.label(&row.rental_id);
                            ui.label(&row.vehicle_id);
                            ui.label(&row.client);
                            ui.label(format_date(row.start_date));
                            ui.label(format_date(row.end_date));
                            ui.label(row.days.map(|d| d.to_string()).unwrap_or_default());
                            ui.label(
                                row.price.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                            );
                            ui.label(&row.status);
                            ui.label(row.delay.map(|d| d.to_string()).unwrap_or_default());
                            ui.label(
                                row.rating.map(|r| format!("{:.1}", r)).unwrap_or_default(),
                            );
                            ui.end_row();
                        }
                    });
            });
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn kpi_tile(ui: &mut egui::Ui, value: &str, label: &str, accent: Color32) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(6.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(value).size(20.0).strong().color(accent));
                ui.label(RichText::new(label).size(11.0).color(Color32::GRAY));
            });
        });
}

/// Line chart whose x axis shows month labels at integer positions.
#[allow(clippy::too_many_arguments)]
fn month_line_chart(
    ui: &mut egui::Ui,
    id: &str,
    y_label: &str,
    labels: Vec<String>,
    points: Vec<[f64; 2]>,
    color: Color32,
    series_name: &str,
) {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(points))
                    .color(color)
                    .name(series_name),
            );
        });
}

/// Vertical bar chart with one category per integer x position.
fn labeled_bar_chart(
    ui: &mut egui::Ui,
    id: &str,
    title: &str,
    labels: Vec<String>,
    values: Vec<f64>,
    color: Color32,
) {
    ui.vertical(|ui| {
        ui.label(RichText::new(title).size(13.0).strong());
        let bars: Vec<Bar> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Bar::new(i as f64, *v).width(0.6))
            .collect();
        Plot::new(id.to_string())
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round() as usize;
                if (mark.value - idx as f64).abs() < 1e-6 && idx < labels.len() {
                    labels[idx].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color));
            });
    });
}

/// Fixed-range histogram bins with `%.1f` labels.
fn histogram(values: &[f64], min: f64, max: f64, bins: usize) -> (Vec<String>, Vec<f64>) {
    if bins == 0 || max <= min {
        return (Vec::new(), Vec::new());
    }
    let width = (max - min) / bins as f64;
    let mut counts = vec![0f64; bins];
    for v in values {
        if *v < min || *v > max {
            continue;
        }
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    let labels = (0..bins)
        .map(|i| format!("{:.1}", min + width * (i as f64 + 0.5)))
        .collect();
    (labels, counts)
}
