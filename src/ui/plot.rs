use eframe::egui::{RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::{ColorScale, SERIES_BROWN, SERIES_LIGHT_BROWN};
use crate::data::aggregate::CountryTotal;
use crate::data::model::ExportField;
use crate::state::AppState;
use crate::view::{Metrics, TrendPoint};

// ---------------------------------------------------------------------------
// Central panel – the dashboard column
// ---------------------------------------------------------------------------

/// Render the full dashboard column in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to view export statistics  (File → Open…)");
        });
        return;
    };

    let scale = ColorScale::batik_brown();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Indonesian Batik Export Analysis");
            ui.add_space(8.0);

            metric_cards(ui, &view.metrics);
            ui.add_space(12.0);

            section(ui, "Export Destination Countries by Value");
            super::choropleth::world_chart(
                ui,
                "map_value",
                state.world_map.as_ref(),
                &view.value_by_country,
                &scale,
                ExportField::Value,
            );

            section(ui, "Top 10 Countries by Export Value");
            ranked_bar_chart(ui, "top_value", &view.top_value, ExportField::Value);

            section(ui, "Export Destination Countries by Weight");
            super::choropleth::world_chart(
                ui,
                "map_weight",
                state.world_map.as_ref(),
                &view.weight_by_country,
                &scale,
                ExportField::Weight,
            );

            section(ui, "Top 10 Countries by Export Weight");
            ranked_bar_chart(ui, "top_weight", &view.top_weight, ExportField::Weight);

            section(ui, "Total Export Weight per Year");
            trend_chart(ui, "annual_weight", &view.annual_weight, ExportField::Weight);

            section(ui, "Total Export Value per Year");
            trend_chart(ui, "annual_value", &view.annual_value, ExportField::Value);

            section(ui, "Weight vs Value per Year");
            comparison_chart(ui, "annual_comparison", &view.annual_weight, &view.annual_value);

            ui.add_space(16.0);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(title);
    ui.separator();
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_cards(ui: &mut Ui, metrics: &Metrics) {
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(
            &mut cols[0],
            "Total Destination Countries",
            metrics.destination_countries.to_string(),
        );
        metric_card(
            &mut cols[1],
            "Total Export Value (USD)",
            format!("${}", group_thousands(metrics.total_value_usd)),
        );
        metric_card(
            &mut cols[2],
            "Total Export Weight (Kg)",
            format!("{} Kg", group_thousands(metrics.total_weight_kg)),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(label);
            ui.label(RichText::new(value).heading().color(SERIES_BROWN));
        });
    });
}

// ---------------------------------------------------------------------------
// Ranked horizontal bars (top-10 charts)
// ---------------------------------------------------------------------------

fn ranked_bar_chart(ui: &mut Ui, id: &str, ranked: &[CountryTotal], field: ExportField) {
    if ranked.is_empty() {
        ui.label("No complete rows in the selected range.");
        return;
    }

    // Rank 0 at the top: bar i sits at y = n-1-i.
    let n = ranked.len();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new((n - 1 - i) as f64, t.total)
                .width(0.6)
                .name(&t.country)
        })
        .collect();
    let labels: Vec<String> = ranked.iter().map(|t| t.country.clone()).collect();

    Plot::new(id)
        .height(280.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .y_axis_formatter(move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            match labels.len().checked_sub(1 + rounded as usize) {
                Some(i) => labels[i].clone(),
                None => String::new(),
            }
        })
        .x_axis_formatter(|mark, _range| compact_amount(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(SERIES_BROWN)
                    .name(field.label()),
            );
        });
}

// ---------------------------------------------------------------------------
// Annual trend lines
// ---------------------------------------------------------------------------

fn trend_chart(ui: &mut Ui, id: &str, points: &[TrendPoint], field: ExportField) {
    let series: PlotPoints = points
        .iter()
        .map(|p| [p.year as f64, p.value])
        .collect();

    Plot::new(id)
        .height(220.0)
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| year_tick(mark.value))
        .y_axis_formatter(|mark, _range| compact_amount(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(series)
                    .color(SERIES_BROWN)
                    .width(2.0)
                    .name(field.label()),
            );
        });
}

// ---------------------------------------------------------------------------
// Annual weight vs value comparison (grouped bars)
// ---------------------------------------------------------------------------

fn comparison_chart(ui: &mut Ui, id: &str, weight: &[TrendPoint], value: &[TrendPoint]) {
    let weight_bars: Vec<Bar> = weight
        .iter()
        .map(|p| Bar::new(p.year as f64 - 0.2, p.value).width(0.35))
        .collect();
    let value_bars: Vec<Bar> = value
        .iter()
        .map(|p| Bar::new(p.year as f64 + 0.2, p.value).width(0.35))
        .collect();

    Plot::new(id)
        .height(260.0)
        .legend(Legend::default())
        .allow_scroll(false)
        .x_axis_formatter(|mark, _range| year_tick(mark.value))
        .y_axis_formatter(|mark, _range| compact_amount(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(weight_bars)
                    .color(SERIES_LIGHT_BROWN)
                    .name(ExportField::Weight.label()),
            );
            plot_ui.bar_chart(
                BarChart::new(value_bars)
                    .color(SERIES_BROWN)
                    .name(ExportField::Value.label()),
            );
        });
}

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// `1234567.8` → `"1,234,567.80"`.
pub fn group_thousands(v: f64) -> String {
    let formatted = format!("{v:.2}");
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let (sign, digits) = int_part.strip_prefix('-').map_or(("", int_part), |d| ("-", d));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}.{frac_part}")
}

/// Compact axis label: `1.2B`, `3.4M`, `56K`, `789`.
fn compact_amount(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

/// Year axis label: whole years only, no grouping separators.
fn year_tick(v: f64) -> String {
    let rounded = v.round();
    if (v - rounded).abs() < 1e-6 {
        format!("{rounded:.0}")
    } else {
        String::new()
    }
}
