use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::model::YearRange;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(120.0)
                .corner_radius(egui::CornerRadius::same(4)),
        );
    });
    ui.add_space(4.0);

    ui.heading("Filters");
    ui.separator();

    let Some(domain) = state.dataset.as_ref().map(|ds| ds.year_span) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Year range sliders ----
    ui.strong("Year range");
    let mut from = state.year_range.min;
    let mut to = state.year_range.max;
    let changed = ui
        .add(egui::Slider::new(&mut from, domain.min..=domain.max).text("From"))
        .changed()
        | ui.add(egui::Slider::new(&mut to, domain.min..=domain.max).text("To"))
            .changed();
    if changed {
        state.set_year_range(YearRange::new(from, to));
    }

    ui.separator();

    if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
        ui.label(format!("{} rows loaded ({})", ds.len(), ds.year_span));
        ui.label(format!(
            "{} rows in {}",
            view.filtered_records, view.year_range
        ));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} export rows, {}", ds.len(), ds.year_span));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open export dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

/// Load a dataset file into the app state, surfacing failures in the status
/// line rather than falling back to an empty table.
pub fn load_path(state: &mut AppState, path: &Path) {
    state.loading = true;
    match crate::data::loader::load_file(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} export rows spanning {} from {}",
                dataset.len(),
                dataset.year_span,
                path.display()
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
            state.loading = false;
        }
    }
}
