use std::path::Path;

use eframe::egui;

use crate::map::WorldMap;
use crate::state::AppState;
use crate::ui::{panels, plot};

/// Dataset loaded at startup when present; otherwise File → Open.
pub const DEFAULT_DATA_PATH: &str = "data/batik_exports.csv";
/// Optional world-country outlines for the choropleth maps.
pub const DEFAULT_MAP_PATH: &str = "assets/world-countries.geojson";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BatikDashApp {
    pub state: AppState,
}

impl BatikDashApp {
    /// Build the app, trying the default dataset and map assets.
    pub fn startup() -> Self {
        let mut state = AppState::default();

        match WorldMap::load(Path::new(DEFAULT_MAP_PATH)) {
            Ok(map) => {
                log::info!("Loaded world map with {} countries", map.feature_count());
                state.world_map = Some(map);
            }
            Err(e) => log::warn!("World map unavailable: {e:#}"),
        }

        let data_path = Path::new(DEFAULT_DATA_PATH);
        if data_path.exists() {
            panels::load_path(&mut state, data_path);
        } else {
            state.status_message = Some(format!(
                "Place a dataset at {DEFAULT_DATA_PATH} or use File → Open…"
            ));
        }

        Self { state }
    }
}

impl eframe::App for BatikDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, maps and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::dashboard(ui, &self.state);
        });
    }
}
