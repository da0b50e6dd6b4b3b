use std::collections::HashMap;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::color::{ColorScale, MAP_NO_DATA};
use crate::data::model::ExportField;
use crate::map::WorldMap;
use crate::view::ChoroplethEntry;

use super::plot::group_thousands;

// ---------------------------------------------------------------------------
// Choropleth world map
// ---------------------------------------------------------------------------

/// Render a world map with each destination country filled by its share of
/// the maximum total. Countries without data keep a neutral fill.
pub fn world_chart(
    ui: &mut Ui,
    id: &str,
    world: Option<&WorldMap>,
    entries: &[ChoroplethEntry],
    scale: &ColorScale,
    field: ExportField,
) {
    let Some(world) = world else {
        ui.label(
            RichText::new(
                "World map asset not found (assets/world-countries.geojson) – geographic views are disabled.",
            )
            .italics(),
        );
        return;
    };
    if entries.is_empty() {
        ui.label("No complete rows in the selected range.");
        return;
    }

    let by_iso3: HashMap<&str, &ChoroplethEntry> =
        entries.iter().map(|e| (e.iso3.as_str(), e)).collect();
    let max = entries.iter().map(|e| e.value).fold(0.0_f64, f64::max);

    Plot::new(id)
        .height(340.0)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .include_x(world.x_bounds()[0])
        .include_x(world.x_bounds()[1])
        .include_y(world.y_bounds()[0])
        .include_y(world.y_bounds()[1])
        .show(ui, |plot_ui| {
            let outline = Stroke::new(0.4, Color32::from_gray(90));
            for (iso3, geometry) in world.items() {
                let entry = by_iso3.get(iso3.as_str()).copied();
                let fill = match entry {
                    Some(e) if max > 0.0 => scale.sample(e.value / max),
                    Some(_) => scale.sample(0.0),
                    None => MAP_NO_DATA,
                };
                let label = entry.map(|e| {
                    format!("{} – {} {}", e.country, group_thousands(e.value), field.label())
                });

                for poly in &geometry.0 {
                    let ring: PlotPoints = poly
                        .exterior()
                        .0
                        .iter()
                        .map(|coord| [coord.x, coord.y])
                        .collect();
                    let mut shape = Polygon::new(ring).fill_color(fill).stroke(outline);
                    if let Some(label) = &label {
                        shape = shape.name(label);
                    }
                    plot_ui.polygon(shape);
                }
            }
        });
}
