use crate::data::model::{ExportDataset, YearRange};
use crate::map::WorldMap;
use crate::view::{build_view, ViewModel};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<ExportDataset>,

    /// Year range currently selected in the sidebar.
    pub year_range: YearRange,

    /// Derived tables for the current selection (cached between frames,
    /// rebuilt on every interaction).
    pub view: Option<ViewModel>,

    /// World country outlines for the choropleth maps, when the asset exists.
    pub world_map: Option<WorldMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            year_range: YearRange::default(),
            view: None,
            world_map: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: select its full year span and build
    /// the first view.
    pub fn set_dataset(&mut self, dataset: ExportDataset) {
        self.year_range = dataset.year_span;
        self.view = Some(build_view(&dataset, self.year_range));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Change the selected year range and rebuild the view. Bounds are
    /// clamped into the dataset's span; no-op until a dataset is loaded.
    pub fn set_year_range(&mut self, range: YearRange) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let range = range.clamp_to(dataset.year_span);
        if range != self.year_range {
            self.year_range = range;
            self.view = Some(build_view(dataset, range));
        }
    }

    /// Recompute the view from the current dataset and selection.
    pub fn rebuild_view(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.view = Some(build_view(dataset, self.year_range));
        }
    }
}
