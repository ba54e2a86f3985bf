use crate::color::ColorMap;
use crate::data::error::EncodeError;
use crate::data::export::{self, ExportFormat};
use crate::data::filter::filter;
use crate::data::model::{Category, Dataset, FilterSelection, FilteredTable};
use crate::data::reshape::ChartKind;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. The dataset is loaded once
/// and only ever read; everything derived from it (the filtered table) is
/// recomputed on selection changes.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// The user's active selection.
    pub selection: FilterSelection,

    /// Rows passing the current selection (cached per render cycle).
    pub filtered: FilteredTable,

    /// Active chart type for the central panel.
    pub chart_kind: ChartKind,

    /// Export format chosen in the side panel.
    pub export_format: ExportFormat,

    /// Per-indicator colours for the active category.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection {
                year_start: 0,
                year_end: 0,
                category: Category::Asset,
                indicators: Default::default(),
            },
            filtered: FilteredTable::default(),
            chart_kind: ChartKind::Line,
            export_format: ExportFormat::Csv,
            color_map: ColorMap::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: select the full year range and every
    /// indicator of the default category, then filter.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let (min_year, max_year) = dataset.year_bounds;
        self.selection = FilterSelection {
            year_start: min_year,
            year_end: max_year,
            category: Category::Asset,
            indicators: dataset.indicators_for(Category::Asset),
        };
        self.color_map = ColorMap::new(&self.selection.indicators);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered table after a selection change.
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.filtered = FilteredTable::default();
            return;
        };
        match filter(dataset, &self.selection) {
            Ok(table) => self.filtered = table,
            Err(e) => {
                // The panel widgets only offer valid selections, so this is
                // a programming error worth surfacing loudly.
                log::error!("filter rejected UI selection: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.filtered = FilteredTable::default();
            }
        }
    }

    /// Switch balance-sheet side; the indicator set resets to that side's
    /// full enumeration.
    pub fn set_category(&mut self, category: Category) {
        if self.selection.category == category {
            return;
        }
        self.selection.category = category;
        if let Some(dataset) = &self.dataset {
            self.selection.indicators = dataset.indicators_for(category);
        } else {
            self.selection.indicators.clear();
        }
        self.color_map = ColorMap::new(&self.selection.indicators);
        self.refilter();
    }

    /// Move the range start, keeping `year_start <= year_end`.
    pub fn set_year_start(&mut self, year: u16) {
        self.selection.year_start = year;
        self.selection.year_end = self.selection.year_end.max(year);
        self.refilter();
    }

    /// Move the range end, keeping `year_start <= year_end`.
    pub fn set_year_end(&mut self, year: u16) {
        self.selection.year_end = year;
        self.selection.year_start = self.selection.year_start.min(year);
        self.refilter();
    }

    /// Toggle a single indicator in the selection.
    pub fn toggle_indicator(&mut self, indicator: &str) {
        if !self.selection.indicators.remove(indicator) {
            self.selection.indicators.insert(indicator.to_string());
        }
        self.refilter();
    }

    /// Select every indicator of the active category.
    pub fn select_all_indicators(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.selection.indicators = dataset.indicators_for(self.selection.category);
        }
        self.refilter();
    }

    /// Deselect all indicators (yields an empty table by contract).
    pub fn select_no_indicators(&mut self) {
        self.selection.indicators.clear();
        self.refilter();
    }

    /// Encode the current filtered table in the chosen export format.
    pub fn export_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        export::encode(&self.filtered, self.export_format)
    }

    /// Download file name for the current selection and format.
    pub fn export_file_name(&self) -> String {
        export::export_file_name(&self.selection, self.export_format)
    }
}
