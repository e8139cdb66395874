use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader;
use crate::data::model::Dataset;
use crate::data::stats::{
    aggregate_by_year, correlate, summary_metrics, CorrelationMatrix, SummaryMetrics,
    YearlyAggregate,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is immutable once loaded; everything derived from it
/// (`visible`, `yearly`, `correlation`, `summary`) is recomputed in full on
/// every filter change, synchronously on the UI thread.
pub struct AppState {
    /// Startup configuration (dataset path).
    pub config: Config,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Indices of records passing the current filters (cached).
    pub visible: Vec<usize>,

    /// Per-year pollutant means over the visible records.
    pub yearly: Vec<YearlyAggregate>,

    /// Pollutant/temperature correlation over the visible records.
    pub correlation: Option<CorrelationMatrix>,

    /// KPI card values over the visible records.
    pub summary: SummaryMetrics,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        AppState {
            config,
            dataset: None,
            criteria: FilterCriteria::default(),
            visible: Vec::new(),
            yearly: Vec::new(),
            correlation: None,
            summary: SummaryMetrics {
                pm25: f64::NAN,
                no2: f64::NAN,
                co: f64::NAN,
            },
            status_message: None,
        }
    }

    /// Load a dataset through the process-wide cache and make it current.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_cached(path) {
            Ok(dataset) => {
                log::info!(
                    "using {} records across {} stations",
                    dataset.len(),
                    dataset.stations.len()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset filters to their defaults.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the visible set and all aggregates after a criteria change.
    pub fn refilter(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.visible = filtered_indices(dataset, &self.criteria);
        self.yearly = aggregate_by_year(dataset, &self.visible);
        self.correlation = Some(correlate(dataset, &self.visible));
        self.summary = summary_metrics(dataset, &self.visible);
    }

    /// Switch the station filter.
    pub fn set_station(&mut self, station: String) {
        if self.criteria.station != station {
            self.criteria.station = station;
            self.refilter();
        }
    }

    /// Set the inclusive year bounds, keeping min ≤ max.
    pub fn set_year_range(&mut self, year_min: i32, year_max: i32) {
        let (lo, hi) = if year_min <= year_max {
            (year_min, year_max)
        } else {
            (year_max, year_min)
        };
        if (self.criteria.year_min, self.criteria.year_max) != (lo, hi) {
            self.criteria.year_min = lo;
            self.criteria.year_max = hi;
            self.refilter();
        }
    }

    /// Toggle a single month in the filter.
    pub fn toggle_month(&mut self, month: u32) {
        if !self.criteria.months.remove(&month) {
            self.criteria.months.insert(month);
        }
        self.refilter();
    }

    /// Select every month present in the dataset.
    pub fn select_all_months(&mut self) {
        if let Some(dataset) = &self.dataset {
            self.criteria.months = dataset.months.clone();
            self.refilter();
        }
    }

    /// Deselect all months (hides everything).
    pub fn select_no_months(&mut self) {
        self.criteria.months.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::record;

    fn state_with(records: Vec<crate::data::model::Record>) -> AppState {
        let mut state = AppState::new(Config::default());
        state.set_dataset(Arc::new(Dataset::from_records(records)));
        state
    }

    #[test]
    fn derived_state_tracks_filter_changes() {
        let mut state = state_with(vec![
            record("A", 2013, 3, 10.0),
            record("A", 2014, 3, 30.0),
            record("B", 2013, 3, 50.0),
        ]);
        // Defaults select station A in full.
        assert_eq!(state.visible.len(), 2);
        assert_eq!(state.summary.pm25, 20.0);
        assert_eq!(state.yearly.len(), 2);

        state.set_station("B".to_string());
        assert_eq!(state.visible.len(), 1);
        assert_eq!(state.summary.pm25, 50.0);

        state.set_year_range(2014, 2014);
        assert!(state.visible.is_empty());
        assert!(state.summary.pm25.is_nan());
        assert!(state.yearly.is_empty());
    }

    #[test]
    fn year_range_is_normalised() {
        let mut state = state_with(vec![
            record("A", 2013, 3, 10.0),
            record("A", 2015, 3, 30.0),
        ]);
        state.set_year_range(2015, 2013);
        assert_eq!(state.criteria.year_min, 2013);
        assert_eq!(state.criteria.year_max, 2015);
        assert_eq!(state.visible.len(), 2);
    }

    #[test]
    fn month_toggles_round_trip() {
        let mut state = state_with(vec![
            record("A", 2013, 3, 10.0),
            record("A", 2013, 6, 30.0),
        ]);
        state.toggle_month(3);
        assert_eq!(state.visible.len(), 1);
        state.select_no_months();
        assert!(state.visible.is_empty());
        state.select_all_months();
        assert_eq!(state.visible.len(), 2);
    }
}
