use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Filter criteria: station, year range, month set
// ---------------------------------------------------------------------------

/// The three independent filter controls of the dashboard.
///
/// An empty month set is a valid state (nothing selected → nothing shown),
/// mirroring an emptied multiselect widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Exact station match.
    pub station: String,
    /// Inclusive lower bound on year.
    pub year_min: i32,
    /// Inclusive upper bound on year.
    pub year_max: i32,
    /// Selected months (1–12).
    pub months: BTreeSet<u32>,
}

impl FilterCriteria {
    /// Widget defaults for a freshly loaded dataset: first station, full
    /// year range, every month that occurs in the data.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        FilterCriteria {
            station: dataset.stations.first().cloned().unwrap_or_default(),
            year_min: dataset.year_min,
            year_max: dataset.year_max,
            months: dataset.months.clone(),
        }
    }

    /// Whether a single record passes all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        record.station == self.station
            && record.year >= self.year_min
            && record.year <= self.year_max
            && self.months.contains(&record.month)
    }
}

/// Return indices of records passing the current criteria.
///
/// Recomputed in full on every criteria change; an empty result is a normal
/// outcome, not an error.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
