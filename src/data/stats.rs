use std::collections::BTreeMap;

use super::model::{Dataset, Pollutant, Record};

// ---------------------------------------------------------------------------
// Yearly aggregation
// ---------------------------------------------------------------------------

/// Mean of each pollutant over one year of the filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub year: i32,
    means: [f64; Pollutant::ALL.len()],
}

impl YearlyAggregate {
    pub fn mean(&self, pollutant: Pollutant) -> f64 {
        self.means[pollutant.index()]
    }
}

/// Group the view by year and average each pollutant column, ascending by
/// year. Exactly one entry per distinct year present in the view.
pub fn aggregate_by_year(dataset: &Dataset, view: &[usize]) -> Vec<YearlyAggregate> {
    let mut groups: BTreeMap<i32, ([f64; Pollutant::ALL.len()], usize)> = BTreeMap::new();

    for &i in view {
        let rec = &dataset.records[i];
        let (sums, count) = groups.entry(rec.year).or_insert(([0.0; 6], 0));
        for (slot, &p) in sums.iter_mut().zip(Pollutant::ALL.iter()) {
            *slot += p.value(rec);
        }
        *count += 1;
    }

    groups
        .into_iter()
        .map(|(year, (sums, count))| YearlyAggregate {
            year,
            means: sums.map(|s| s / count as f64),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Column accessors entering the correlation: six pollutants plus TEMP.
const CORRELATION_COLUMNS: [(&str, fn(&Record) -> f64); 7] = [
    ("PM2.5", |r| r.pm25),
    ("PM10", |r| r.pm10),
    ("SO2", |r| r.so2),
    ("NO2", |r| r.no2),
    ("CO", |r| r.co),
    ("O3", |r| r.o3),
    ("TEMP", |r| r.temp),
];

/// Pairwise Pearson correlations over {pollutants, TEMP}.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    /// Row-major n×n coefficients.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.labels.len() + col]
    }
}

/// Compute the correlation matrix of the view.
///
/// A column with zero variance (fewer than 2 distinct values) produces NaN
/// for every pair it participates in, including its own diagonal entry.
pub fn correlate(dataset: &Dataset, view: &[usize]) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = CORRELATION_COLUMNS
        .iter()
        .map(|(_, get)| view.iter().map(|&i| get(&dataset.records[i])).collect())
        .collect();

    let n = CORRELATION_COLUMNS.len();
    let mut values = vec![f64::NAN; n * n];
    for row in 0..n {
        for col in row..n {
            let r = pearson(&series[row], &series[col]);
            values[row * n + col] = r;
            values[col * n + row] = r;
        }
    }

    CorrelationMatrix {
        labels: CORRELATION_COLUMNS.iter().map(|&(label, _)| label).collect(),
        values,
    }
}

/// Pearson correlation coefficient. NaN when either series has fewer than
/// two values or zero variance.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// The three KPI card values. NaN when the view is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub pm25: f64,
    pub no2: f64,
    pub co: f64,
}

/// Mean PM2.5, NO2 and CO over the view; NaN metrics for an empty view
/// rather than a division error.
pub fn summary_metrics(dataset: &Dataset, view: &[usize]) -> SummaryMetrics {
    SummaryMetrics {
        pm25: column_mean(dataset, view, |r| r.pm25),
        no2: column_mean(dataset, view, |r| r.no2),
        co: column_mean(dataset, view, |r| r.co),
    }
}

fn column_mean(dataset: &Dataset, view: &[usize], get: impl Fn(&Record) -> f64) -> f64 {
    if view.is_empty() {
        return f64::NAN;
    }
    view.iter().map(|&i| get(&dataset.records[i])).sum::<f64>() / view.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::record;

    fn all(dataset: &Dataset) -> Vec<usize> {
        (0..dataset.len()).collect()
    }

    #[test]
    fn yearly_means_per_group() {
        // PM2.5 [10, 20, 30] over years [2013, 2013, 2014]
        // → 2013 mean 15, 2014 mean 30.
        let ds = Dataset::from_records(vec![
            record("A", 2013, 1, 10.0),
            record("A", 2013, 2, 20.0),
            record("A", 2014, 1, 30.0),
        ]);
        let yearly = aggregate_by_year(&ds, &all(&ds));
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].year, 2013);
        assert_eq!(yearly[0].mean(Pollutant::Pm25), 15.0);
        assert_eq!(yearly[1].year, 2014);
        assert_eq!(yearly[1].mean(Pollutant::Pm25), 30.0);
    }

    #[test]
    fn yearly_output_years_are_distinct_and_sorted() {
        let ds = Dataset::from_records(vec![
            record("A", 2016, 1, 1.0),
            record("A", 2013, 1, 2.0),
            record("A", 2016, 5, 3.0),
            record("A", 2014, 2, 4.0),
            record("A", 2013, 9, 5.0),
        ]);
        let years: Vec<i32> = aggregate_by_year(&ds, &all(&ds))
            .iter()
            .map(|a| a.year)
            .collect();
        assert_eq!(years, vec![2013, 2014, 2016]);
    }

    #[test]
    fn yearly_aggregate_of_empty_view_is_empty() {
        let ds = Dataset::from_records(vec![record("A", 2013, 1, 10.0)]);
        assert!(aggregate_by_year(&ds, &[]).is_empty());
    }

    #[test]
    fn correlation_symmetric_with_unit_diagonal() {
        let ds = Dataset::from_records(vec![
            record("A", 2013, 1, 10.0),
            record("A", 2013, 2, 25.0),
            record("A", 2014, 3, 31.0),
            record("A", 2015, 4, 8.0),
        ]);
        let m = correlate(&ds, &all(&ds));
        assert_eq!(m.len(), 7);
        for i in 0..m.len() {
            for j in 0..m.len() {
                let v = m.get(i, j);
                let t = m.get(j, i);
                if v.is_nan() {
                    assert!(t.is_nan());
                } else {
                    assert_eq!(v, t);
                    assert!(v >= -1.0 - 1e-12 && v <= 1.0 + 1e-12);
                }
            }
        }
        // PM2.5 varies, so its diagonal entry is exactly 1.
        assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
        // PM10 is 2×PM2.5 in the fixture → perfectly correlated.
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_column_yields_nan() {
        // testutil records hold SO2 constant at 10.0.
        let ds = Dataset::from_records(vec![
            record("A", 2013, 1, 10.0),
            record("A", 2013, 2, 20.0),
        ]);
        let m = correlate(&ds, &all(&ds));
        let so2 = m.labels.iter().position(|&l| l == "SO2").unwrap();
        for j in 0..m.len() {
            assert!(m.get(so2, j).is_nan());
        }
    }

    #[test]
    fn correlation_of_empty_view_is_all_nan() {
        let ds = Dataset::from_records(vec![record("A", 2013, 1, 10.0)]);
        let m = correlate(&ds, &[]);
        for i in 0..m.len() {
            for j in 0..m.len() {
                assert!(m.get(i, j).is_nan());
            }
        }
    }

    #[test]
    fn summary_means_over_view() {
        let ds = Dataset::from_records(vec![
            record("A", 2013, 1, 10.0),
            record("A", 2013, 2, 30.0),
        ]);
        let s = summary_metrics(&ds, &all(&ds));
        assert_eq!(s.pm25, 20.0);
        assert_eq!(s.no2, 40.0);
        assert_eq!(s.co, 1.0);
    }

    #[test]
    fn summary_of_empty_view_is_nan_not_panic() {
        let ds = Dataset::from_records(vec![record("A", 2013, 1, 10.0)]);
        let s = summary_metrics(&ds, &[]);
        assert!(s.pm25.is_nan());
        assert!(s.no2.is_nan());
        assert!(s.co.is_nan());
    }
}
