/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///        .csv
///          │
///          ▼
///     ┌──────────┐
///     │  loader   │  parse + clean file → Dataset (cached per path)
///     └──────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  Dataset  │  Vec<Record>, station/year/month domains
///     └──────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  filter   │  station + year range + months → visible indices
///     └──────────┘
///          │
///          ▼
///     ┌──────────┐
///     │  stats    │  yearly means, correlation matrix, summary metrics
///     └──────────┘
/// ```
///
/// Nothing in this module depends on egui; the UI consumes its outputs.
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::NaiveDate;

    use super::model::Record;

    /// Build a record with the given key fields; pollutants default to the
    /// PM2.5 value so correlation inputs stay easy to reason about.
    pub fn record(station: &str, year: i32, month: u32, pm25: f64) -> Record {
        Record {
            station: station.to_string(),
            year,
            month,
            day: 1,
            hour: 0,
            pm25,
            pm10: pm25 * 2.0,
            so2: 10.0,
            no2: 40.0,
            co: 1.0,
            o3: 60.0,
            temp: 12.0,
            pres: None,
            dewp: None,
            rain: None,
            wind_dir: None,
            wind_speed: None,
            timestamp: NaiveDate::from_ymd_opt(year, month, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }
}
