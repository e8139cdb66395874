use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Pollutant – the measured concentration columns
// ---------------------------------------------------------------------------

/// One of the six pollutant concentration columns of the PRSA dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    So2,
    No2,
    Co,
    O3,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::Co,
        Pollutant::O3,
    ];

    /// Position within [`Pollutant::ALL`], used to index per-pollutant arrays.
    pub fn index(self) -> usize {
        match self {
            Pollutant::Pm25 => 0,
            Pollutant::Pm10 => 1,
            Pollutant::So2 => 2,
            Pollutant::No2 => 3,
            Pollutant::Co => 4,
            Pollutant::O3 => 5,
        }
    }

    /// Column header as it appears in the source CSV.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::Co => "CO",
            Pollutant::O3 => "O3",
        }
    }

    /// Measurement unit. CO is reported in mg/m³, everything else in µg/m³.
    pub fn unit(self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }

    /// Read this pollutant's concentration from a record.
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Pollutant::Pm25 => record.pm25,
            Pollutant::Pm10 => record.pm10,
            Pollutant::So2 => record.so2,
            Pollutant::No2 => record.no2,
            Pollutant::Co => record.co,
            Pollutant::O3 => record.o3,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one hourly observation
// ---------------------------------------------------------------------------

/// A single observation (one row of the source CSV after cleaning).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub station: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,

    pub pm25: f64,
    pub pm10: f64,
    pub so2: f64,
    pub no2: f64,
    pub co: f64,
    pub o3: f64,

    /// Air temperature in °C.
    pub temp: f64,

    // Remaining meteorological columns. Present only when the source file
    // carries the corresponding header.
    pub pres: Option<f64>,
    pub dewp: Option<f64>,
    pub rain: Option<f64>,
    pub wind_dir: Option<String>,
    pub wind_speed: Option<f64>,

    /// Combined timestamp derived from year/month/day/hour.
    pub timestamp: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned dataset with precomputed filter-widget domains.
/// Immutable after construction; shared across the app as `Arc<Dataset>`.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All observations, in file order.
    pub records: Vec<Record>,
    /// Sorted unique station names.
    pub stations: Vec<String>,
    /// Smallest year present (0 when empty).
    pub year_min: i32,
    /// Largest year present (0 when empty).
    pub year_max: i32,
    /// Months (1–12) that occur in the data.
    pub months: BTreeSet<u32>,
}

impl Dataset {
    /// Build the index data from cleaned records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut stations: BTreeSet<String> = BTreeSet::new();
        let mut months: BTreeSet<u32> = BTreeSet::new();
        let mut year_min = i32::MAX;
        let mut year_max = i32::MIN;

        for rec in &records {
            stations.insert(rec.station.clone());
            months.insert(rec.month);
            year_min = year_min.min(rec.year);
            year_max = year_max.max(rec.year);
        }
        if records.is_empty() {
            year_min = 0;
            year_max = 0;
        }

        Dataset {
            records,
            stations: stations.into_iter().collect(),
            year_min,
            year_max,
            months,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
