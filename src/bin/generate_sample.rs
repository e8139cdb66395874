//! Writes a deterministic PRSA-shaped air-quality CSV so the dashboard can
//! be exercised without the real Beijing dataset.

use std::f64::consts::PI;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

const WIND_DIRS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Seasonal factor: +1 in mid-winter, -1 in mid-summer.
fn season(day_of_year: u32) -> f64 {
    ((day_of_year as f64 - 15.0) / 365.0 * 2.0 * PI).cos()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Station name → pollution severity factor.
    let stations = [
        ("Aotizhongxin", 1.15),
        ("Changping", 0.80),
        ("Wanshouxigong", 1.00),
    ];

    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .context("start date")?
        .and_hms_opt(0, 0, 0)
        .context("start time")?;
    let end = NaiveDate::from_ymd_opt(2017, 2, 28)
        .context("end date")?
        .and_hms_opt(21, 0, 0)
        .context("end time")?;

    std::fs::create_dir_all("data").context("creating data directory")?;
    let output_path = "data/air_quality.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;

    writer.write_record([
        "No", "year", "month", "day", "hour", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP",
        "PRES", "DEWP", "RAIN", "wd", "WSPM", "station",
    ])?;

    let mut row_no: u64 = 0;
    for (station, severity) in stations {
        // One observation every 3 hours keeps the file small enough to
        // commit while preserving the seasonal and diurnal structure.
        let mut ts: NaiveDateTime = start;
        while ts <= end {
            row_no += 1;
            let s = season(ts.ordinal());
            let diurnal = ((ts.hour() as f64 - 14.0) / 24.0 * 2.0 * PI).cos();

            let temp = 13.0 - 15.0 * s + 4.0 * diurnal + rng.gauss(0.0, 2.0);
            let pm25 = (severity * (55.0 + 35.0 * s) + rng.gauss(0.0, 18.0)).max(2.0);
            let pm10 = (pm25 * 1.6 + rng.gauss(0.0, 15.0)).max(pm25);
            let so2 = (severity * (14.0 + 10.0 * s) + rng.gauss(0.0, 5.0)).max(0.5);
            let no2 = (0.55 * pm25 + 20.0 + rng.gauss(0.0, 8.0)).max(2.0);
            let co = (pm25 / 55.0 + rng.gauss(0.0, 0.25)).max(0.1);
            let o3 = (75.0 - 40.0 * s - 0.2 * pm25 + rng.gauss(0.0, 12.0)).max(1.0);
            let pres = 1012.0 + 9.0 * s + rng.gauss(0.0, 3.0);
            let dewp = temp - 5.0 - rng.next_f64() * 8.0;
            let rain = if rng.next_f64() < 0.06 {
                rng.next_f64() * 4.0
            } else {
                0.0
            };
            let wd = WIND_DIRS[(rng.next_u64() % WIND_DIRS.len() as u64) as usize];
            let wspm = (rng.gauss(1.8, 1.2)).max(0.0);

            // Roughly 1% of rows lose their PM2.5 reading, to exercise the
            // loader's missing-value policy.
            let pm25_cell = if rng.next_f64() < 0.01 {
                "NA".to_string()
            } else {
                format!("{pm25:.1}")
            };

            writer.write_record([
                row_no.to_string(),
                ts.year().to_string(),
                ts.month().to_string(),
                ts.day().to_string(),
                ts.hour().to_string(),
                pm25_cell,
                format!("{pm10:.1}"),
                format!("{so2:.1}"),
                format!("{no2:.1}"),
                format!("{co:.2}"),
                format!("{o3:.1}"),
                format!("{temp:.1}"),
                format!("{pres:.1}"),
                format!("{dewp:.1}"),
                format!("{rain:.1}"),
                wd.to_string(),
                format!("{wspm:.1}"),
                station.to_string(),
            ])?;

            ts = ts + Duration::hours(3);
        }
    }

    writer.flush()?;
    println!("Wrote {row_no} rows for {} stations to {output_path}", stations.len());
    Ok(())
}
