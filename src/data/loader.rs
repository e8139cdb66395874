use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data file: {message}")]
    Parse { message: String },
}

impl LoadError {
    fn parse(message: impl Into<String>) -> Self {
        LoadError::Parse {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Process-wide dataset cache
// ---------------------------------------------------------------------------

/// Loaded datasets, memoised per path. A dataset is read at most once per
/// process; all sessions share the immutable `Arc<Dataset>`.
static DATASET_CACHE: Lazy<Mutex<HashMap<PathBuf, Arc<Dataset>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load a dataset through the cache. Subsequent calls for the same path
/// return the already-loaded copy without touching the filesystem.
///
/// The lock is held across the whole check-and-insert, so a path is read at
/// most once per process even under concurrent first loads.
pub fn load_cached(path: &Path) -> Result<Arc<Dataset>, LoadError> {
    let mut cache = DATASET_CACHE.lock().unwrap();
    if let Some(ds) = cache.get(path) {
        return Ok(Arc::clone(ds));
    }
    let dataset = Arc::new(load(path)?);
    cache.insert(path.to_path_buf(), Arc::clone(&dataset));
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Column headers that must be present in the source file.
const REQUIRED_COLUMNS: [&str; 12] = [
    "year", "month", "day", "hour", "station", "PM2.5", "PM10", "SO2", "NO2", "CO", "O3", "TEMP",
];

/// Meteorological columns carried through when the file has them.
const OPTIONAL_COLUMNS: [&str; 5] = ["PRES", "DEWP", "RAIN", "wd", "WSPM"];

/// Load and clean the air-quality CSV at `path`.
///
/// Cleaning policy, matching the dashboard's data-quality rules:
/// * the `No` index column (and any unrecognised column) is ignored
/// * a row with a missing value (`NA` or empty cell) in any recognised
///   column is silently dropped
/// * the per-row timestamp is derived from year/month/day/hour
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let records = read_records(csv::Reader::from_reader(file))?;
    log::info!(
        "loaded {} clean rows from {}",
        records.len(),
        path.display()
    );
    Ok(Dataset::from_records(records))
}

/// Parse an already-opened CSV stream. Split out from [`load`] so tests can
/// feed in-memory data.
fn read_records<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>, LoadError> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::parse(format!("reading headers: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    for col in REQUIRED_COLUMNS {
        if !index.contains_key(col) {
            return Err(LoadError::parse(format!("missing required column '{col}'")));
        }
    }

    // Columns participating in the missing-value row drop: everything we
    // recognise that the file actually has.
    let watched: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .chain(OPTIONAL_COLUMNS.iter())
        .filter_map(|col| index.get(col).copied())
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;

    'rows: for (row_no, result) in reader.records().enumerate() {
        // 1-based file line: the header is line 1, the first data row line 2.
        let line = row_no + 2;
        let row = result.map_err(|e| LoadError::parse(format!("CSV line {line}: {e}")))?;

        for &i in &watched {
            if is_missing(row.get(i).unwrap_or("")) {
                dropped += 1;
                continue 'rows;
            }
        }

        let year: i32 = parse_cell(&row, &index, "year", line)?;
        let month: u32 = parse_cell(&row, &index, "month", line)?;
        let day: u32 = parse_cell(&row, &index, "day", line)?;
        let hour: u32 = parse_cell(&row, &index, "hour", line)?;

        let timestamp = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| {
                LoadError::parse(format!(
                    "line {line}: invalid date {year}-{month}-{day} hour {hour}"
                ))
            })?;

        records.push(Record {
            station: cell(&row, &index, "station").to_string(),
            year,
            month,
            day,
            hour,
            pm25: parse_cell(&row, &index, "PM2.5", line)?,
            pm10: parse_cell(&row, &index, "PM10", line)?,
            so2: parse_cell(&row, &index, "SO2", line)?,
            no2: parse_cell(&row, &index, "NO2", line)?,
            co: parse_cell(&row, &index, "CO", line)?,
            o3: parse_cell(&row, &index, "O3", line)?,
            temp: parse_cell(&row, &index, "TEMP", line)?,
            pres: parse_optional(&row, &index, "PRES", line)?,
            dewp: parse_optional(&row, &index, "DEWP", line)?,
            rain: parse_optional(&row, &index, "RAIN", line)?,
            wind_dir: index
                .get("wd")
                .map(|&i| row.get(i).unwrap_or("").trim().to_string()),
            wind_speed: parse_optional(&row, &index, "WSPM", line)?,
            timestamp,
        });
    }

    if dropped > 0 {
        log::debug!("dropped {dropped} rows with missing values");
    }
    Ok(records)
}

fn is_missing(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t == "NA"
}

fn cell<'a>(row: &'a csv::StringRecord, index: &HashMap<&str, usize>, col: &str) -> &'a str {
    index
        .get(col)
        .and_then(|&i| row.get(i))
        .unwrap_or("")
        .trim()
}

fn parse_cell<T: std::str::FromStr>(
    row: &csv::StringRecord,
    index: &HashMap<&str, usize>,
    col: &str,
    line: usize,
) -> Result<T, LoadError> {
    let tok = cell(row, index, col);
    tok.parse::<T>()
        .map_err(|_| LoadError::parse(format!("line {line}, {col}: '{tok}' is not a number")))
}

fn parse_optional(
    row: &csv::StringRecord,
    index: &HashMap<&str, usize>,
    col: &str,
    line: usize,
) -> Result<Option<f64>, LoadError> {
    if !index.contains_key(col) {
        return Ok(None);
    }
    parse_cell(row, index, col, line).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<Record>, LoadError> {
        read_records(csv::Reader::from_reader(text.as_bytes()))
    }

    const HEADER: &str = "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,station";

    #[test]
    fn parses_rows_and_ignores_index_column() {
        let text = format!(
            "{HEADER}\n\
             1,2013,3,1,0,8.0,12.0,3.0,20.0,0.3,70.0,-0.5,Wanshouxigong\n\
             2,2013,3,1,1,9.0,14.0,3.0,21.0,0.4,68.0,-0.7,Wanshouxigong\n"
        );
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station, "Wanshouxigong");
        assert_eq!(records[0].pm25, 8.0);
        assert_eq!(records[1].hour, 1);
    }

    #[test]
    fn derives_timestamp_from_parts() {
        let text = format!("{HEADER}\n1,2014,7,15,13,8,12,3,20,0.3,70,25.5,A\n");
        let records = parse(&text).unwrap();
        let ts = records[0].timestamp;
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2014, 7, 15)
                .unwrap()
                .and_hms_opt(13, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn drops_rows_with_missing_values() {
        let text = format!(
            "{HEADER}\n\
             1,2013,3,1,0,NA,12,3,20,0.3,70,1.0,A\n\
             2,2013,3,1,1,9,14,3,21,0.4,68,1.1,A\n\
             3,2013,3,1,2,9,14,3,21,0.4,,1.2,A\n"
        );
        let records = parse(&text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hour, 1);
    }

    #[test]
    fn missing_required_column_is_parse_error() {
        let text = "No,year,month,day,hour,PM2.5\n1,2013,3,1,0,8\n";
        let err = parse(text).unwrap_err();
        match err {
            LoadError::Parse { message } => assert!(message.contains("station")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_numeric_cell_reports_file_line() {
        // The bad cell sits on line 3 of the file (header is line 1).
        let text = format!(
            "{HEADER}\n\
             1,2013,3,1,0,8,12,3,20,0.3,70,1.0,A\n\
             2,2013,3,1,1,bogus,12,3,20,0.3,70,1.0,A\n"
        );
        match parse(&text).unwrap_err() {
            LoadError::Parse { message } => {
                assert!(message.contains("line 3"), "message: {message}");
                assert!(message.contains("bogus"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn impossible_date_is_parse_error() {
        let text = format!("{HEADER}\n1,2013,2,30,0,8,12,3,20,0.3,70,1.0,A\n");
        let err = parse(&text).unwrap_err();
        match err {
            LoadError::Parse { message } => assert!(message.contains("invalid date")),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn optional_meteorology_columns() {
        let with = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,wd,station\n\
                    2013,3,1,0,8,12,3,20,0.3,70,1.0,1020.5,NW,A\n";
        let records = parse(with).unwrap();
        assert_eq!(records[0].pres, Some(1020.5));
        assert_eq!(records[0].wind_dir.as_deref(), Some("NW"));
        assert_eq!(records[0].rain, None);

        // A missing value in a present optional column still drops the row.
        let with_na = "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,station\n\
                       2013,3,1,0,8,12,3,20,0.3,70,1.0,NA,A\n";
        assert!(parse(with_na).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = load(Path::new("/no/such/air_quality.csv")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }

    #[test]
    fn cache_loads_each_path_once() {
        let path = std::env::temp_dir().join(format!(
            "aqdash_cache_test_{}.csv",
            std::process::id()
        ));
        std::fs::write(
            &path,
            format!("{HEADER}\n1,2013,3,1,0,8.0,12.0,3.0,20.0,0.3,70.0,-0.5,A\n"),
        )
        .unwrap();

        let first = load_cached(&path).unwrap();
        assert_eq!(first.len(), 1);

        // Once the file is gone, a second call can only come from the cache.
        std::fs::remove_file(&path).unwrap();
        let second = load_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let path = Path::new("/no/such/air_quality.csv");
        assert!(load_cached(path).is_err());
        assert!(load_cached(path).is_err());
    }
}
