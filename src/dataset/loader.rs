//! CSV loader for the OPSD 15-minute dataset.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use tracing::warn;

use super::columns;
use super::table::{ColumnPresence, EnergyRecord, EnergyTable};
use super::DataError;

/// Header positions of the known columns. Only the timestamp is required.
struct ColumnIndex {
    timestamp: usize,
    load_actual: Option<usize>,
    load_forecast: Option<usize>,
    solar_capacity: Option<usize>,
    solar_generation: Option<usize>,
    solar_profile: Option<usize>,
    wind_capacity: Option<usize>,
    wind_generation: Option<usize>,
    wind_profile: Option<usize>,
    wind_onshore_capacity: Option<usize>,
    wind_onshore_generation: Option<usize>,
    wind_offshore_capacity: Option<usize>,
    wind_offshore_generation: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let Some(timestamp) = find(columns::UTC_TIMESTAMP) else {
            return Err(DataError::MissingTimestampColumn(columns::UTC_TIMESTAMP));
        };

        Ok(Self {
            timestamp,
            load_actual: find(columns::LOAD_ACTUAL),
            load_forecast: find(columns::LOAD_FORECAST),
            solar_capacity: find(columns::SOLAR_CAPACITY),
            solar_generation: find(columns::SOLAR_GENERATION),
            solar_profile: find(columns::SOLAR_PROFILE),
            wind_capacity: find(columns::WIND_CAPACITY),
            wind_generation: find(columns::WIND_GENERATION),
            wind_profile: find(columns::WIND_PROFILE),
            wind_onshore_capacity: find(columns::WIND_ONSHORE_CAPACITY),
            wind_onshore_generation: find(columns::WIND_ONSHORE_GENERATION),
            wind_offshore_capacity: find(columns::WIND_OFFSHORE_CAPACITY),
            wind_offshore_generation: find(columns::WIND_OFFSHORE_GENERATION),
        })
    }

    fn presence(&self) -> ColumnPresence {
        ColumnPresence {
            load_actual: self.load_actual.is_some(),
            load_forecast: self.load_forecast.is_some(),
            solar_capacity: self.solar_capacity.is_some(),
            solar_generation: self.solar_generation.is_some(),
            solar_profile: self.solar_profile.is_some(),
            wind_capacity: self.wind_capacity.is_some(),
            wind_generation: self.wind_generation.is_some(),
            wind_profile: self.wind_profile.is_some(),
            wind_onshore_capacity: self.wind_onshore_capacity.is_some(),
            wind_onshore_generation: self.wind_onshore_generation.is_some(),
            wind_offshore_capacity: self.wind_offshore_capacity.is_some(),
            wind_offshore_generation: self.wind_offshore_generation.is_some(),
        }
    }
}

/// Loads the dataset from a CSV file.
///
/// Rows with an unparseable timestamp, or whose timestamp does not strictly
/// increase, are skipped with a warning and counted in
/// [`EnergyTable::rows_skipped`]. Empty or unparseable numeric cells become
/// `None`.
///
/// # Errors
///
/// Returns a [`DataError`] if the file cannot be opened or read, if the
/// timestamp column is absent, or if no row survives loading.
pub fn load_csv(path: &Path) -> Result<EnergyTable, DataError> {
    let file = File::open(path).map_err(|e| DataError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|e| DataError::Csv {
            path: path.display().to_string(),
            source: e,
        })?
        .clone();
    let idx = ColumnIndex::from_headers(&headers)?;

    let mut records: Vec<EnergyRecord> = Vec::new();
    let mut skipped = 0usize;
    let mut last_ts: Option<DateTime<Utc>> = None;

    for (line, row) in reader.records().enumerate() {
        let row = match row {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed CSV row");
                skipped += 1;
                continue;
            }
        };

        let raw_ts = row.get(idx.timestamp).unwrap_or("");
        let Some(timestamp) = parse_timestamp(raw_ts) else {
            warn!(line, value = raw_ts, "skipping row with unparseable timestamp");
            skipped += 1;
            continue;
        };

        if let Some(prev) = last_ts {
            if timestamp <= prev {
                warn!(line, %timestamp, "skipping row with non-increasing timestamp");
                skipped += 1;
                continue;
            }
        }
        last_ts = Some(timestamp);

        records.push(EnergyRecord {
            timestamp,
            load_actual_mw: cell(&row, idx.load_actual),
            load_forecast_mw: cell(&row, idx.load_forecast),
            solar_capacity_mw: cell(&row, idx.solar_capacity),
            solar_generation_mw: cell(&row, idx.solar_generation),
            solar_profile: cell(&row, idx.solar_profile),
            wind_capacity_mw: cell(&row, idx.wind_capacity),
            wind_generation_mw: cell(&row, idx.wind_generation),
            wind_profile: cell(&row, idx.wind_profile),
            wind_onshore_capacity_mw: cell(&row, idx.wind_onshore_capacity),
            wind_onshore_generation_mw: cell(&row, idx.wind_onshore_generation),
            wind_offshore_capacity_mw: cell(&row, idx.wind_offshore_capacity),
            wind_offshore_generation_mw: cell(&row, idx.wind_offshore_generation),
        });
    }

    if records.is_empty() {
        return Err(DataError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(EnergyTable {
        records,
        present: idx.presence(),
        rows_skipped: skipped,
    })
}

/// Parses an OPSD timestamp: RFC 3339 (`2015-01-01T00:00:00Z`) with a
/// space-separated fallback.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Reads one optional numeric cell. Empty, absent, or non-finite values
/// become `None`.
fn cell(row: &StringRecord, idx: Option<usize>) -> Option<f32> {
    let raw = row.get(idx?)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f32>().ok().filter(|v| v.is_finite())
}
