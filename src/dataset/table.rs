//! In-memory representation of the loaded dataset.

use chrono::{DateTime, Utc};

/// One 15-minute observation.
///
/// Every reading is optional: gaps in the source CSV are missing data, not
/// errors. Power and capacity values are in MW; profile columns are unitless
/// capacity factors in [0, 1].
#[derive(Debug, Clone)]
pub struct EnergyRecord {
    pub timestamp: DateTime<Utc>,
    pub load_actual_mw: Option<f32>,
    pub load_forecast_mw: Option<f32>,
    pub solar_capacity_mw: Option<f32>,
    pub solar_generation_mw: Option<f32>,
    pub solar_profile: Option<f32>,
    pub wind_capacity_mw: Option<f32>,
    pub wind_generation_mw: Option<f32>,
    pub wind_profile: Option<f32>,
    pub wind_onshore_capacity_mw: Option<f32>,
    pub wind_onshore_generation_mw: Option<f32>,
    pub wind_offshore_capacity_mw: Option<f32>,
    pub wind_offshore_generation_mw: Option<f32>,
}

impl EnergyRecord {
    /// A record with the given timestamp and no readings.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            load_actual_mw: None,
            load_forecast_mw: None,
            solar_capacity_mw: None,
            solar_generation_mw: None,
            solar_profile: None,
            wind_capacity_mw: None,
            wind_generation_mw: None,
            wind_profile: None,
            wind_onshore_capacity_mw: None,
            wind_onshore_generation_mw: None,
            wind_offshore_capacity_mw: None,
            wind_offshore_generation_mw: None,
        }
    }
}

/// Which optional columns were present in the CSV header.
///
/// Downstream consumers use these flags to degrade gracefully (omit a KPI or
/// a chart panel) instead of failing on an absent column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPresence {
    pub load_actual: bool,
    pub load_forecast: bool,
    pub solar_capacity: bool,
    pub solar_generation: bool,
    pub solar_profile: bool,
    pub wind_capacity: bool,
    pub wind_generation: bool,
    pub wind_profile: bool,
    pub wind_onshore_capacity: bool,
    pub wind_onshore_generation: bool,
    pub wind_offshore_capacity: bool,
    pub wind_offshore_generation: bool,
}

/// Ordered table of records with strictly increasing timestamps.
#[derive(Debug, Clone)]
pub struct EnergyTable {
    /// Records sorted by timestamp, strictly increasing.
    pub records: Vec<EnergyRecord>,
    /// Header presence flags.
    pub present: ColumnPresence,
    /// Rows dropped during loading (malformed or out of order).
    pub rows_skipped: usize,
}

impl EnergyTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last timestamps of the table.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.records.first(), self.records.last()) {
            (Some(a), Some(b)) => Some((a.timestamp, b.timestamp)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_record_has_no_readings() {
        let ts = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let r = EnergyRecord::empty(ts);
        assert_eq!(r.timestamp, ts);
        assert!(r.load_actual_mw.is_none());
        assert!(r.wind_offshore_generation_mw.is_none());
    }

    #[test]
    fn span_returns_first_and_last() {
        let t0 = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2015, 1, 1, 0, 15, 0).unwrap();
        let table = EnergyTable {
            records: vec![EnergyRecord::empty(t0), EnergyRecord::empty(t1)],
            present: ColumnPresence::default(),
            rows_skipped: 0,
        };
        assert_eq!(table.span(), Some((t0, t1)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn span_of_empty_table_is_none() {
        let table = EnergyTable {
            records: Vec::new(),
            present: ColumnPresence::default(),
            rows_skipped: 0,
        };
        assert_eq!(table.span(), None);
        assert!(table.is_empty());
    }
}
