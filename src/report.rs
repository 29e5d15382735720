//! Stateless reporting aggregations feeding the dashboard, the terminal UI,
//! and the CSV exports.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::dataset::EnergyTable;

/// Hours per 15-minute step, for MW → MWh conversion.
const STEP_HOURS: f64 = 0.25;

/// Per-day energy sums in MWh.
#[derive(Debug, Clone, Serialize)]
pub struct DailyEnergy {
    pub date: NaiveDate,
    pub solar_mwh: Option<f32>,
    pub wind_mwh: Option<f32>,
    pub load_mwh: Option<f32>,
    /// (solar + wind) / load for the day, unitless.
    pub renewable_share: Option<f32>,
}

/// Mean MW per calendar month across all years (seasonal profile).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyProfile {
    /// Month number, 1–12.
    pub month: u32,
    pub solar_mw: Option<f32>,
    pub wind_mw: Option<f32>,
    pub load_mw: Option<f32>,
}

/// Peak installed capacity per year in MW.
#[derive(Debug, Clone, Serialize)]
pub struct YearlyCapacity {
    pub year: i32,
    pub solar_mw: Option<f32>,
    pub wind_mw: Option<f32>,
    pub wind_onshore_mw: Option<f32>,
    pub wind_offshore_mw: Option<f32>,
}

/// Mean wind generation per year, split onshore/offshore.
#[derive(Debug, Clone, Serialize)]
pub struct WindBreakdown {
    pub year: i32,
    pub onshore_mw: Option<f32>,
    pub offshore_mw: Option<f32>,
}

/// Mean capacity factors from the dataset's profile columns, unitless.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityFactors {
    pub solar: Option<f32>,
    pub wind: Option<f32>,
}

/// One forecast sample aligned with its observed value, in MW.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub actual_mw: f32,
    pub predicted_mw: f32,
}

#[derive(Debug, Default, Clone, Copy)]
struct SumAcc {
    sum: f64,
    n: usize,
}

impl SumAcc {
    fn push(&mut self, v: Option<f32>) {
        if let Some(v) = v {
            self.sum += f64::from(v);
            self.n += 1;
        }
    }

    fn sum_mwh(&self) -> Option<f32> {
        (self.n > 0).then(|| (self.sum * STEP_HOURS) as f32)
    }

    fn mean(&self) -> Option<f32> {
        (self.n > 0).then(|| (self.sum / self.n as f64) as f32)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct MaxAcc(Option<f32>);

impl MaxAcc {
    fn push(&mut self, v: Option<f32>) {
        if let Some(v) = v {
            self.0 = Some(self.0.map_or(v, |m| m.max(v)));
        }
    }
}

/// Daily solar/wind/load energy, one entry per distinct day in the table.
pub fn daily_energy(table: &EnergyTable) -> Vec<DailyEnergy> {
    let mut days: BTreeMap<NaiveDate, (SumAcc, SumAcc, SumAcc)> = BTreeMap::new();

    for r in &table.records {
        let entry = days.entry(r.timestamp.date_naive()).or_default();
        entry.0.push(r.solar_generation_mw);
        let wind = match (r.wind_onshore_generation_mw, r.wind_offshore_generation_mw) {
            (None, None) => r.wind_generation_mw,
            (on, off) => Some(on.unwrap_or(0.0) + off.unwrap_or(0.0)),
        };
        entry.1.push(wind);
        entry.2.push(r.load_actual_mw);
    }

    days.into_iter()
        .map(|(date, (solar, wind, load))| {
            let solar_mwh = solar.sum_mwh();
            let wind_mwh = wind.sum_mwh();
            let load_mwh = load.sum_mwh();
            let renewable_share = match (solar_mwh, wind_mwh, load_mwh) {
                (s, w, Some(l)) if l > 0.0 && (s.is_some() || w.is_some()) => {
                    Some((s.unwrap_or(0.0) + w.unwrap_or(0.0)) / l)
                }
                _ => None,
            };
            DailyEnergy {
                date,
                solar_mwh,
                wind_mwh,
                load_mwh,
                renewable_share,
            }
        })
        .collect()
}

/// Mean generation and load per calendar month, aggregated across years.
pub fn monthly_profile(table: &EnergyTable) -> Vec<MonthlyProfile> {
    let mut months: [(SumAcc, SumAcc, SumAcc); 12] = Default::default();

    for r in &table.records {
        let m = r.timestamp.month0() as usize;
        months[m].0.push(r.solar_generation_mw);
        let wind = match (r.wind_onshore_generation_mw, r.wind_offshore_generation_mw) {
            (None, None) => r.wind_generation_mw,
            (on, off) => Some(on.unwrap_or(0.0) + off.unwrap_or(0.0)),
        };
        months[m].1.push(wind);
        months[m].2.push(r.load_actual_mw);
    }

    months
        .iter()
        .enumerate()
        .filter(|(_, (solar, wind, load))| solar.n + wind.n + load.n > 0)
        .map(|(i, (solar, wind, load))| MonthlyProfile {
            month: i as u32 + 1,
            solar_mw: solar.mean(),
            wind_mw: wind.mean(),
            load_mw: load.mean(),
        })
        .collect()
}

/// Peak installed capacity per year (capacity growth curve).
pub fn yearly_capacity(table: &EnergyTable) -> Vec<YearlyCapacity> {
    let mut years: BTreeMap<i32, (MaxAcc, MaxAcc, MaxAcc, MaxAcc)> = BTreeMap::new();

    for r in &table.records {
        let entry = years.entry(r.timestamp.year()).or_default();
        entry.0.push(r.solar_capacity_mw);
        entry.1.push(r.wind_capacity_mw);
        entry.2.push(r.wind_onshore_capacity_mw);
        entry.3.push(r.wind_offshore_capacity_mw);
    }

    years
        .into_iter()
        .map(|(year, (solar, wind, onshore, offshore))| YearlyCapacity {
            year,
            solar_mw: solar.0,
            wind_mw: wind.0,
            wind_onshore_mw: onshore.0,
            wind_offshore_mw: offshore.0,
        })
        .collect()
}

/// Mean onshore/offshore wind generation per year.
pub fn wind_breakdown(table: &EnergyTable) -> Vec<WindBreakdown> {
    let mut years: BTreeMap<i32, (SumAcc, SumAcc)> = BTreeMap::new();

    for r in &table.records {
        let entry = years.entry(r.timestamp.year()).or_default();
        entry.0.push(r.wind_onshore_generation_mw);
        entry.1.push(r.wind_offshore_generation_mw);
    }

    years
        .into_iter()
        .map(|(year, (onshore, offshore))| WindBreakdown {
            year,
            onshore_mw: onshore.mean(),
            offshore_mw: offshore.mean(),
        })
        .collect()
}

/// Mean capacity factors over the whole table.
pub fn capacity_factors(table: &EnergyTable) -> CapacityFactors {
    let mut solar = SumAcc::default();
    let mut wind = SumAcc::default();
    for r in &table.records {
        solar.push(r.solar_profile);
        wind.push(r.wind_profile);
    }
    CapacityFactors {
        solar: solar.mean(),
        wind: wind.mean(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::dataset::{ColumnPresence, EnergyRecord};

    /// Two days of hourly records with constant readings.
    fn two_day_table() -> EnergyTable {
        let t0 = Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap();
        let records = (0..48)
            .map(|i| {
                let mut r = EnergyRecord::empty(t0 + Duration::hours(i));
                r.solar_generation_mw = Some(1000.0);
                r.wind_onshore_generation_mw = Some(600.0);
                r.wind_offshore_generation_mw = Some(400.0);
                r.load_actual_mw = Some(4000.0);
                r.solar_capacity_mw = Some(40000.0 + i as f32);
                r.wind_capacity_mw = Some(50000.0);
                r.wind_offshore_capacity_mw = Some(7000.0);
                r.solar_profile = Some(0.12);
                r.wind_profile = Some(0.25);
                r
            })
            .collect();
        EnergyTable {
            records,
            present: ColumnPresence::default(),
            rows_skipped: 0,
        }
    }

    #[test]
    fn daily_energy_one_entry_per_day() {
        let daily = daily_energy(&two_day_table());
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
        // 24 hourly readings of 1000 MW at 0.25 h per step
        let solar = daily[0].solar_mwh.expect("solar");
        assert!((solar - 24.0 * 1000.0 * 0.25).abs() < 1e-2);
        let share = daily[0].renewable_share.expect("share");
        assert!((share - 0.5).abs() < 1e-4, "got {share}");
    }

    #[test]
    fn daily_energy_missing_load_has_no_share() {
        let mut table = two_day_table();
        for r in &mut table.records {
            r.load_actual_mw = None;
        }
        let daily = daily_energy(&table);
        assert!(daily.iter().all(|d| d.renewable_share.is_none()));
        assert!(daily.iter().all(|d| d.solar_mwh.is_some()));
    }

    #[test]
    fn monthly_profile_averages_by_calendar_month() {
        let profile = monthly_profile(&two_day_table());
        assert_eq!(profile.len(), 1);
        assert_eq!(profile[0].month, 3);
        assert_eq!(profile[0].solar_mw, Some(1000.0));
        assert_eq!(profile[0].wind_mw, Some(1000.0));
        assert_eq!(profile[0].load_mw, Some(4000.0));
    }

    #[test]
    fn yearly_capacity_takes_peak() {
        let caps = yearly_capacity(&two_day_table());
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].year, 2019);
        assert_eq!(caps[0].solar_mw, Some(40047.0));
        assert_eq!(caps[0].wind_offshore_mw, Some(7000.0));
        assert_eq!(caps[0].wind_onshore_mw, None);
    }

    #[test]
    fn wind_breakdown_means_by_year() {
        let breakdown = wind_breakdown(&two_day_table());
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].onshore_mw, Some(600.0));
        assert_eq!(breakdown[0].offshore_mw, Some(400.0));
    }

    #[test]
    fn capacity_factors_are_profile_means() {
        let cf = capacity_factors(&two_day_table());
        assert!((cf.solar.expect("solar") - 0.12).abs() < 1e-5);
        assert!((cf.wind.expect("wind") - 0.25).abs() < 1e-5);
    }

    #[test]
    fn empty_table_produces_empty_reports() {
        let table = EnergyTable {
            records: Vec::new(),
            present: ColumnPresence::default(),
            rows_skipped: 0,
        };
        assert!(daily_energy(&table).is_empty());
        assert!(monthly_profile(&table).is_empty());
        assert!(yearly_capacity(&table).is_empty());
        assert!(wind_breakdown(&table).is_empty());
        assert_eq!(capacity_factors(&table).solar, None);
    }
}
