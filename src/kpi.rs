//! Dataset-level key performance indicators.

use std::fmt;

use serde::Serialize;

use crate::dataset::EnergyTable;
use crate::features;

/// Aggregate KPIs computed over the loaded table.
///
/// Every indicator is optional: a missing input column degrades the panel to
/// "n/a" instead of failing (and zero capacity never divides).
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Mean combined renewable generation over mean load, percent.
    pub renewable_share_pct: Option<f32>,
    /// Mean solar generation over peak installed solar capacity, percent.
    pub solar_utilization_pct: Option<f32>,
    /// Mean wind generation over peak installed wind capacity, percent.
    pub wind_utilization_pct: Option<f32>,
    /// Peak offshore wind capacity over peak total wind capacity, percent.
    pub offshore_wind_share_pct: Option<f32>,
    /// Mean of `1 − |actual − forecast| / actual` over the load columns, percent.
    pub load_forecast_accuracy_pct: Option<f32>,
    /// Rows where renewable generation exceeded load (suspect input).
    pub anomalous_rows: usize,
}

/// Running mean over optionally-present readings.
#[derive(Debug, Default, Clone, Copy)]
struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    fn push(&mut self, v: Option<f32>) {
        if let Some(v) = v {
            self.sum += f64::from(v);
            self.n += 1;
        }
    }

    fn mean(&self) -> Option<f32> {
        (self.n > 0).then(|| (self.sum / self.n as f64) as f32)
    }
}

/// Running maximum over optionally-present readings.
#[derive(Debug, Default, Clone, Copy)]
struct MaxAcc(Option<f32>);

impl MaxAcc {
    fn push(&mut self, v: Option<f32>) {
        if let Some(v) = v {
            self.0 = Some(self.0.map_or(v, |m| m.max(v)));
        }
    }
}

impl KpiReport {
    /// Computes all KPIs in one pass over the table.
    pub fn from_table(table: &EnergyTable) -> Self {
        let mut load = MeanAcc::default();
        let mut renewable = MeanAcc::default();
        let mut solar_gen = MeanAcc::default();
        let mut wind_gen = MeanAcc::default();
        let mut accuracy = MeanAcc::default();
        let mut solar_cap = MaxAcc::default();
        let mut wind_cap = MaxAcc::default();
        let mut offshore_cap = MaxAcc::default();
        let mut anomalous = 0usize;

        let renewables = features::renewable_generation(table);

        for (r, ren) in table.records.iter().zip(&renewables) {
            load.push(r.load_actual_mw);
            renewable.push(*ren);
            solar_gen.push(r.solar_generation_mw);

            let wind = match (r.wind_onshore_generation_mw, r.wind_offshore_generation_mw) {
                (None, None) => r.wind_generation_mw,
                (on, off) => Some(on.unwrap_or(0.0) + off.unwrap_or(0.0)),
            };
            wind_gen.push(wind);

            solar_cap.push(r.solar_capacity_mw);
            wind_cap.push(r.wind_capacity_mw);
            offshore_cap.push(r.wind_offshore_capacity_mw);

            if let (Some(g), Some(l)) = (*ren, r.load_actual_mw) {
                if g > l {
                    anomalous += 1;
                }
            }

            if let (Some(a), Some(f)) = (r.load_actual_mw, r.load_forecast_mw) {
                if a > 0.0 {
                    accuracy.push(Some(1.0 - (a - f).abs() / a));
                }
            }
        }

        Self {
            renewable_share_pct: percent_ratio(renewable.mean(), load.mean()),
            solar_utilization_pct: percent_ratio(solar_gen.mean(), solar_cap.0),
            wind_utilization_pct: percent_ratio(wind_gen.mean(), wind_cap.0),
            offshore_wind_share_pct: percent_ratio(offshore_cap.0, wind_cap.0),
            load_forecast_accuracy_pct: accuracy.mean().map(|a| a * 100.0),
            anomalous_rows: anomalous,
        }
    }
}

/// `100 * num / den`, undefined when either side is absent or `den <= 0`.
fn percent_ratio(num: Option<f32>, den: Option<f32>) -> Option<f32> {
    match (num, den) {
        (Some(n), Some(d)) if d > 0.0 => Some(100.0 * n / d),
        _ => None,
    }
}

fn fmt_pct(v: Option<f32>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Renewable share:         {}", fmt_pct(self.renewable_share_pct))?;
        writeln!(f, "Solar utilization:       {}", fmt_pct(self.solar_utilization_pct))?;
        writeln!(f, "Wind utilization:        {}", fmt_pct(self.wind_utilization_pct))?;
        writeln!(f, "Offshore wind share:     {}", fmt_pct(self.offshore_wind_share_pct))?;
        writeln!(
            f,
            "Load forecast accuracy:  {}",
            fmt_pct(self.load_forecast_accuracy_pct)
        )?;
        write!(f, "Anomalous rows:          {}", self.anomalous_rows)
    }
}
