//! Derived series feeding the forecast pipeline: combined renewable
//! generation, missing-data policy, ramp rates, and min-max scaling.

use thiserror::Error;

use crate::dataset::{EnergyRecord, EnergyTable};

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("series is empty after applying the missing-data policy")]
    Empty,
    #[error("series is constant at {value}; min-max scaling is degenerate")]
    DegenerateRange { value: f32 },
    #[error("train fraction {0} must lie strictly between 0 and 1")]
    BadSplit(f32),
}

/// Missing-value policy applied before scaling and windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Carry the last observation forward; the leading gap is dropped.
    Forward,
    /// Drop missing points entirely.
    Drop,
}

/// A gap-free series plus the mapping back to table row indices.
#[derive(Debug, Clone)]
pub struct DenseSeries {
    pub values: Vec<f32>,
    /// `index_map[i]` is the table row index of `values[i]`.
    pub index_map: Vec<usize>,
    /// Number of values produced by forward-filling.
    pub filled: usize,
}

/// Combined renewable generation (solar + onshore wind + offshore wind) per
/// record, in MW.
///
/// When the onshore/offshore split columns are absent, the aggregate wind
/// column stands in. A record where every component is missing yields `None`;
/// otherwise the present components are summed.
pub fn renewable_generation(table: &EnergyTable) -> Vec<Option<f32>> {
    table.records.iter().map(combined_renewable).collect()
}

fn combined_renewable(r: &EnergyRecord) -> Option<f32> {
    let wind = match (r.wind_onshore_generation_mw, r.wind_offshore_generation_mw) {
        (None, None) => r.wind_generation_mw,
        (on, off) => Some(on.unwrap_or(0.0) + off.unwrap_or(0.0)),
    };
    match (r.solar_generation_mw, wind) {
        (None, None) => None,
        (solar, wind) => Some(solar.unwrap_or(0.0) + wind.unwrap_or(0.0)),
    }
}

/// Applies the missing-data policy to an optional series.
///
/// # Errors
///
/// Returns [`FeatureError::Empty`] if no observation survives.
pub fn apply_fill(series: &[Option<f32>], policy: FillPolicy) -> Result<DenseSeries, FeatureError> {
    let mut values = Vec::with_capacity(series.len());
    let mut index_map = Vec::with_capacity(series.len());
    let mut filled = 0usize;
    let mut carry: Option<f32> = None;

    for (i, v) in series.iter().enumerate() {
        match (*v, policy) {
            (Some(v), _) => {
                carry = Some(v);
                values.push(v);
                index_map.push(i);
            }
            (None, FillPolicy::Forward) => {
                // Never invents data before the first observation.
                if let Some(c) = carry {
                    values.push(c);
                    index_map.push(i);
                    filled += 1;
                }
            }
            (None, FillPolicy::Drop) => {}
        }
    }

    if values.is_empty() {
        return Err(FeatureError::Empty);
    }
    Ok(DenseSeries {
        values,
        index_map,
        filled,
    })
}

/// First differences: `ramp[i] = series[i+1] - series[i]`, length N−1.
pub fn ramp_rates(series: &[f32]) -> Vec<f32> {
    series.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Chronological split boundary: the first `fraction` of the series is the
/// training portion.
///
/// # Errors
///
/// Returns [`FeatureError::BadSplit`] unless `0 < fraction < 1`.
pub fn train_val_split(len: usize, fraction: f32) -> Result<usize, FeatureError> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(FeatureError::BadSplit(fraction));
    }
    Ok(((len as f32) * fraction).floor() as usize)
}

/// Min-max scaler mapping the fitted range onto [0, 1].
///
/// Fit statistics must come from the training portion only so that the
/// validation split never leaks into them.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxScaler {
    min: f32,
    max: f32,
}

impl MinMaxScaler {
    /// Fits the scaler on a series.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Empty`] for an empty series and
    /// [`FeatureError::DegenerateRange`] for a constant one.
    pub fn fit(values: &[f32]) -> Result<Self, FeatureError> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if values.is_empty() {
            return Err(FeatureError::Empty);
        }
        if min == max {
            return Err(FeatureError::DegenerateRange { value: min });
        }
        Ok(Self { min, max })
    }

    pub fn transform(&self, v: f32) -> f32 {
        (v - self.min) / (self.max - self.min)
    }

    pub fn transform_all(&self, values: &[f32]) -> Vec<f32> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    pub fn inverse(&self, v: f32) -> f32 {
        v * (self.max - self.min) + self.min
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::dataset::{ColumnPresence, EnergyRecord, EnergyTable};

    fn table_with(rows: Vec<(Option<f32>, Option<f32>, Option<f32>, Option<f32>)>) -> EnergyTable {
        let t0 = Utc.with_ymd_and_hms(2015, 6, 1, 0, 0, 0).unwrap();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (solar, on, off, total))| {
                let mut r = EnergyRecord::empty(t0 + Duration::minutes(15 * i as i64));
                r.solar_generation_mw = solar;
                r.wind_onshore_generation_mw = on;
                r.wind_offshore_generation_mw = off;
                r.wind_generation_mw = total;
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
    fn renewable_sums_solar_and_wind_split() {
        let table = table_with(vec![(Some(100.0), Some(50.0), Some(25.0), None)]);
        assert_eq!(renewable_generation(&table), vec![Some(175.0)]);
    }

    #[test]
    fn renewable_falls_back_to_aggregate_wind() {
        let table = table_with(vec![(Some(100.0), None, None, Some(80.0))]);
        assert_eq!(renewable_generation(&table), vec![Some(180.0)]);
    }

    #[test]
    fn renewable_partial_components_sum() {
        let table = table_with(vec![(None, Some(50.0), None, None)]);
        assert_eq!(renewable_generation(&table), vec![Some(50.0)]);
    }

    #[test]
    fn renewable_all_missing_is_none() {
        let table = table_with(vec![(None, None, None, None)]);
        assert_eq!(renewable_generation(&table), vec![None]);
    }

    #[test]
    fn forward_fill_carries_last_value() {
        let dense =
            apply_fill(&[Some(1.0), None, None, Some(4.0)], FillPolicy::Forward).expect("fill");
        assert_eq!(dense.values, vec![1.0, 1.0, 1.0, 4.0]);
        assert_eq!(dense.index_map, vec![0, 1, 2, 3]);
        assert_eq!(dense.filled, 2);
    }

    #[test]
    fn forward_fill_drops_leading_gap() {
        let dense = apply_fill(&[None, None, Some(3.0), None], FillPolicy::Forward).expect("fill");
        assert_eq!(dense.values, vec![3.0, 3.0]);
        assert_eq!(dense.index_map, vec![2, 3]);
        assert_eq!(dense.filled, 1);
    }

    #[test]
    fn drop_policy_keeps_only_observations() {
        let dense = apply_fill(&[None, Some(2.0), None, Some(4.0)], FillPolicy::Drop).expect("fill");
        assert_eq!(dense.values, vec![2.0, 4.0]);
        assert_eq!(dense.index_map, vec![1, 3]);
        assert_eq!(dense.filled, 0);
    }

    #[test]
    fn all_missing_is_an_error() {
        assert!(matches!(
            apply_fill(&[None, None], FillPolicy::Forward),
            Err(FeatureError::Empty)
        ));
    }

    #[test]
    fn ramp_rates_are_first_differences() {
        let ramps = ramp_rates(&[1.0, 4.0, 2.0, 2.0]);
        assert_eq!(ramps, vec![3.0, -2.0, 0.0]);
    }

    #[test]
    fn ramp_rates_of_short_series_are_empty() {
        assert!(ramp_rates(&[1.0]).is_empty());
        assert!(ramp_rates(&[]).is_empty());
    }

    #[test]
    fn scaler_roundtrip_within_tolerance() {
        let values = vec![10.0, 55.0, 20.0, 90.0, 42.0];
        let scaler = MinMaxScaler::fit(&values).expect("fit");
        for &v in &values {
            let scaled = scaler.transform(v);
            assert!((0.0..=1.0).contains(&scaled), "scaled {scaled} out of range");
            assert!((scaler.inverse(scaled) - v).abs() < 1e-3);
        }
    }

    #[test]
    fn scaler_rejects_constant_series() {
        assert!(matches!(
            MinMaxScaler::fit(&[5.0, 5.0, 5.0]),
            Err(FeatureError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn scaler_rejects_empty_series() {
        assert!(matches!(MinMaxScaler::fit(&[]), Err(FeatureError::Empty)));
    }

    #[test]
    fn scaling_uses_training_stats_only() {
        // Validation values outside the training range map outside [0, 1]
        // rather than silently refitting.
        let train = vec![0.0, 10.0];
        let scaler = MinMaxScaler::fit(&train).expect("fit");
        assert!(scaler.transform(20.0) > 1.0);
        assert!((scaler.inverse(scaler.transform(20.0)) - 20.0).abs() < 1e-3);
    }

    #[test]
    fn split_boundary_is_proportional() {
        assert_eq!(train_val_split(100, 0.8).expect("split"), 80);
        assert_eq!(train_val_split(10, 0.5).expect("split"), 5);
    }

    #[test]
    fn split_rejects_out_of_range_fraction() {
        assert!(train_val_split(100, 0.0).is_err());
        assert!(train_val_split(100, 1.0).is_err());
        assert!(train_val_split(100, -0.5).is_err());
    }
}
