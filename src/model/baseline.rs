//! Naive persistence baseline.

/// "Next step equals current step" forecaster, used as the floor any trained
/// model has to beat.
#[derive(Debug, Default, Clone, Copy)]
pub struct PersistenceForecast;

impl PersistenceForecast {
    /// One prediction per window target: for each target index `t` in
    /// `lookback..len`, predicts `series[t - 1]`.
    ///
    /// Returns an empty vector when the series is too short to form a window.
    pub fn forecast(&self, series: &[f32], lookback: usize) -> Vec<f32> {
        if lookback == 0 || series.len() <= lookback {
            return Vec::new();
        }
        series[lookback - 1..series.len() - 1].to_vec()
    }

    /// Mean squared error of the persistence forecast against the window
    /// targets, `None` when no window exists.
    pub fn mse(&self, series: &[f32], lookback: usize) -> Option<f32> {
        let predictions = self.forecast(series, lookback);
        if predictions.is_empty() {
            return None;
        }
        let targets = &series[lookback..];
        let sum: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(p, t)| f64::from(p - t) * f64::from(p - t))
            .sum();
        Some((sum / predictions.len() as f64) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_matches_window_count() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predictions = PersistenceForecast.forecast(&series, 2);
        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn short_series_yields_nothing() {
        assert!(PersistenceForecast.forecast(&[1.0, 2.0], 2).is_empty());
        assert!(PersistenceForecast.forecast(&[1.0], 5).is_empty());
        assert_eq!(PersistenceForecast.mse(&[1.0], 5), None);
    }

    #[test]
    fn mse_on_constant_series_is_zero() {
        let series = vec![3.0; 10];
        let mse = PersistenceForecast.mse(&series, 4).expect("mse");
        assert_eq!(mse, 0.0);
    }

    #[test]
    fn mse_matches_hand_computation() {
        // targets: [3, 5], predictions: [1, 3] -> errors 2, 2 -> mse 4
        let series = vec![1.0, 3.0, 5.0];
        let mse = PersistenceForecast.mse(&series, 1).expect("mse");
        assert!((mse - 4.0).abs() < 1e-6);
    }
}
