//! Fixed-length look-back windows over a scaled series.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("look-back length must be > 0")]
    ZeroLookback,
}

/// Lazy generator of `(window, target)` training samples.
///
/// For a series of length N and look-back L it yields exactly `N − L` pairs
/// `(&series[t-L..t], series[t])`; the first L points cannot form a full
/// window and are skipped. The generator is restartable: call [`iter`] once
/// per epoch.
///
/// [`iter`]: WindowGenerator::iter
#[derive(Debug, Clone, Copy)]
pub struct WindowGenerator<'a> {
    series: &'a [f32],
    lookback: usize,
}

impl<'a> WindowGenerator<'a> {
    /// # Errors
    ///
    /// Returns [`WindowError::ZeroLookback`] when `lookback == 0`. A series
    /// shorter than `lookback + 1` is not an error; the generator is empty.
    pub fn new(series: &'a [f32], lookback: usize) -> Result<Self, WindowError> {
        if lookback == 0 {
            return Err(WindowError::ZeroLookback);
        }
        Ok(Self { series, lookback })
    }

    /// Number of samples the generator yields.
    pub fn len(&self) -> usize {
        self.series.len().saturating_sub(self.lookback)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Iterates over `(window, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'a [f32], f32)> + '_ {
        let series = self.series;
        let lookback = self.lookback;
        (lookback..series.len()).map(move |t| (&series[t - lookback..t], series[t]))
    }
}
