//! Next-step renewable generation forecasting.

pub mod artifact;
pub mod baseline;
pub mod net;
pub mod train;

pub use baseline::PersistenceForecast;
pub use net::{ForecastNet, ForecastNetConfig};
pub use train::{fit, predict, EpochStats, TrainingOutcome};

use thiserror::Error;

use crate::window::WindowError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("look-back length must be > 0")]
    ZeroLookback,
    #[error("not enough data: need at least {needed} points, got {got}")]
    NotEnoughData { needed: usize, got: usize },
    #[error("cannot read model output tensor: {0}")]
    TensorRead(String),
    #[error("cannot save model weights to \"{path}\": {message}")]
    Save { path: String, message: String },
    #[error("cannot load model weights from \"{path}\": {message}")]
    Load { path: String, message: String },
}

impl From<WindowError> for ModelError {
    fn from(e: WindowError) -> Self {
        match e {
            WindowError::ZeroLookback => Self::ZeroLookback,
        }
    }
}
