//! Weight serialization using the framework's native record format.

use std::path::Path;

use burn::module::Module;
use burn::record::{CompactRecorder, Recorder};
use burn::tensor::backend::Backend;

use crate::model::net::{ForecastNet, ForecastNetConfig};
use crate::model::ModelError;

/// Saves trained weights to `path` (the recorder appends its own extension).
///
/// # Errors
///
/// Returns [`ModelError::Save`] if the record cannot be written.
pub fn save_weights<B: Backend>(model: ForecastNet<B>, path: &Path) -> Result<(), ModelError> {
    model
        .save_file(path.to_path_buf(), &CompactRecorder::new())
        .map_err(|e| ModelError::Save {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Loads weights saved by [`save_weights`] into a freshly initialized network.
///
/// The architecture config must match the one used at save time.
///
/// # Errors
///
/// Returns [`ModelError::Load`] if the record cannot be read or does not fit
/// the architecture.
pub fn load_weights<B: Backend>(
    config: &ForecastNetConfig,
    path: &Path,
    device: &B::Device,
) -> Result<ForecastNet<B>, ModelError> {
    let record = CompactRecorder::new()
        .load(path.to_path_buf(), device)
        .map_err(|e| ModelError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(config.init::<B>(device).load_record(record))
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use burn::tensor::{Tensor, TensorData};

    use super::*;

    type B = NdArray;

    #[test]
    fn save_then_load_reproduces_predictions() {
        let device = Default::default();
        let config = ForecastNetConfig::new(6).with_hidden_size(4);
        let model = config.init::<B>(&device);

        let input = Tensor::<B, 3>::from_data(
            TensorData::new((0..12).map(|i| i as f32 * 0.05).collect::<Vec<_>>(), [2, 6, 1]),
            &device,
        );
        let before = model
            .forward(input.clone())
            .into_data()
            .to_vec::<f32>()
            .expect("read");

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("weights");
        save_weights(model, &path).expect("save");

        let restored = load_weights::<B>(&config, &path, &device).expect("load");
        let after = restored
            .forward(input)
            .into_data()
            .to_vec::<f32>()
            .expect("read");

        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-5, "weights changed across save/load");
        }
    }

    #[test]
    fn load_from_missing_path_errors() {
        let device = Default::default();
        let config = ForecastNetConfig::new(6).with_hidden_size(4);
        let err = load_weights::<B>(&config, Path::new("/nonexistent/weights"), &device)
            .unwrap_err();
        assert!(matches!(err, ModelError::Load { .. }));
    }
}
