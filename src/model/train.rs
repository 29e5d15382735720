//! Training loop: mini-batch Adam on MSE with early stopping.

use std::fmt;

use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::{ElementConversion, Tensor, TensorData};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::TrainingConfig;
use crate::model::net::{ForecastNet, ForecastNetConfig};
use crate::model::ModelError;
use crate::window::WindowGenerator;

/// Per-epoch loss record.
#[derive(Debug, Clone, Copy)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub train_loss: f32,
    pub val_loss: f32,
}

/// Result of a training run.
///
/// The model carries the weights of the best validation epoch, not the last
/// one. Divergence is a quality flag, not an error.
#[derive(Debug)]
pub struct TrainingOutcome<B: Backend> {
    pub model: ForecastNet<B>,
    pub history: Vec<EpochStats>,
    /// Epoch whose weights were kept (0 when no epoch improved on the
    /// untrained network).
    pub best_epoch: usize,
    pub best_val_loss: f32,
    pub stopped_early: bool,
    pub diverged: bool,
}

impl<B: Backend> fmt::Display for TrainingOutcome<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Training Report ---")?;
        writeln!(f, "Epochs run:        {}", self.history.len())?;
        writeln!(f, "Best epoch:        {}", self.best_epoch)?;
        writeln!(f, "Best val MSE:      {:.6}", self.best_val_loss)?;
        if let Some(last) = self.history.last() {
            writeln!(f, "Final train MSE:   {:.6}", last.train_loss)?;
        }
        writeln!(f, "Stopped early:     {}", self.stopped_early)?;
        write!(f, "Diverged:          {}", self.diverged)
    }
}

/// Trains the network on a scaled series split.
///
/// `train_series` and `val_series` are already scaled; `val_series` should
/// include the last `lookback` training points as history so its first target
/// is the first held-out value.
///
/// # Errors
///
/// Returns [`ModelError::NotEnoughData`] when either split yields no window,
/// and [`ModelError::ZeroLookback`] for a zero look-back length.
pub fn fit<B: AutodiffBackend>(
    train_series: &[f32],
    val_series: &[f32],
    net_config: &ForecastNetConfig,
    cfg: &TrainingConfig,
    device: &B::Device,
) -> Result<TrainingOutcome<B::InnerBackend>, ModelError> {
    let lookback = net_config.lookback;
    let train_windows = WindowGenerator::new(train_series, lookback)?;
    let val_windows = WindowGenerator::new(val_series, lookback)?;
    if train_windows.is_empty() {
        return Err(ModelError::NotEnoughData {
            needed: lookback + 1,
            got: train_series.len(),
        });
    }
    if val_windows.is_empty() {
        return Err(ModelError::NotEnoughData {
            needed: lookback + 1,
            got: val_series.len(),
        });
    }

    let samples: Vec<(&[f32], f32)> = train_windows.iter().collect();
    let (val_x, val_y) = batch_all::<B::InnerBackend>(&val_windows, device);

    let mut model = net_config.init::<B>(device);
    let mut optim = AdamConfig::new().init();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut order: Vec<usize> = (0..samples.len()).collect();

    let mut history = Vec::new();
    let mut best_model = model.valid();
    let mut best_val_loss = f32::INFINITY;
    let mut best_epoch = 0usize;
    let mut stale = 0usize;
    let mut stopped_early = false;
    let mut diverged = false;

    info!(
        windows = samples.len(),
        lookback,
        epochs = cfg.epochs,
        "training forecast network"
    );

    for epoch in 1..=cfg.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;
        for chunk in order.chunks(cfg.batch_size) {
            let (x, y) = batch_indices::<B>(&samples, chunk, lookback, device);
            let prediction = model.forward(x);
            let loss = MseLoss::new().forward(prediction, y, Reduction::Mean);
            let batch_loss: f32 = loss.clone().into_scalar().elem();
            loss_sum += f64::from(batch_loss);
            batches += 1;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }
        let train_loss = (loss_sum / batches.max(1) as f64) as f32;

        // Validation runs on the inner backend: no autodiff, dropout inert.
        let inference = model.valid();
        let val_prediction = inference.forward(val_x.clone());
        let val_loss: f32 = MseLoss::new()
            .forward(val_prediction, val_y.clone(), Reduction::Mean)
            .into_scalar()
            .elem();

        info!(epoch, train_loss, val_loss, "epoch complete");
        history.push(EpochStats {
            epoch,
            train_loss,
            val_loss,
        });

        if !train_loss.is_finite() || !val_loss.is_finite() {
            warn!(epoch, "loss diverged; stopping training");
            diverged = true;
            break;
        }

        if f64::from(val_loss) + cfg.min_delta < f64::from(best_val_loss) {
            best_val_loss = val_loss;
            best_model = inference;
            best_epoch = epoch;
            stale = 0;
        } else {
            stale += 1;
            if stale >= cfg.patience {
                info!(
                    epoch,
                    best_epoch, "validation loss stopped improving; early stop"
                );
                stopped_early = true;
                break;
            }
        }
    }

    Ok(TrainingOutcome {
        model: best_model,
        history,
        best_epoch,
        best_val_loss,
        stopped_early,
        diverged,
    })
}

/// Runs the trained network over every window of a scaled series.
///
/// Predictions align with targets: output `i` predicts `series[lookback + i]`.
///
/// # Errors
///
/// Returns [`ModelError::NotEnoughData`] when the series yields no window.
pub fn predict<B: Backend>(
    model: &ForecastNet<B>,
    series: &[f32],
    lookback: usize,
    batch_size: usize,
    device: &B::Device,
) -> Result<Vec<f32>, ModelError> {
    let windows = WindowGenerator::new(series, lookback)?;
    if windows.is_empty() {
        return Err(ModelError::NotEnoughData {
            needed: lookback + 1,
            got: series.len(),
        });
    }

    let samples: Vec<(&[f32], f32)> = windows.iter().collect();
    let indices: Vec<usize> = (0..samples.len()).collect();
    let mut out = Vec::with_capacity(samples.len());

    for chunk in indices.chunks(batch_size.max(1)) {
        let (x, _) = batch_indices::<B>(&samples, chunk, lookback, device);
        let prediction = model.forward(x);
        let values = prediction
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| ModelError::TensorRead(format!("{e:?}")))?;
        out.extend(values);
    }
    Ok(out)
}

/// All windows of a generator as one `[n, lookback, 1]` / `[n, 1]` pair.
fn batch_all<B: Backend>(
    windows: &WindowGenerator<'_>,
    device: &B::Device,
) -> (Tensor<B, 3>, Tensor<B, 2>) {
    let n = windows.len();
    let lookback = windows.lookback();
    let mut xs = Vec::with_capacity(n * lookback);
    let mut ys = Vec::with_capacity(n);
    for (w, y) in windows.iter() {
        xs.extend_from_slice(w);
        ys.push(y);
    }
    (
        Tensor::from_data(TensorData::new(xs, [n, lookback, 1]), device),
        Tensor::from_data(TensorData::new(ys, [n, 1]), device),
    )
}

/// The selected samples as one `[len, lookback, 1]` / `[len, 1]` pair.
fn batch_indices<B: Backend>(
    samples: &[(&[f32], f32)],
    chunk: &[usize],
    lookback: usize,
    device: &B::Device,
) -> (Tensor<B, 3>, Tensor<B, 2>) {
    let mut xs = Vec::with_capacity(chunk.len() * lookback);
    let mut ys = Vec::with_capacity(chunk.len());
    for &i in chunk {
        let (w, y) = samples[i];
        xs.extend_from_slice(w);
        ys.push(y);
    }
    (
        Tensor::from_data(TensorData::new(xs, [chunk.len(), lookback, 1]), device),
        Tensor::from_data(TensorData::new(ys, [chunk.len(), 1]), device),
    )
}
