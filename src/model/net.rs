//! The forecast network.
//!
//! Fixed architecture: LSTM → dropout → LSTM (final step only) → dropout →
//! single linear output unit. Input is a univariate scaled series shaped
//! `[batch, lookback, 1]`; output is one next-step value per sample.

use burn::config::Config;
use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Lstm, LstmConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

#[derive(Config, Debug)]
pub struct ForecastNetConfig {
    /// Look-back window length the network expects.
    pub lookback: usize,
    /// Hidden units per recurrent layer.
    #[config(default = 50)]
    pub hidden_size: usize,
    /// Dropout rate applied after each recurrent layer.
    #[config(default = 0.2)]
    pub dropout: f64,
}

impl ForecastNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ForecastNet<B> {
        ForecastNet {
            lstm1: LstmConfig::new(1, self.hidden_size, true).init(device),
            dropout1: DropoutConfig::new(self.dropout).init(),
            lstm2: LstmConfig::new(self.hidden_size, self.hidden_size, true).init(device),
            dropout2: DropoutConfig::new(self.dropout).init(),
            head: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct ForecastNet<B: Backend> {
    lstm1: Lstm<B>,
    dropout1: Dropout,
    lstm2: Lstm<B>,
    dropout2: Dropout,
    head: Linear<B>,
}

impl<B: Backend> ForecastNet<B> {
    /// Runs the network on a batch of windows shaped `[batch, lookback, 1]`,
    /// producing `[batch, 1]` next-step predictions.
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (sequence, _) = self.lstm1.forward(input, None);
        let sequence = self.dropout1.forward(sequence);
        // Only the final hidden state of the second layer feeds the head.
        let (_, state) = self.lstm2.forward(sequence, None);
        let hidden = self.dropout2.forward(state.hidden);
        self.head.forward(hidden)
    }
}
