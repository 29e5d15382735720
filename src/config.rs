//! TOML-based analysis configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::features::FillPolicy;
use crate::model::net::ForecastNetConfig;

/// Top-level analysis configuration parsed from TOML.
///
/// All fields have defaults matching the standard OPSD run. Load from TOML
/// with [`AnalysisConfig::from_toml_file`] or use [`AnalysisConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Input dataset location.
    pub data: DataConfig,
    /// Feature pipeline parameters.
    pub features: FeatureConfig,
    /// Network architecture parameters.
    pub model: ModelConfig,
    /// Training loop parameters.
    pub training: TrainingConfig,
}

/// Input dataset location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Path to the OPSD 15-minute CSV.
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "data/time_series_15min_singleindex.csv".to_string(),
        }
    }
}

/// Feature pipeline parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Missing-value policy: `"forward"` (fill) or `"drop"`.
    pub fill: String,
    /// Fraction of the series used for training (rest is validation).
    pub train_fraction: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fill: "forward".to_string(),
            train_fraction: 0.8,
        }
    }
}

impl FeatureConfig {
    /// The parsed policy; call only after validation.
    pub fn fill_policy(&self) -> FillPolicy {
        if self.fill == "drop" {
            FillPolicy::Drop
        } else {
            FillPolicy::Forward
        }
    }
}

/// Network architecture parameters.
///
/// The layer layout itself is fixed (two recurrent layers with dropout and a
/// linear head); only the sizes are configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Look-back window length in 15-minute steps (96 = one day).
    pub lookback: usize,
    /// Hidden units per recurrent layer.
    pub hidden_size: usize,
    /// Dropout rate after each recurrent layer.
    pub dropout: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            lookback: 96,
            hidden_size: 50,
            dropout: 0.2,
        }
    }
}

impl ModelConfig {
    pub fn net_config(&self) -> ForecastNetConfig {
        ForecastNetConfig::new(self.lookback)
            .with_hidden_size(self.hidden_size)
            .with_dropout(self.dropout)
    }
}

/// Training loop parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Maximum passes over the training windows.
    pub epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    /// Fixed Adam learning rate.
    pub learning_rate: f64,
    /// Epochs without validation improvement before stopping.
    pub patience: usize,
    /// Minimum validation loss decrease that counts as improvement.
    pub min_delta: f64,
    /// Seed for shuffling the training windows.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            learning_rate: 1e-3,
            patience: 5,
            min_delta: 1e-4,
            seed: 42,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"training.epochs"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl AnalysisConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.data.path.is_empty() {
            errors.push(ConfigError {
                field: "data.path".into(),
                message: "must not be empty".into(),
            });
        }

        let feat = &self.features;
        if feat.fill != "forward" && feat.fill != "drop" {
            errors.push(ConfigError {
                field: "features.fill".into(),
                message: format!("must be \"forward\" or \"drop\", got \"{}\"", feat.fill),
            });
        }
        if !(feat.train_fraction > 0.0 && feat.train_fraction < 1.0) {
            errors.push(ConfigError {
                field: "features.train_fraction".into(),
                message: "must lie strictly between 0 and 1".into(),
            });
        }

        let model = &self.model;
        if model.lookback == 0 {
            errors.push(ConfigError {
                field: "model.lookback".into(),
                message: "must be > 0".into(),
            });
        }
        if model.hidden_size == 0 {
            errors.push(ConfigError {
                field: "model.hidden_size".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..1.0).contains(&model.dropout) {
            errors.push(ConfigError {
                field: "model.dropout".into(),
                message: "must be in [0.0, 1.0)".into(),
            });
        }

        let t = &self.training;
        if t.epochs == 0 {
            errors.push(ConfigError {
                field: "training.epochs".into(),
                message: "must be > 0".into(),
            });
        }
        if t.batch_size == 0 {
            errors.push(ConfigError {
                field: "training.batch_size".into(),
                message: "must be > 0".into(),
            });
        }
        if t.learning_rate <= 0.0 {
            errors.push(ConfigError {
                field: "training.learning_rate".into(),
                message: "must be > 0".into(),
            });
        }
        if t.patience == 0 {
            errors.push(ConfigError {
                field: "training.patience".into(),
                message: "must be >= 1".into(),
            });
        }
        if t.min_delta < 0.0 {
            errors.push(ConfigError {
                field: "training.min_delta".into(),
                message: "must be >= 0".into(),
            });
        }

        errors
    }
}
