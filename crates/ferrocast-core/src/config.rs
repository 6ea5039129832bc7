//! Engine configuration.
//!
//! Everything the engines need is passed in explicitly through these structs.
//! Defaults match the shipped corpus and daily bar history; a YAML file can
//! override any subset:
//!
//! ```yaml
//! rag:
//!   vector_dim: 256
//!   top_k: 5
//! forecast:
//!   train_ratio: 0.75
//!   features:
//!     ma_windows: [10, 30]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, ValidationError};

/// Retrieval settings (embedding width, default result count, chunking limit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub vector_dim: usize,
    pub top_k: usize,
    pub max_sentences: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            vector_dim: 384,
            top_k: 3,
            max_sentences: 20,
        }
    }
}

impl RagConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.vector_dim == 0 {
            return Err(invalid("rag.vector_dim must be greater than zero"));
        }
        if self.top_k == 0 {
            return Err(invalid("rag.top_k must be greater than zero"));
        }
        if self.max_sentences == 0 {
            return Err(invalid("rag.max_sentences must be greater than zero"));
        }
        Ok(())
    }
}

/// Indicator windows used to build feature vectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Simple moving average windows, at least two distinct lengths.
    pub ma_windows: Vec<usize>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub volatility_window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ma_windows: vec![5, 20, 50],
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            volatility_window: 20,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut windows = self.ma_windows.clone();
        windows.sort_unstable();
        windows.dedup();
        if windows.len() < 2 {
            return Err(invalid(
                "forecast.features.ma_windows needs at least two distinct windows",
            ));
        }
        if windows.contains(&0) {
            return Err(invalid("forecast.features.ma_windows must be positive"));
        }
        if windows.len() != self.ma_windows.len() {
            return Err(invalid("forecast.features.ma_windows must not repeat"));
        }
        if self.rsi_period == 0 {
            return Err(invalid("forecast.features.rsi_period must be positive"));
        }
        if self.macd_fast == 0 || self.macd_fast >= self.macd_slow {
            return Err(invalid(
                "forecast.features.macd_fast must be positive and below macd_slow",
            ));
        }
        if self.volatility_window < 2 {
            return Err(invalid(
                "forecast.features.volatility_window must be at least 2",
            ));
        }
        Ok(())
    }

    /// Number of history bars required before the first feature vector.
    pub fn lookback(&self) -> usize {
        self.ma_windows
            .iter()
            .copied()
            .chain([
                self.rsi_period,
                self.macd_slow,
                self.volatility_window,
                1,
            ])
            .max()
            .unwrap_or(1)
    }

    /// Width of every feature vector produced with this configuration.
    pub fn width(&self) -> usize {
        // close, volume, one SMA per window, rsi, macd, volatility, return_1
        2 + self.ma_windows.len() + 4
    }
}

/// Training and evaluation settings for the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub features: FeatureConfig,
    /// Fraction of labelled rows (oldest first) used for fitting.
    pub train_ratio: f64,
    pub min_train_samples: usize,
    pub min_test_samples: usize,
    pub ridge_lambda: f64,
    /// Forecast horizon used when a caller does not pick one.
    pub horizon_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            features: FeatureConfig::default(),
            train_ratio: 0.8,
            min_train_samples: 30,
            min_test_samples: 5,
            ridge_lambda: 1e-6,
            horizon_days: 5,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.features.validate()?;
        if !(self.train_ratio > 0.0 && self.train_ratio < 1.0) {
            return Err(invalid("forecast.train_ratio must be within (0, 1)"));
        }
        if self.min_train_samples == 0 || self.min_test_samples == 0 {
            return Err(invalid("forecast sample minimums must be positive"));
        }
        if !self.ridge_lambda.is_finite() || self.ridge_lambda < 0.0 {
            return Err(invalid("forecast.ridge_lambda must be finite and >= 0"));
        }
        if self.horizon_days == 0 {
            return Err(invalid("forecast.horizon_days must be positive"));
        }
        Ok(())
    }
}

/// Process-wide configuration handed to every engine constructor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rag: RagConfig,
    pub forecast: ForecastConfig,
}

impl EngineConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, CoreError> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded engine configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.rag.validate()?;
        self.forecast.validate()
    }
}

fn invalid(message: &str) -> ValidationError {
    ValidationError::InvalidConfig(message.to_owned())
}
