use ferrocast_core::ValidationError;
use thiserror::Error;

/// Errors returned by feature engineering, training and forecasting.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("insufficient data: need at least {required} bars, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("training failed: {0}")]
    Training(String),

    #[error("model not trained: {0}")]
    NotTrained(String),

    #[error("forecast horizon must be at least one day")]
    InvalidHorizon,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ForecastError {
    pub(crate) fn training(message: impl Into<String>) -> Self {
        Self::Training(message.into())
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "forecast.insufficient_data",
            Self::Training(_) => "forecast.training",
            Self::NotTrained(_) => "forecast.not_trained",
            Self::InvalidHorizon => "forecast.invalid_horizon",
            Self::Validation(_) => "forecast.validation",
        }
    }
}
