use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrocast_core::ValidationError),

    #[error(transparent)]
    Config(#[from] ferrocast_core::CoreError),

    #[error("market data error: {0}")]
    Source(#[from] ferrocast_core::SourceError),

    #[error("forecast error: {0}")]
    Forecast(#[from] ferrocast_ml::ForecastError),

    #[error("retrieval error: {0}")]
    Rag(#[from] ferrocast_rag::RagError),

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::Source(_) => 3,
            Self::Serialization(_) => 4,
            Self::StrictModeViolation { .. } => 5,
            Self::Forecast(_) => 6,
            Self::Rag(_) => 7,
            Self::Io(_) => 10,
        }
    }
}
