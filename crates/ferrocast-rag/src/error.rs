use std::path::PathBuf;

use ferrocast_core::ValidationError;
use thiserror::Error;

/// Errors returned by embedding, indexing, retrieval and ingestion.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("embedding {index} has dimension {actual}, store expects {expected}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        index: usize,
    },

    #[error("embedding {index} contains a non-finite value")]
    NonFiniteEmbedding { index: usize },

    #[error("query vector has dimension {actual}, store expects {expected}")]
    QueryDimensionMismatch { expected: usize, actual: usize },

    #[error("got {embeddings} embeddings for {documents} documents")]
    CountMismatch { embeddings: usize, documents: usize },

    #[error("vector store is empty; index documents before searching")]
    EmptyStore,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid document: {0}")]
    InvalidDocument(#[from] ValidationError),

    #[error("invalid retrieval config: {0}")]
    Config(ValidationError),

    #[error("invalid text pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl RagError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } | Self::QueryDimensionMismatch { .. } => {
                "rag.dimension_mismatch"
            }
            Self::NonFiniteEmbedding { .. } => "rag.non_finite_embedding",
            Self::CountMismatch { .. } => "rag.count_mismatch",
            Self::EmptyStore => "rag.empty_store",
            Self::Io { .. } => "rag.io",
            Self::Csv(_) => "rag.csv",
            Self::InvalidDocument(_) => "rag.invalid_document",
            Self::Config(_) => "rag.config",
            Self::Pattern(_) => "rag.pattern",
        }
    }
}
