//! Append-only in-memory vector index with exact nearest-neighbour search.
//!
//! Distance is squared Euclidean; lower scores rank first. Entries are
//! identified by insertion position and never removed. Equal distances keep
//! insertion order.

use std::sync::{PoisonError, RwLock};

use ferrocast_core::Document;
use serde::Serialize;

use crate::embedder::Embedding;
use crate::RagError;

/// One search result. `score` is the squared Euclidean distance to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub document: Document,
    pub score: f32,
}

#[derive(Debug)]
struct IndexEntry {
    embedding: Embedding,
    document: Document,
}

#[derive(Debug)]
pub struct VectorStore {
    dimension: usize,
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `embeddings[i]` paired with `documents[i]`.
    ///
    /// All inputs are validated before anything is written, so a failed call
    /// leaves the store unchanged. Returns the number of entries added.
    pub fn add(
        &self,
        embeddings: Vec<Embedding>,
        documents: Vec<Document>,
    ) -> Result<usize, RagError> {
        if embeddings.len() != documents.len() {
            return Err(RagError::CountMismatch {
                embeddings: embeddings.len(),
                documents: documents.len(),
            });
        }
        if let Some((index, embedding)) = embeddings
            .iter()
            .enumerate()
            .find(|(_, embedding)| embedding.len() != self.dimension)
        {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
                index,
            });
        }
        if let Some(index) = embeddings
            .iter()
            .position(|embedding| embedding.iter().any(|value| !value.is_finite()))
        {
            return Err(RagError::NonFiniteEmbedding { index });
        }

        let added = embeddings.len();
        if added == 0 {
            return Ok(0);
        }

        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.extend(
            embeddings
                .into_iter()
                .zip(documents)
                .map(|(embedding, document)| IndexEntry {
                    embedding,
                    document,
                }),
        );
        tracing::debug!(added, total = entries.len(), "indexed embeddings");
        Ok(added)
    }

    /// The `min(k, len)` entries nearest to `query`, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        if query.len() != self.dimension {
            return Err(RagError::QueryDimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        if entries.is_empty() {
            return Err(RagError::EmptyStore);
        }

        let mut ranked: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (position, squared_distance(query, &entry.embedding)))
            .collect();
        // Stable sort: ties stay in insertion order.
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(position, score)| SearchHit {
                document: entries[position].document.clone(),
                score,
            })
            .collect())
    }
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
