//! Deterministic feature-hashing text embeddings.
//!
//! Every lowercased word adds `1.0` and every adjacent word pair adds `0.5` to
//! the bucket chosen by its FNV-1a hash, with the sign taken from a higher hash
//! bit so collisions tend to cancel rather than pile up. The result is L2
//! normalised; text without any word maps to the zero vector.
//!
//! Only the first `max_sentences` sentences of a text are embedded. Anything
//! after that is ignored.

use ferrocast_core::{Document, RagConfig};
use rayon::prelude::*;

use crate::text::TextSplitter;
use crate::RagError;

/// Embedding vector of width `RagConfig::vector_dim`.
pub type Embedding = Vec<f32>;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const UNIGRAM_WEIGHT: f32 = 1.0;
const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Embedder {
    dimension: usize,
    max_sentences: usize,
    splitter: TextSplitter,
}

impl Embedder {
    pub fn new(config: &RagConfig) -> Result<Self, RagError> {
        config.validate().map_err(RagError::Config)?;
        Ok(Self {
            dimension: config.vector_dim,
            max_sentences: config.max_sentences,
            splitter: TextSplitter::new()?,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn max_sentences(&self) -> usize {
        self.max_sentences
    }

    /// The sentences of `text` that contribute to its embedding.
    pub fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = self.splitter.sentences(text);
        sentences.truncate(self.max_sentences);
        sentences
    }

    pub fn embed(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0_f32; self.dimension];

        for sentence in self.sentences(text) {
            let words = self.splitter.words(sentence);
            for word in &words {
                self.accumulate(&mut vector, fnv1a(word.as_bytes()), UNIGRAM_WEIGHT);
            }
            for pair in words.windows(2) {
                let hash = fnv1a_parts(&[pair[0].as_bytes(), b" ", pair[1].as_bytes()]);
                self.accumulate(&mut vector, hash, BIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    /// Embed document texts in parallel. Output order matches input order.
    pub fn embed_documents(&self, documents: &[Document]) -> Vec<Embedding> {
        documents
            .par_iter()
            .map(|document| self.embed(document.text()))
            .collect()
    }

    fn accumulate(&self, vector: &mut [f32], hash: u64, weight: f32) {
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_parts(&[bytes])
}

fn fnv1a_parts(parts: &[&[u8]]) -> u64 {
    parts
        .iter()
        .flat_map(|part| part.iter())
        .fold(FNV_OFFSET, |hash, &byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}
