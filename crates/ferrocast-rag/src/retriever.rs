use std::sync::Arc;

use ferrocast_core::{Document, RagConfig};

use crate::embedder::Embedder;
use crate::store::{SearchHit, VectorStore};
use crate::RagError;

/// Embeds a query and searches the shared store with it.
#[derive(Debug, Clone)]
pub struct Retriever {
    embedder: Arc<Embedder>,
    store: Arc<VectorStore>,
    top_k: usize,
}

impl Retriever {
    /// Build an embedder and an empty store from `config`.
    pub fn from_config(config: &RagConfig) -> Result<Self, RagError> {
        let embedder = Embedder::new(config)?;
        let store = VectorStore::new(embedder.dimension());
        Ok(Self::new(Arc::new(embedder), Arc::new(store), config.top_k))
    }

    pub fn new(embedder: Arc<Embedder>, store: Arc<VectorStore>, top_k: usize) -> Self {
        Self {
            embedder,
            store,
            top_k,
        }
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed `documents` and append them to the store.
    pub fn index_documents(&self, documents: Vec<Document>) -> Result<usize, RagError> {
        let embeddings = self.embedder.embed_documents(&documents);
        let added = self.store.add(embeddings, documents)?;
        tracing::info!(added, total = self.store.len(), "indexed corpus documents");
        Ok(added)
    }

    /// At most `k` hits, best first, exactly as the store ranked them.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RagError> {
        let vector = self.embedder.embed(query);
        self.store.search(&vector, k)
    }

    pub fn retrieve_default(&self, query: &str) -> Result<Vec<SearchHit>, RagError> {
        self.retrieve(query, self.top_k)
    }
}
