//! # Ferrocast RAG
//!
//! Retrieval-augmented advisories over a small fintech document corpus.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`embedder`] | Deterministic hashed embeddings with a sentence limit |
//! | [`store`] | Append-only vector index, exact squared-Euclidean search |
//! | [`retriever`] | Query embedding plus store search |
//! | [`advisor`] | `Advisor` strategy trait and the template implementation |
//! | [`ingest`] | Text report and CSV corpus loaders |
//!
//! ```rust
//! use ferrocast_core::{Document, RagConfig};
//! use ferrocast_rag::{advise, Retriever, TemplateAdvisor};
//!
//! let retriever = Retriever::from_config(&RagConfig::default()).unwrap();
//! retriever
//!     .index_documents(vec![
//!         Document::new("upi", "UPI volumes hit a record in March.").unwrap(),
//!         Document::new("nbfc", "NBFC lenders tightened underwriting.").unwrap(),
//!     ])
//!     .unwrap();
//!
//! let advisor = TemplateAdvisor::new().unwrap();
//! let consultation = advise(&retriever, &advisor, "How are UPI volumes trending?", 2).unwrap();
//! assert!(consultation.advisory.grounded);
//! assert_eq!(consultation.hits.len(), 2);
//! ```

pub mod advisor;
pub mod embedder;
pub mod error;
pub mod ingest;
pub mod retriever;
pub mod store;
mod text;

pub use advisor::{
    advise, Advisor, Advisory, Consultation, TemplateAdvisor, INSUFFICIENT_CONTEXT,
};
pub use embedder::{Embedder, Embedding};
pub use error::RagError;
pub use ingest::{load_corpus_dir, load_csv, load_text_report};
pub use retriever::Retriever;
pub use store::{SearchHit, VectorStore};
