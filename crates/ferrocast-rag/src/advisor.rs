//! Advisory synthesis over retrieved documents.
//!
//! [`Advisor`] is the pluggable seam between retrieval and presentation. An
//! implementation may summarise with templates or call out to a generation
//! service, but it must only speak from the hits it is given and must answer
//! with [`INSUFFICIENT_CONTEXT`] when there are none.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::retriever::Retriever;
use crate::store::SearchHit;
use crate::text::TextSplitter;
use crate::RagError;

/// Response text used whenever no documents were retrieved.
pub const INSUFFICIENT_CONTEXT: &str = "Insufficient context: no documents in the knowledge base \
     matched this question, so no grounded analysis can be given.";

/// Words too common to count as a query match.
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "by", "can", "do", "does", "for", "from",
    "how", "in", "is", "it", "of", "on", "or", "should", "that", "the", "this", "to", "what",
    "when", "which", "who", "why", "will", "with",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub text: String,
    /// Ids of the documents the text draws on, in rank order.
    pub sources: Vec<String>,
    /// `false` only for the insufficient-context response.
    pub grounded: bool,
}

impl Advisory {
    pub fn insufficient_context() -> Self {
        Self {
            text: INSUFFICIENT_CONTEXT.to_owned(),
            sources: Vec::new(),
            grounded: false,
        }
    }
}

pub trait Advisor: Send + Sync {
    fn name(&self) -> &str;

    fn analyze(&self, query: &str, hits: &[SearchHit]) -> Result<Advisory, RagError>;
}

/// Quotes the retrieved sentences that share the most words with the query.
#[derive(Debug, Clone)]
pub struct TemplateAdvisor {
    max_excerpts: usize,
    splitter: TextSplitter,
}

struct Excerpt<'a> {
    overlap: usize,
    rank: usize,
    source: &'a str,
    sentence: &'a str,
}

impl TemplateAdvisor {
    pub const DEFAULT_MAX_EXCERPTS: usize = 4;

    pub fn new() -> Result<Self, RagError> {
        Self::with_max_excerpts(Self::DEFAULT_MAX_EXCERPTS)
    }

    pub fn with_max_excerpts(max_excerpts: usize) -> Result<Self, RagError> {
        Ok(Self {
            max_excerpts: max_excerpts.max(1),
            splitter: TextSplitter::new()?,
        })
    }

    fn query_terms(&self, query: &str) -> BTreeSet<String> {
        self.splitter
            .words(query)
            .into_iter()
            .filter(|word| !STOP_WORDS.contains(&word.as_str()))
            .collect()
    }

    fn excerpts<'a>(&self, terms: &BTreeSet<String>, hits: &'a [SearchHit]) -> Vec<Excerpt<'a>> {
        let mut excerpts = Vec::new();
        for (rank, hit) in hits.iter().enumerate() {
            for sentence in self.splitter.sentences(hit.document.text()) {
                let words: BTreeSet<String> = self.splitter.words(sentence).into_iter().collect();
                excerpts.push(Excerpt {
                    overlap: terms.intersection(&words).count(),
                    rank,
                    source: hit.document.id(),
                    sentence,
                });
            }
        }

        if excerpts.iter().any(|excerpt| excerpt.overlap > 0) {
            excerpts.retain(|excerpt| excerpt.overlap > 0);
            // Stable: equal overlap keeps rank then sentence order.
            excerpts.sort_by(|a, b| b.overlap.cmp(&a.overlap));
        } else {
            // Nothing overlaps; lead with each document's opening sentence.
            excerpts.sort_by_key(|excerpt| excerpt.rank);
            excerpts.dedup_by_key(|excerpt| excerpt.rank);
        }
        excerpts.truncate(self.max_excerpts);
        excerpts
    }
}

impl Advisor for TemplateAdvisor {
    fn name(&self) -> &str {
        "template"
    }

    fn analyze(&self, query: &str, hits: &[SearchHit]) -> Result<Advisory, RagError> {
        if hits.is_empty() {
            return Ok(Advisory::insufficient_context());
        }

        let terms = self.query_terms(query);
        let excerpts = self.excerpts(&terms, hits);

        let mut sources: Vec<String> = Vec::with_capacity(hits.len());
        for hit in hits {
            let id = hit.document.id();
            if !sources.iter().any(|seen| seen == id) {
                sources.push(id.to_owned());
            }
        }

        let mut text = format!(
            "Analysis for \"{}\" based on {} retrieved document(s):\n",
            query.trim(),
            hits.len()
        );
        if excerpts.is_empty() {
            // Retrieved documents had no sentences at all.
            text.push_str("- The retrieved documents contain no quotable text.\n");
        }
        for excerpt in &excerpts {
            text.push_str(&format!("- [{}] {}\n", excerpt.source, excerpt.sentence));
        }
        text.push_str(&format!("Sources: {}", sources.join(", ")));

        tracing::debug!(
            excerpts = excerpts.len(),
            sources = sources.len(),
            "composed template advisory"
        );

        Ok(Advisory {
            text,
            sources,
            grounded: true,
        })
    }
}

/// An advisory and the hits it was written from, in rank order.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub advisory: Advisory,
    pub hits: Vec<SearchHit>,
}

/// Retrieve `k` documents for `query` and hand them to `advisor`.
///
/// An empty store counts as zero retrieved documents.
pub fn advise(
    retriever: &Retriever,
    advisor: &dyn Advisor,
    query: &str,
    k: usize,
) -> Result<Consultation, RagError> {
    let hits = match retriever.retrieve(query, k) {
        Ok(hits) => hits,
        Err(RagError::EmptyStore) => {
            tracing::warn!("advisory requested against an empty corpus");
            Vec::new()
        }
        Err(error) => return Err(error),
    };
    let advisory = advisor.analyze(query, &hits)?;
    Ok(Consultation { advisory, hits })
}
