use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// A corpus document. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    text: String,
    metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::with_metadata(id, text, BTreeMap::new())
    }

    pub fn with_metadata(
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyDocumentId);
        }
        Ok(Self {
            id,
            text: text.into(),
            metadata,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// First `max_chars` characters, with an ellipsis when cut.
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_ids() {
        assert_eq!(
            Document::new("  ", "text").expect_err("must fail"),
            ValidationError::EmptyDocumentId
        );
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let doc = Document::new("d1", "₹ rupee denominated returns").expect("doc");
        assert_eq!(doc.snippet(7), "₹ rupee...");
        assert_eq!(doc.snippet(100), "₹ rupee denominated returns");
    }
}
