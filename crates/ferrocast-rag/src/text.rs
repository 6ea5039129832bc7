//! Sentence splitting and word tokenisation shared by the embedder and the
//! template advisor.

use regex::Regex;

#[derive(Debug, Clone)]
pub(crate) struct TextSplitter {
    sentence_break: Regex,
    word: Regex,
}

impl TextSplitter {
    pub(crate) fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            // Terminal punctuation followed by whitespace or end of text, or a
            // line break. Keeps decimals like "3.5" inside one sentence.
            sentence_break: Regex::new(r"[.!?]+(?:\s+|$)|\r?\n")?,
            word: Regex::new(r"[\p{L}\p{N}]+(?:['.\-][\p{L}\p{N}]+)*")?,
        })
    }

    /// Non-empty, trimmed sentences in order of appearance.
    pub(crate) fn sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.sentence_break
            .split(text)
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }

    /// Lowercased word tokens.
    pub(crate) fn words(&self, text: &str) -> Vec<String> {
        self.word
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation_and_newlines() {
        let splitter = TextSplitter::new().expect("patterns");
        let sentences = splitter.sentences("UPI grew 3.5x. Why?\nCards slowed!  ");
        assert_eq!(sentences, vec!["UPI grew 3.5x", "Why", "Cards slowed"]);
    }

    #[test]
    fn words_are_lowercased() {
        let splitter = TextSplitter::new().expect("patterns");
        assert_eq!(
            splitter.words("NBFC's Q3 non-performing assets"),
            vec!["nbfc's", "q3", "non-performing", "assets"]
        );
    }
}
