use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::config::StemmerKind;
use crate::stemmer::{self, Stemmer, SuffixStemmer};

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-z]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its",
            "of","on","that","the","to","was","were","will","with",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Turns text into the ordered term sequence used both at index time and at query time.
/// Implementations must be deterministic and free of side effects.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> Vec<String>;
}

/// NFKC, lowercase, `[a-z]+` runs, stemming, then stopword removal on the stems.
pub struct Analyzer {
    stemmer: Box<dyn Stemmer>,
}

impl Analyzer {
    pub fn new(stemmer: Box<dyn Stemmer>) -> Self { Self { stemmer } }

    pub fn with_kind(kind: StemmerKind) -> Self { Self::new(stemmer::from_kind(kind)) }
}

impl Default for Analyzer {
    fn default() -> Self { Self::new(Box::new(SuffixStemmer::default())) }
}

impl Normalizer for Analyzer {
    fn normalize(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() { return Vec::new(); }
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        RE.find_iter(&normalized)
            .map(|m| m.as_str())
            .map(|token| self.stemmer.stem(token))
            .filter(|term| !term.is_empty() && !is_stopword(term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_normalize() {
        let t = Analyzer::default().normalize("Building a Search Engine");
        assert_eq!(t, vec!["build", "search", "engine"]);
    }

    #[test]
    fn stems_that_are_stopwords_are_dropped() {
        let t = Analyzer::default().normalize("ins ons ass pins");
        assert!(t.iter().all(|term| !is_stopword(term)));
        assert_eq!(t, vec!["pin"]);
    }

    #[test]
    fn blank_text_has_no_terms() {
        assert!(Analyzer::default().normalize("   ").is_empty());
        assert!(Analyzer::default().normalize("the a of").is_empty());
    }
}
