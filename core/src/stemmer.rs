//! Stemming policies. The engine only sees a [`Stemmer`]; the rule table behind it is replaceable.

use rust_stemmers::Algorithm;

use crate::config::StemmerKind;

pub trait Stemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Default `(suffix, replacement)` table, in priority order.
pub const DEFAULT_SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "i"),
    ("sses", "ss"),
    ("s", ""),
    ("ing", ""),
    ("ed", ""),
    ("ly", ""),
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
];

/// Rewrites the first matching suffix. Words shorter than `min_len` are left alone.
#[derive(Debug, Clone)]
pub struct SuffixStemmer {
    rules: Vec<(String, String)>,
    min_len: usize,
}

impl SuffixStemmer {
    pub fn new<S: Into<String>>(rules: impl IntoIterator<Item = (S, S)>) -> Self {
        let rules = rules.into_iter().map(|(s, r)| (s.into(), r.into())).collect();
        Self { rules, min_len: 3 }
    }
}

impl Default for SuffixStemmer {
    fn default() -> Self { Self::new(DEFAULT_SUFFIX_RULES.iter().copied()) }
}

impl Stemmer for SuffixStemmer {
    fn stem(&self, word: &str) -> String {
        if word.chars().count() < self.min_len { return word.to_string(); }
        for (suffix, replacement) in &self.rules {
            if let Some(root) = word.strip_suffix(suffix.as_str()) {
                return format!("{root}{replacement}");
            }
        }
        word.to_string()
    }
}

/// Snowball English (Porter2).
pub struct PorterStemmer(rust_stemmers::Stemmer);

impl Default for PorterStemmer {
    fn default() -> Self { Self(rust_stemmers::Stemmer::create(Algorithm::English)) }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String { self.0.stem(word).into_owned() }
}

pub fn from_kind(kind: StemmerKind) -> Box<dyn Stemmer> {
    match kind {
        StemmerKind::Suffix => Box::new(SuffixStemmer::default()),
        StemmerKind::Porter => Box::new(PorterStemmer::default()),
    }
}
