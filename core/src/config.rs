use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cache::MAX_CACHE_SIZE;
use crate::error::Result;

/// How inverse document frequency is derived from `N` (documents) and `df` (documents containing the term).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfMode {
    /// `ln(N / df)`; a term present in every document weighs zero.
    #[default]
    Plain,
    /// `ln(1 + N / df)`
    Smoothed,
}

impl IdfMode {
    pub fn idf(self, num_docs: usize, doc_freq: usize) -> f64 {
        if num_docs == 0 || doc_freq == 0 { return 0.0; }
        let ratio = num_docs as f64 / doc_freq as f64;
        match self {
            IdfMode::Plain => ratio.ln(),
            IdfMode::Smoothed => (1.0 + ratio).ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    #[default]
    Suffix,
    Porter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache_capacity: usize,
    pub idf: IdfMode,
    pub stemmer: StemmerKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { cache_capacity: MAX_CACHE_SIZE, idf: IdfMode::default(), stemmer: StemmerKind::default() }
    }
}

impl EngineConfig {
    /// Reads a JSON config file; missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
