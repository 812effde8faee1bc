use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::{EngineConfig, IdfMode};
use crate::document::Document;
use crate::tokenizer::{Analyzer, Normalizer};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// occurrences / total terms in the document, in [0, 1]
    pub term_frequency: f64,
    /// 0-based offsets in the document's concatenated term stream, ascending
    pub positions: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct PostingList {
    /// Zero until [`Indexer::finalize`] runs.
    pub idf: f64,
    pub postings: BTreeMap<DocId, Posting>, // ordered by doc_id
}

impl PostingList {
    pub fn doc_freq(&self) -> usize { self.postings.len() }
    pub fn get(&self, doc_id: DocId) -> Option<&Posting> { self.postings.get(&doc_id) }
    pub fn contains(&self, doc_id: DocId) -> bool { self.postings.contains_key(&doc_id) }
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    terms: HashMap<String, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }
    pub fn get(&self, term: &str) -> Option<&PostingList> { self.terms.get(term) }
    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.terms.iter().map(|(t, p)| (t.as_str(), p))
    }
}

/// Append-only; internal ids are assigned 0, 1, 2, ... in add order.
#[derive(Debug, Default)]
pub(crate) struct DocumentStore {
    docs: Vec<Arc<Document>>,
}

impl DocumentStore {
    fn push(&mut self, doc: Document) -> DocId {
        let id = self.docs.len() as DocId;
        self.docs.push(Arc::new(doc));
        id
    }

    fn get(&self, doc_id: DocId) -> Option<&Arc<Document>> { self.docs.get(doc_id as usize) }
    fn len(&self) -> usize { self.docs.len() }
}

/// Builds the inverted index and document store.
///
/// Call [`Indexer::finalize`] after the last [`Indexer::add_document`] and before querying.
/// Until then every idf is 0, so ranked scores are all 0 and hits come back in doc_id order. Adding a
/// document to a finalized index clears the flag; scores are stale until it is finalized again.
pub struct Indexer {
    normalizer: Box<dyn Normalizer>,
    idf_mode: IdfMode,
    index: InvertedIndex,
    docs: DocumentStore,
    finalized: bool,
}

impl Indexer {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_normalizer(Box::new(Analyzer::with_kind(config.stemmer)), config.idf)
    }

    pub fn with_normalizer(normalizer: Box<dyn Normalizer>, idf_mode: IdfMode) -> Self {
        Self { normalizer, idf_mode, index: InvertedIndex::new(), docs: DocumentStore::default(), finalized: false }
    }

    pub fn add_document(&mut self, doc: Document) -> DocId {
        let mut positions: HashMap<String, Vec<u32>> = HashMap::new();
        let mut total: u32 = 0;
        for (_, text) in doc.fields() {
            for term in self.normalizer.normalize(text) {
                positions.entry(term).or_default().push(total);
                total += 1;
            }
        }

        let doc_id = self.docs.push(doc);
        // a document without terms is stored but never posted
        if total > 0 {
            for (term, positions) in positions {
                let term_frequency = positions.len() as f64 / total as f64;
                self.index
                    .terms
                    .entry(term)
                    .or_default()
                    .postings
                    .insert(doc_id, Posting { term_frequency, positions });
            }
        }

        if self.finalized {
            tracing::debug!(doc_id, "document added after finalize; idf is stale until re-finalized");
            self.finalized = false;
        }
        tracing::debug!(doc_id, terms = total, "indexed document");
        doc_id
    }

    /// Recomputes idf for every term from the current document count. Idempotent.
    pub fn finalize(&mut self) {
        let n = self.docs.len();
        for entry in self.index.terms.values_mut() {
            entry.idf = self.idf_mode.idf(n, entry.doc_freq());
        }
        self.finalized = true;
        tracing::info!(num_docs = n, num_terms = self.index.len(), "idf finalized");
    }

    pub fn is_finalized(&self) -> bool { self.finalized }
    pub fn num_docs(&self) -> usize { self.docs.len() }
    pub fn num_terms(&self) -> usize { self.index.len() }
    pub fn entry(&self, term: &str) -> Option<&PostingList> { self.index.get(term) }
    pub fn inverted_index(&self) -> &InvertedIndex { &self.index }
    pub fn document(&self, doc_id: DocId) -> Option<&Arc<Document>> { self.docs.get(doc_id) }
    pub fn normalizer(&self) -> &dyn Normalizer { self.normalizer.as_ref() }
}

impl Default for Indexer {
    fn default() -> Self { Self::new(&EngineConfig::default()) }
}
