use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache::QueryCache;
use crate::document::Document;
use crate::index::{DocId, Indexer, PostingList};

lazy_static! {
    static ref PHRASE_RE: Regex = Regex::new(r#""(.*?)""#).expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Phrase(String),
    Ranked(String),
}

impl Query {
    /// The first `"..."` pair selects phrase search; text outside the quotes is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match PHRASE_RE.captures(trimmed) {
            Some(caps) => Query::Phrase(caps[1].to_string()),
            None => Query::Ranked(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Documents containing every phrase term at consecutive positions, in doc_id order.
pub fn phrase_search(index: &Indexer, phrase: &str) -> Vec<DocId> {
    let terms = index.normalizer().normalize(phrase);
    let mut lists: Vec<&PostingList> = Vec::with_capacity(terms.len());
    for term in &terms {
        match index.entry(term) {
            Some(list) => lists.push(list),
            None => return Vec::new(),
        }
    }
    let Some((first, rest)) = lists.split_first() else { return Vec::new() };

    let mut matches = Vec::new();
    'docs: for (&doc_id, posting) in &first.postings {
        let mut following: Vec<HashSet<u32>> = Vec::with_capacity(rest.len());
        for list in rest {
            match list.get(doc_id) {
                Some(p) => following.push(p.positions.iter().copied().collect()),
                None => continue 'docs,
            }
        }
        let found = posting.positions.iter().any(|&start| {
            following.iter().zip(1u32..).all(|(set, offset)| set.contains(&(start + offset)))
        });
        if found {
            matches.push(doc_id);
        }
    }
    matches
}

/// TF-IDF over documents containing all distinct query terms. Terms absent from the index are
/// dropped. Sorted by descending score; equal scores keep ascending doc_id order.
pub fn ranked_search(index: &Indexer, query: &str) -> Vec<ScoredDoc> {
    let mut seen = HashSet::new();
    let mut lists: Vec<&PostingList> = index
        .normalizer()
        .normalize(query)
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .filter_map(|term| index.entry(&term))
        .collect();
    if lists.is_empty() { return Vec::new(); }
    lists.sort_by_key(|list| list.doc_freq());

    let (rarest, rest) = (lists[0], &lists[1..]);
    let mut scored: Vec<ScoredDoc> = rarest
        .postings
        .keys()
        .filter(|&&doc_id| rest.iter().all(|list| list.contains(doc_id)))
        .map(|&doc_id| {
            let score: f64 = lists
                .iter()
                .filter_map(|list| list.get(doc_id).map(|p| p.term_frequency * list.idf))
                .sum();
            ScoredDoc { doc_id, score }
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    /// None for phrase matches, which are unranked
    pub score: Option<f64>,
    pub document: Arc<Document>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// queries that ran the search algorithms
    pub executed: u64,
    pub cache_hits: u64,
    pub cached_queries: usize,
}

/// Query engine with an LRU result cache in front of it.
///
/// The index is shared read-only; the whole cache lookup/compute/insert sequence runs under one
/// mutex, so concurrent callers never compute the same miss twice.
pub struct Searcher {
    index: Arc<Indexer>,
    cache: Mutex<QueryCache<Vec<SearchHit>>>,
    executed: AtomicU64,
    cache_hits: AtomicU64,
}

impl Searcher {
    pub fn new(index: Arc<Indexer>, cache_capacity: usize) -> Self {
        if !index.is_finalized() {
            tracing::warn!("searching an index that was not finalized; every idf is 0");
        }
        Self {
            index,
            cache: Mutex::new(QueryCache::new(cache_capacity)),
            executed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    pub fn index(&self) -> &Indexer { &self.index }

    pub fn search(&self, raw: &str) -> Vec<Arc<Document>> {
        self.search_hits(raw).into_iter().map(|hit| hit.document).collect()
    }

    /// Cached by the exact raw query string.
    pub fn search_hits(&self, raw: &str) -> Vec<SearchHit> {
        let mut cache = self.cache.lock();
        if let Some(hits) = cache.get(raw) {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(query = raw, "cache hit");
            return hits.clone();
        }
        let hits = self.execute(raw);
        cache.insert(raw.to_string(), hits.clone());
        hits
    }

    /// Runs the query, bypassing the cache.
    pub fn execute(&self, raw: &str) -> Vec<SearchHit> {
        self.executed.fetch_add(1, Ordering::Relaxed);
        let scored: Vec<(DocId, Option<f64>)> = match Query::parse(raw) {
            Query::Phrase(phrase) => phrase_search(&self.index, &phrase).into_iter().map(|id| (id, None)).collect(),
            Query::Ranked(text) => ranked_search(&self.index, &text).into_iter().map(|s| (s.doc_id, Some(s.score))).collect(),
        };
        tracing::debug!(query = raw, hits = scored.len(), "executed query");
        scored
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.index.document(doc_id).map(|doc| SearchHit { doc_id, score, document: Arc::clone(doc) })
            })
            .collect()
    }

    pub fn is_cached(&self, raw: &str) -> bool { self.cache.lock().contains(raw) }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            executed: self.executed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cached_queries: self.cache.lock().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_picks_first_quoted_span() {
        assert_eq!(Query::parse(r#"  "search engine" rust "x" "#), Query::Phrase("search engine".into()));
        assert_eq!(Query::parse("rust guide"), Query::Ranked("rust guide".into()));
        assert_eq!(Query::parse(r#"unbalanced "quote"#), Query::Ranked(r#"unbalanced "quote"#.into()));
        assert_eq!(Query::parse(r#""""#), Query::Phrase(String::new()));
    }

    fn tiny() -> Indexer {
        let mut ix = Indexer::default();
        ix.add_document(Document::new("0").with_field("body", "quick brown fox"));
        ix.add_document(Document::new("1").with_field("body", "brown quick fox"));
        ix.add_document(Document::new("2").with_field("body", "quick brown dog quick brown fox"));
        ix.finalize();
        ix
    }

    #[test]
    fn phrase_requires_adjacency_and_order() {
        let ix = tiny();
        assert_eq!(phrase_search(&ix, "quick brown"), vec![0, 2]);
        assert_eq!(phrase_search(&ix, "brown fox"), vec![0, 2]);
        assert_eq!(phrase_search(&ix, "brown quick fox"), vec![1]);
        assert!(phrase_search(&ix, "quick cat").is_empty());
        assert!(phrase_search(&ix, "the").is_empty());
    }

    #[test]
    fn ranked_requires_every_term() {
        let ix = tiny();
        let ids: Vec<DocId> = ranked_search(&ix, "dog fox").iter().map(|s| s.doc_id).collect();
        assert_eq!(ids, vec![2]);
        // unknown terms are dropped rather than required
        let ids: Vec<DocId> = ranked_search(&ix, "dog zebra").iter().map(|s| s.doc_id).collect();
        assert_eq!(ids, vec![2]);
        assert!(ranked_search(&ix, "zebra").is_empty());
    }

    #[test]
    fn equal_scores_fall_back_to_doc_id() {
        let ix = tiny();
        let hits = ranked_search(&ix, "quick");
        assert!(hits.iter().all(|s| s.score == 0.0));
        let ids: Vec<DocId> = hits.iter().map(|s| s.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn repeated_query_terms_do_not_add_weight() {
        let ix = tiny();
        assert_eq!(ranked_search(&ix, "dog"), ranked_search(&ix, "dog dog dog"));
    }
}
