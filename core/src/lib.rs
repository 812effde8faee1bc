pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod search;
pub mod stemmer;
pub mod tokenizer;

pub use cache::{QueryCache, MAX_CACHE_SIZE};
pub use config::{EngineConfig, IdfMode, StemmerKind};
pub use document::Document;
pub use error::{Error, Result};
pub use index::{DocId, Indexer, InvertedIndex, Posting, PostingList};
pub use search::{Query, ScoredDoc, SearchHit, SearchStats, Searcher};
pub use tokenizer::{Analyzer, Normalizer};
