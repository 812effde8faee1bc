use lexis_core::search::{phrase_search, ranked_search};
use lexis_core::{Document, IdfMode, Indexer};
use proptest::prelude::*;
use std::collections::HashMap;

const VOCAB: &[&str] = &["alpha", "beta", "gamma", "delta", "omega", "the"];

fn words(max: usize) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..max)
}

fn build(docs: &[(Vec<&str>, Vec<&str>)]) -> Indexer {
    let mut ix = Indexer::default();
    for (i, (title, body)) in docs.iter().enumerate() {
        ix.add_document(
            Document::new(i.to_string())
                .with_field("title", title.join(" "))
                .with_field("body", body.join(" ")),
        );
    }
    ix.finalize();
    ix
}

proptest! {
    #[test]
    fn term_frequencies_are_bounded(docs in prop::collection::vec((words(6), words(12)), 1..20)) {
        let ix = build(&docs);
        let mut per_doc: HashMap<u32, (f64, usize)> = HashMap::new();
        for (_, list) in ix.inverted_index().iter() {
            for (&doc_id, posting) in &list.postings {
                prop_assert!(posting.term_frequency > 0.0 && posting.term_frequency <= 1.0);
                prop_assert!(posting.positions.windows(2).all(|w| w[0] < w[1]));
                let e = per_doc.entry(doc_id).or_insert((0.0, 0));
                e.0 += posting.term_frequency;
                e.1 += 1;
            }
        }
        for (sum, distinct) in per_doc.values() {
            prop_assert!(*sum <= *distinct as f64 + 1e-9);
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn idf_never_increases_with_doc_freq(n in 1usize..500, a in 1usize..500, b in 1usize..500) {
        let (lo, hi) = (a.min(b).min(n), a.max(b).min(n));
        prop_assert!(IdfMode::Plain.idf(n, lo) >= IdfMode::Plain.idf(n, hi));
        prop_assert!(IdfMode::Smoothed.idf(n, lo) >= IdfMode::Smoothed.idf(n, hi));
        prop_assert_eq!(IdfMode::Plain.idf(n, n), 0.0);
    }

    #[test]
    fn phrase_hits_are_ranked_hits(docs in prop::collection::vec((words(4), words(10)), 1..15), phrase in words(4)) {
        let ix = build(&docs);
        let joined = phrase.join(" ");
        let ranked: Vec<u32> = ranked_search(&ix, &joined).iter().map(|s| s.doc_id).collect();
        for doc_id in phrase_search(&ix, &joined) {
            prop_assert!(ranked.contains(&doc_id));
        }
    }

    #[test]
    fn ranked_scores_are_sorted_and_finite(docs in prop::collection::vec((words(4), words(10)), 1..15), query in words(3)) {
        let ix = build(&docs);
        let hits = ranked_search(&ix, &query.join(" "));
        prop_assert!(hits.iter().all(|h| h.score.is_finite()));
        prop_assert!(hits.windows(2).all(|w| w[0].score > w[1].score || (w[0].score == w[1].score && w[0].doc_id < w[1].doc_id)));
    }
}
