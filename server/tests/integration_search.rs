use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lexis_core::EngineConfig;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn write_tiny_corpus(dir: &std::path::Path) -> String {
    let path = dir.join("docs.jsonl");
    let lines = [
        r#"{"id":"A","title":"Learning JavaScript","body":"A popular guide to the basics of JavaScript programming."}"#,
        r#"{"id":"B","title":"Advanced Guide to JavaScript","body":"An advanced guide for building complex JavaScript applications."}"#,
        r#"{"id":"C","title":"Building a Search Engine","body":"How to build a search engine from scratch. This guide is on building a search engine."}"#,
    ];
    fs::write(&path, lines.join("\n")).unwrap();
    path.to_string_lossy().to_string()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let app = lexis_server::build_app(&write_tiny_corpus(dir.path()), &EngineConfig::default()).unwrap();

    let (status, json) = call(app, "/search?q=javascript%20guide&k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr[0]["document"]["id"], "A");
    assert_eq!(arr[1]["document"]["id"], "B");
    assert!(arr[0]["score"].as_f64().unwrap() > arr[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn phrase_search_and_cache_stats() {
    let dir = tempdir().unwrap();
    let app = lexis_server::build_app(&write_tiny_corpus(dir.path()), &EngineConfig::default()).unwrap();

    let uri = "/search?q=%22building%20a%20search%20engine%22";
    let (_, json) = call(app.clone(), uri).await;
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["doc_id"], 2);
    assert!(arr[0]["score"].is_null());

    call(app.clone(), uri).await;
    let (status, stats) = call(app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["num_docs"], 3);
    assert_eq!(stats["finalized"], true);
    assert_eq!(stats["cache"]["executed"], 1);
    assert_eq!(stats["cache"]["cache_hits"], 1);
}

#[tokio::test]
async fn doc_lookup_by_internal_id() {
    let dir = tempdir().unwrap();
    let app = lexis_server::build_app(&write_tiny_corpus(dir.path()), &EngineConfig::default()).unwrap();

    let (status, json) = call(app.clone(), "/doc/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["document"]["title"], "Advanced Guide to JavaScript");

    let (status, _) = call(app, "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
