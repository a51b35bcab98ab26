//! Memory store tests through the public API
//!
//! These tests verify history retention, context rendering, cache behavior and
//! concurrent access from several request paths

use std::sync::Arc;
use std::thread;

use filewise::memory::MemoryStore;
use filewise::models::{SearchHits, SemanticMatch};
use filewise::EngineConfig;
use serde_json::json;

fn hits(files: &[&str]) -> SearchHits {
    SearchHits { files: files.iter().map(|f| f.to_string()).collect(), ..Default::default() }
}

#[test]
fn test_history_keeps_most_recent_in_order() {
    for (n, cap) in [(0usize, 3usize), (2, 3), (3, 3), (11, 3), (25, 10)] {
        let store = MemoryStore::new(&EngineConfig { history_cap: cap, ..Default::default() });
        for i in 0..n {
            store.add_interaction(&format!("request {}", i), json!({}), json!({}));
        }

        let history = store.history();
        assert_eq!(history.len(), n.min(cap), "n={} cap={}", n, cap);
        let expected: Vec<String> = (n.saturating_sub(cap)..n).map(|i| format!("request {}", i)).collect();
        let actual: Vec<String> = history.iter().map(|h| h.user_input.clone()).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn test_context_renders_last_three_with_errors() {
    let store = MemoryStore::default();
    for i in 0..5 {
        let result = if i == 4 { json!({ "error": "File not found at '/x'" }) } else { json!({ "message": "ok" }) };
        store.add_interaction(&format!("req {}", i), json!({ "command": "read_file" }), result);
    }

    let context = store.get_context();
    assert!(context.starts_with("Previous conversation:\n"));
    assert!(!context.contains("req 1"));
    assert!(context.contains("User: req 2\n"));
    assert!(context.contains("User: req 4\nAgent: {\"command\":\"read_file\"}\nResult: Error - File not found at '/x'\n---\n"));
    assert_eq!(context.matches("---\n").count(), 3);
}

#[test]
fn test_cached_resume_is_found_semantically() {
    let store = MemoryStore::default();
    store.cache_search_results("/home/me/docs", "resume", &hits(&["/home/me/docs/resume.pdf"]));

    let (info, score) = store.find_semantic_match("/home/me/docs", "my resume final", 0.3).unwrap();
    assert_eq!(info.path, "/home/me/docs/resume.pdf");
    assert_eq!(info.name_without_ext, "resume");
    assert!(score > 0.3);

    let rendered = SemanticMatch::new(&info, score);
    assert_eq!(rendered.match_type, "semantic");
}

#[test]
fn test_semantic_join_is_a_substring_match() {
    let store = MemoryStore::default();
    store.cache_search_results("/home/me/docs/archive", "old", &hits(&["/home/me/docs/archive/budget.xlsx"]));

    // A parent path matches entries cached under its children
    assert!(store.find_semantic_match("/home/me/docs", "budget", 0.3).is_some());
    // An unrelated path does not
    assert!(store.find_semantic_match("/srv/data", "budget", 0.3).is_none());
}

#[test]
fn test_cache_key_is_case_insensitive_on_keyword_only() {
    let store = MemoryStore::default();
    store.cache_search_results("/Data", "Report", &hits(&["/Data/report.txt"]));
    store.cache_search_results("/Data", "REPORT", &hits(&["/Data/report.txt", "/Data/report2.txt"]));
    store.cache_search_results("/data", "report", &hits(&[]));

    assert_eq!(store.cache_len(), 2);
    assert_eq!(store.cached_search("/Data", "report").unwrap().files.len(), 2);
}

#[test]
fn test_bounded_cache_evicts_oldest() {
    let store = MemoryStore::new(&EngineConfig { cache_capacity: Some(2), ..Default::default() });
    store.cache_search_results("/a", "one", &hits(&[]));
    store.cache_search_results("/a", "two", &hits(&[]));
    store.cache_search_results("/a", "three", &hits(&[]));

    assert_eq!(store.cache_len(), 2);
    assert!(store.cached_search("/a", "one").is_none());
    assert!(store.cached_search("/a", "three").is_some());
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let store = Arc::new(MemoryStore::new(&EngineConfig { history_cap: 1000, ..Default::default() }));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store.add_interaction(&format!("{}-{}", t, i), json!({}), json!({}));
                    store.cache_search_results(&format!("/t{}", t), &format!("k{}", i), &hits(&[]));
                    let _ = store.get_context();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(store.history_len(), 200);
    assert_eq!(store.cache_len(), 200);
}
