use proptest::prelude::*;
use stargaze_core::{Repository, RepositorySearchEngine, SearchConfig, SearchOptions};

fn sample_engine() -> RepositorySearchEngine {
    let mut engine = RepositorySearchEngine::new();
    engine.add(
        Repository::new("facebook", "react")
            .with_description("A JavaScript library for building user interfaces"),
    );
    engine.add(
        Repository::new("vercel", "next.js").with_description("The React Framework for Production"),
    );
    engine.add(
        Repository::new("angular", "angular")
            .with_description("The modern web developer's platform"),
    );
    engine.consolidate();
    engine
}

fn ids<'a>(hits: &'a [stargaze_core::SearchHit<'a>]) -> Vec<&'a str> {
    hits.iter().map(|h| h.id).collect()
}

#[test]
fn react_ranks_name_match_first() {
    let engine = sample_engine();
    let hits = engine.search(&["react"], SearchOptions::default());
    let found = ids(&hits);
    assert_eq!(found[0], "facebook/react");
    assert!(found.contains(&"vercel/next.js"));
    assert!(!found.contains(&"angular/angular"));

    let hits = engine.search(&["production"], SearchOptions::default());
    assert!(ids(&hits).contains(&"vercel/next.js"));
}

#[test]
fn adding_same_repository_twice_is_a_no_op() {
    let mut engine = RepositorySearchEngine::new();
    let repo = Repository::new("rust-lang", "rust").with_description("first");
    engine.add(repo.clone());
    engine.add(repo.with_description("second"));
    assert_eq!(engine.len(), 1);
    assert_eq!(engine.get("rust-lang/rust").unwrap().description.as_deref(), Some("first"));
}

#[test]
fn repeated_keywords_do_not_amplify_scores() {
    let mut engine = RepositorySearchEngine::new();
    engine.add(Repository::new("a", "test-utils").with_description("test helpers for test suites"));
    engine.add(Repository::new("b", "runner").with_description("a test runner"));
    engine.consolidate();

    let once = engine.search(&["test"], SearchOptions::default());
    let thrice = engine.search(&["test", "test", "test"], SearchOptions::default());
    assert_eq!(once.len(), thrice.len());
    for (a, b) in once.iter().zip(&thrice) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn queries_are_case_insensitive() {
    let engine = sample_engine();
    let upper = engine.search(&["REACT"], SearchOptions::default());
    let lower = engine.search(&["react"], SearchOptions::default());
    assert_eq!(upper, lower);
}

#[test]
fn empty_or_blank_queries_return_nothing() {
    let engine = sample_engine();
    assert!(engine.search(&[] as &[&str], SearchOptions::default()).is_empty());
    assert!(engine.search(&["", "   ", "--"], SearchOptions::default()).is_empty());
    assert!(engine.search(&["nonexistent"], SearchOptions::default()).is_empty());
}

#[test]
fn empty_engine_returns_nothing() {
    let mut engine = RepositorySearchEngine::new();
    engine.consolidate();
    assert!(engine.search(&["react"], SearchOptions::default()).is_empty());
    assert_eq!(engine.stats().num_docs, 0);
}

#[test]
fn more_matching_documents_never_shrink_results() {
    let mut engine = RepositorySearchEngine::new();
    let mut previous = 0;
    for i in 0..6 {
        let repo = Repository::new(format!("owner{i}"), format!("tool{i}"));
        engine.add(repo.with_description("parser combinators"));
        engine.consolidate();
        let count = engine.search(&["parser"], SearchOptions::with_limit(50)).len();
        assert!(count >= previous);
        previous = count;
    }
    assert_eq!(previous, 6);
}

#[test]
fn name_outranks_description_outranks_owner() {
    let mut engine = RepositorySearchEngine::new();
    engine.add(Repository::new("needle", "gamma"));
    engine.add(Repository::new("beta", "other").with_description("needle"));
    engine.add(Repository::new("alpha", "needle"));
    engine.consolidate();

    let hits = engine.search(&["needle"], SearchOptions::default());
    assert_eq!(ids(&hits), vec!["alpha/needle", "beta/other", "needle/gamma"]);
}

#[test]
fn limit_is_floored_at_one() {
    let engine = sample_engine();
    assert_eq!(engine.search(&["react"], SearchOptions::with_limit(0)).len(), 1);
    assert_eq!(engine.search(&["the"], SearchOptions::with_limit(1)).len(), 1);
    assert_eq!(engine.search(&["the"], SearchOptions::default()).len(), 2);
}

#[test]
fn readme_tokens_beyond_cap_are_ignored() {
    let config = SearchConfig { max_readme_tokens: Some(5), ..Default::default() };
    let mut engine = RepositorySearchEngine::with_config(config).unwrap();
    let readme: Vec<String> = (0..100).map(|i| format!("w{i}")).collect();
    engine.add(Repository::new("big", "docs").with_readme(readme.join(" ")));
    engine.consolidate();

    assert!(engine.search(&["w98"], SearchOptions::default()).is_empty());
    assert_eq!(engine.search(&["w4"], SearchOptions::default()).len(), 1);
}

#[test]
fn consolidating_twice_matches_once() {
    let mut engine = sample_engine();
    let first: Vec<(String, f64)> = engine
        .search(&["the react platform"], SearchOptions::default())
        .iter()
        .map(|h| (h.id.to_string(), h.score))
        .collect();
    engine.consolidate();
    let second: Vec<(String, f64)> = engine
        .search(&["the react platform"], SearchOptions::default())
        .iter()
        .map(|h| (h.id.to_string(), h.score))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn matched_tokens_are_per_document() {
    let engine = sample_engine();
    let hits = engine.search(&["react framework"], SearchOptions::default());
    let next = hits.iter().find(|h| h.id == "vercel/next.js").unwrap();
    assert_eq!(next.matched_tokens, vec!["react", "framework"]);
    let react = hits.iter().find(|h| h.id == "facebook/react").unwrap();
    assert_eq!(react.matched_tokens, vec!["react"]);
}

#[test]
fn hits_serialize_with_camel_case_keys() {
    let json = r#"{
        "owner": "tokio-rs",
        "name": "tokio",
        "description": "A runtime for writing reliable asynchronous applications",
        "readme": null,
        "stargazerCount": 27000,
        "forkCount": 2500,
        "pushedAt": "2024-05-01T12:00:00Z",
        "updatedAt": null,
        "starredAt": "2023-01-15T08:30:00Z"
    }"#;
    let repo: Repository = serde_json::from_str(json).unwrap();
    assert_eq!(repo.stargazer_count, 27000);
    assert!(repo.pushed_at.is_some());

    let mut engine = RepositorySearchEngine::new();
    engine.add(repo);
    engine.consolidate();
    let hits = engine.search(&["asynchronous"], SearchOptions::default());
    let value = serde_json::to_value(&hits).unwrap();
    assert_eq!(value[0]["id"], "tokio-rs/tokio");
    assert_eq!(value[0]["matchedTokens"][0], "asynchronous");
    assert_eq!(value[0]["repository"]["forkCount"], 2500);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SearchConfig { k1: -1.0, ..Default::default() };
    assert!(RepositorySearchEngine::with_config(config).is_err());

    // a negative k would turn IDF into NaN for common terms
    let config = SearchConfig { k: -0.9, ..Default::default() };
    assert!(RepositorySearchEngine::with_config(config).is_err());
}

proptest! {
    #[test]
    fn repetition_never_changes_scores(reps in 1usize..6) {
        let engine = sample_engine();
        let keywords = vec!["react"; reps];
        let once = engine.search(&["react"], SearchOptions::default());
        let repeated = engine.search(&keywords, SearchOptions::default());
        prop_assert_eq!(once, repeated);
    }

    #[test]
    fn results_respect_limit(limit in 0usize..5) {
        let engine = sample_engine();
        let hits = engine.search(&["the react"], SearchOptions::with_limit(limit));
        prop_assert!(hits.len() <= limit.max(1));
        prop_assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
