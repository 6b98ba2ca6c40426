//! Integration tests for the pipeline.
//!
//! These tests verify that extraction, deduplication, rules and suppression
//! work together over a simulated feed.

use anyhow::Result;
use feed_model::{PostRecord, SimulatedFeed, SimulatedPost};
use pipeline::rules::*;
use pipeline::{
    BannedPhraseSet, FingerprintIndex, SnapshotExtractor, SuppressionPolicy, SuppressionRule,
    Suppressor,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps the phrase rule and counts how often it is consulted
struct CountingRule {
    inner: BannedPhraseRule,
    calls: Arc<AtomicUsize>,
}

impl SuppressionRule for CountingRule {
    fn name(&self) -> &str {
        "CountingRule"
    }

    fn should_suppress(&self, record: &PostRecord) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.should_suppress(record)
    }
}

/// Run one pass by hand, returning how many posts were suppressed
fn run_pass(feed: &SimulatedFeed, index: &mut FingerprintIndex, policy: &SuppressionPolicy) -> usize {
    let mut suppressed = 0;
    for post in SnapshotExtractor::new().extract(feed).unwrap() {
        if !post.visible {
            continue;
        }
        let fp = index.fingerprint(post.record.text.as_deref());
        if index.seen(&fp) {
            continue;
        }
        if policy.evaluate(&post.record).is_some() {
            Suppressor::new().suppress(feed, &post).unwrap();
            suppressed += 1;
        }
        index.mark_seen(fp);
    }
    suppressed
}

fn create_test_feed() -> SimulatedFeed {
    SimulatedFeed::with_posts(vec![
        SimulatedPost::new("Breaking: Luis Rubiales resigns", "afpfr.bsky.social"),
        SimulatedPost::new("Weather update", "meteo.bsky.social"),
        SimulatedPost::new("LUIS RUBIALES interview", "sport.bsky.social"),
    ])
}

#[test]
fn test_full_pass_removes_matches() {
    let feed = create_test_feed();
    let phrases = Arc::new(BannedPhraseSet::new(["Luis Rubiales"]));
    let policy = SuppressionPolicy::new().add_rule(BannedPhraseRule::new(phrases));
    let mut index = FingerprintIndex::new();

    let suppressed = run_pass(&feed, &mut index, &policy);

    assert_eq!(suppressed, 2);
    assert_eq!(feed.rendered_texts(), vec![Some("Weather update".to_string())]);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_repeated_content_is_evaluated_once() {
    let feed = create_test_feed();
    let calls = Arc::new(AtomicUsize::new(0));
    let policy = SuppressionPolicy::new().add_rule(CountingRule {
        inner: BannedPhraseRule::new(Arc::new(BannedPhraseSet::new(["Luis Rubiales"]))),
        calls: calls.clone(),
    });
    let mut index = FingerprintIndex::new();

    run_pass(&feed, &mut index, &policy);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    // The renderer shows the same content again (repost, re-render)
    feed.push(SimulatedPost::new("Breaking: Luis Rubiales resigns", "other.bsky.social"));
    feed.push(SimulatedPost::new("Weather update", "meteo.bsky.social"));

    let suppressed = run_pass(&feed, &mut index, &policy);
    assert_eq!(suppressed, 0, "Known content must not be suppressed twice");
    assert_eq!(calls.load(Ordering::SeqCst), 3, "Matcher must not run again");
    assert_eq!(feed.len(), 3);
}

#[test]
fn test_partial_records_survive() {
    let feed = SimulatedFeed::with_posts(vec![
        SimulatedPost {
            author_handle: Some(String::new()),
            ..Default::default()
        },
        SimulatedPost::new("trump", "a.test").with_stale_text(),
        SimulatedPost::new("trump", "b.test").with_counts("9K", "12K"),
    ]);
    let policy = SuppressionPolicy::new()
        .add_rule(BannedPhraseRule::new(Arc::new(BannedPhraseSet::new(["trump"]))))
        .add_rule(ViralityRule::default());
    let mut index = FingerprintIndex::new();

    let suppressed = run_pass(&feed, &mut index, &policy);

    assert_eq!(suppressed, 1, "Only the readable post is suppressed");
    assert_eq!(feed.len(), 2);
    assert_eq!(index.len(), 3);

    // The textless post is known now; only the unreadable one comes back
    assert_eq!(run_pass(&feed, &mut index, &policy), 0);
    assert_eq!(index.len(), 4, "Unreadable text gets a fresh fingerprint each pass");
}

#[test]
fn test_hidden_posts_wait_until_visible() {
    let feed = SimulatedFeed::new();
    feed.push(SimulatedPost::new("trump", "a.test").hidden());
    let policy = SuppressionPolicy::new()
        .add_rule(BannedPhraseRule::new(Arc::new(BannedPhraseSet::new(["trump"]))));
    let mut index = FingerprintIndex::new();

    assert_eq!(run_pass(&feed, &mut index, &policy), 0);
    assert!(index.is_empty(), "Hidden posts are not marked");
}

#[test]
fn test_author_list_and_phrases_together() {
    let feed = SimulatedFeed::with_posts(vec![
        SimulatedPost::new("Perfectly normal post", "spam.example"),
        SimulatedPost::new("Olivier Faure au micro", "news.example"),
        SimulatedPost::new("Nothing to see", "news.example"),
    ]);
    let policy = SuppressionPolicy::new()
        .add_rule(BannedPhraseRule::new(Arc::new(BannedPhraseSet::new(["Olivier Faure"]))))
        .add_rule(AuthorListRule::new("block list", ["@spam.example"]));
    let mut index = FingerprintIndex::new();

    assert_eq!(run_pass(&feed, &mut index, &policy), 2);
    assert_eq!(feed.rendered_texts(), vec![Some("Nothing to see".to_string())]);
}
