//! # Filter Engine
//!
//! Runs one filtering pass over a rendered view:
//! 1. Extract a snapshot of the rendered posts
//! 2. Skip posts that are not displayed
//! 3. Fingerprint each post and skip the ones already processed
//! 4. Ask the suppression policy about the rest
//! 5. Remove the posts a rule fired on
//! 6. Mark every evaluated post as processed, suppressed or not
//!
//! The engine owns the processed set, so deduplication spans every pass of
//! a session. Dropping the engine (or calling [`FilterEngine::reset`]) ends
//! the session.

use std::sync::Arc;
use std::time::Instant;

use feed_model::{RenderedView, ViewError};
use pipeline::{BannedPhraseSet, FingerprintIndex, SnapshotExtractor, SuppressionPolicy, Suppressor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Counters describing one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Feed items found in the snapshot
    pub extracted: usize,
    /// Items skipped because they were not displayed
    pub hidden: usize,
    /// Items skipped because their fingerprint was already processed
    pub already_seen: usize,
    /// Items run through the policy and marked processed
    pub evaluated: usize,
    /// Items removed from the view
    pub suppressed: usize,
    /// The pass stopped early because of cancellation
    pub abandoned: bool,
}

/// Single-pass filtering engine owning the session's processed set
pub struct FilterEngine {
    extractor: SnapshotExtractor,
    index: FingerprintIndex,
    policy: SuppressionPolicy,
    suppressor: Suppressor,
}

impl FilterEngine {
    /// Create an engine with an empty processed set
    pub fn new(policy: SuppressionPolicy) -> Self {
        Self {
            extractor: SnapshotExtractor::new(),
            index: FingerprintIndex::new(),
            policy,
            suppressor: Suppressor::new(),
        }
    }

    /// Create an engine whose policy is described by `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        let phrases = Arc::new(config.phrase_set());
        info!(
            "Loaded {} banned phrases: {:?}",
            phrases.len(),
            phrases.iter().collect::<Vec<_>>()
        );
        Self::new(config.build_policy(phrases))
    }

    /// Convenience constructor for a phrase-only engine
    pub fn with_phrases<S: AsRef<str>>(phrases: impl IntoIterator<Item = S>) -> Self {
        let phrases = Arc::new(BannedPhraseSet::new(phrases));
        Self::new(SuppressionPolicy::new().add_rule(pipeline::rules::BannedPhraseRule::new(phrases)))
    }

    /// Fingerprints processed this session
    pub fn processed(&self) -> &FingerprintIndex {
        &self.index
    }

    /// Rules consulted for every new post
    pub fn policy(&self) -> &SuppressionPolicy {
        &self.policy
    }

    /// Start a new session: forget every processed fingerprint
    pub fn reset(&mut self) {
        self.index.reset();
    }

    /// Run one full pass over `view`
    ///
    /// # Returns
    /// * `Ok(report)` - The pass completed, or was abandoned on cancellation
    /// * `Err` - A view-scoped failure aborted the pass; records evaluated
    ///   before the failure stay processed
    pub fn run_pass<V: RenderedView>(
        &mut self,
        view: &V,
        cancel: &CancellationToken,
    ) -> Result<PassReport, ViewError> {
        let start_time = Instant::now();
        let mut report = PassReport::default();

        let posts = self.extractor.extract(view)?;
        report.extracted = posts.len();

        for post in &posts {
            if cancel.is_cancelled() {
                debug!("Pass cancelled, abandoning remaining posts");
                report.abandoned = true;
                break;
            }
            if !post.visible {
                report.hidden += 1;
                continue;
            }

            let fingerprint = self.index.fingerprint(post.record.text.as_deref());
            if self.index.seen(&fingerprint) {
                report.already_seen += 1;
                continue;
            }

            if let Some(rule) = self.policy.evaluate(&post.record) {
                debug!("Suppressing post {} ({})", fingerprint, rule);
                self.suppressor.suppress(view, post)?;
                report.suppressed += 1;
            }

            self.index.mark_seen(fingerprint);
            report.evaluated += 1;
        }

        info!(
            "Pass complete in {:.2?}: {} posts, {} new, {} suppressed, {} processed in session",
            start_time.elapsed(),
            report.extracted,
            report.evaluated,
            report.suppressed,
            self.index.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_model::{SimulatedFeed, SimulatedPost};
    use pipeline::Fingerprint;

    fn rubiales_feed() -> SimulatedFeed {
        SimulatedFeed::with_posts(vec![
            SimulatedPost::new("Breaking: Luis Rubiales resigns", "afpfr.bsky.social"),
            SimulatedPost::new("Weather update", "meteo.bsky.social"),
            SimulatedPost::new("LUIS RUBIALES interview", "sport.bsky.social"),
        ])
    }

    #[test]
    fn test_single_pass_scenario() {
        let feed = rubiales_feed();
        let mut engine = FilterEngine::with_phrases(["Luis Rubiales"]);

        let report = engine.run_pass(&feed, &CancellationToken::new()).unwrap();

        assert_eq!(report.extracted, 3);
        assert_eq!(report.evaluated, 3);
        assert_eq!(report.suppressed, 2);
        assert_eq!(feed.rendered_texts(), vec![Some("Weather update".to_string())]);
        assert_eq!(engine.processed().len(), 3);
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let feed = rubiales_feed();
        let mut engine = FilterEngine::with_phrases(["Luis Rubiales"]);
        let cancel = CancellationToken::new();

        engine.run_pass(&feed, &cancel).unwrap();
        let report = engine.run_pass(&feed, &cancel).unwrap();

        assert_eq!(report.extracted, 1);
        assert_eq!(report.already_seen, 1);
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.suppressed, 0);
        assert_eq!(feed.removed_ids().len(), 2);
    }

    #[test]
    fn test_cancelled_pass_mutates_nothing() {
        let feed = rubiales_feed();
        let mut engine = FilterEngine::with_phrases(["Luis Rubiales"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = engine.run_pass(&feed, &cancel).unwrap();

        assert!(report.abandoned);
        assert_eq!(report.evaluated, 0);
        assert_eq!(feed.len(), 3);
        assert!(engine.processed().is_empty());
    }

    #[test]
    fn test_view_failure_aborts_pass() {
        let feed = rubiales_feed();
        let mut engine = FilterEngine::with_phrases(["Luis Rubiales"]);
        feed.fail_snapshots(1);

        let err = engine.run_pass(&feed, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, ViewError::Unavailable(_)));
        assert!(engine.processed().is_empty());

        // Next pass works again
        let report = engine.run_pass(&feed, &CancellationToken::new()).unwrap();
        assert_eq!(report.suppressed, 2);
    }

    #[test]
    fn test_textless_post_is_evaluated_once() {
        let feed = SimulatedFeed::with_posts(vec![SimulatedPost {
            author_handle: Some("photo.test".to_string()),
            ..Default::default()
        }]);
        let mut engine = FilterEngine::with_phrases(["trump"]);
        let cancel = CancellationToken::new();

        let evaluated: Vec<usize> = (0..5)
            .map(|_| engine.run_pass(&feed, &cancel).unwrap().evaluated)
            .collect();

        assert_eq!(evaluated, vec![1, 0, 0, 0, 0]);
        assert_eq!(engine.processed().len(), 1);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_failed_removal_aborts_pass_and_is_retried() {
        let feed = SimulatedFeed::with_posts(vec![
            SimulatedPost::new("Weather update", "meteo.bsky.social"),
            SimulatedPost::new("trump rally tonight", "news.example"),
            SimulatedPost::new("Sunset over the harbour", "photo.example"),
        ]);
        let mut engine = FilterEngine::with_phrases(["trump"]);
        let cancel = CancellationToken::new();
        feed.fail_removals(1);

        let err = engine.run_pass(&feed, &cancel).unwrap_err();
        assert!(matches!(err, ViewError::Unavailable(_)));
        assert!(engine.processed().seen(&Fingerprint::of_text("Weather update")));
        assert!(!engine.processed().seen(&Fingerprint::of_text("trump rally tonight")));
        assert_eq!(engine.processed().len(), 1);
        assert_eq!(feed.len(), 3);

        let report = engine.run_pass(&feed, &cancel).unwrap();
        assert_eq!(report.already_seen, 1);
        assert_eq!(report.suppressed, 1);
        assert_eq!(report.evaluated, 2);
        assert_eq!(
            feed.rendered_texts(),
            vec![
                Some("Weather update".to_string()),
                Some("Sunset over the harbour".to_string())
            ]
        );
    }

    #[test]
    fn test_reset_starts_new_session() {
        let feed = SimulatedFeed::with_posts(vec![SimulatedPost::new("Weather update", "m.test")]);
        let mut engine = FilterEngine::with_phrases(["trump"]);
        let cancel = CancellationToken::new();

        engine.run_pass(&feed, &cancel).unwrap();
        engine.reset();
        let report = engine.run_pass(&feed, &cancel).unwrap();

        assert_eq!(report.evaluated, 1);
    }

    #[test]
    fn test_from_config_uses_every_rule() {
        let config = EngineConfig::from_toml_str(
            r#"
            banned_phrases = ["trump"]
            blocked_authors = ["spam.example"]
            [virality]
            enabled = true
            "#,
        )
        .unwrap();
        let feed = SimulatedFeed::with_posts(vec![
            SimulatedPost::new("trump", "a.test"),
            SimulatedPost::new("hello", "spam.example"),
            SimulatedPost::new("cat video", "b.test").with_counts("3", "4.5K"),
            SimulatedPost::new("quiet post", "c.test").with_counts("3", "4"),
        ]);
        let mut engine = FilterEngine::from_config(&config);

        let report = engine.run_pass(&feed, &CancellationToken::new()).unwrap();

        assert_eq!(report.suppressed, 3);
        assert_eq!(feed.rendered_texts(), vec![Some("quiet post".to_string())]);
    }
}
