//! Rule that delegates the suppression decision to a decision provider.
//!
//! The rule computes the named signals for a post locally and lets the
//! provider (usually a remote rule engine) decide whether to block it.

use crate::matcher::BannedPhraseSet;
use crate::rules::virality::ViralityRule;
use crate::traits::SuppressionRule;
use anyhow::{Context, Result};
use feed_model::PostRecord;
use signals::{
    BLOCK_POST, DecisionProvider, FOLLOWS_BLOCKED_ACCOUNTS, HAS_USED_BANWORD, IS_IN_FOLLOWED_FEED,
    IS_VIRAL, SignalVector,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Suppresses posts for which the provider answers `block post = true`.
///
/// ## Signals sent
/// - `has used banword`: the phrase set matches the text
/// - `is viral`: engagement above the virality thresholds
/// - `is in followed feed`: the author is in the followed-handles set
/// - `follows blocked accounts`: only when set through
///   [`DecisionRule::with_follows_blocked`]
pub struct DecisionRule {
    provider: Arc<dyn DecisionProvider>,
    phrases: Arc<BannedPhraseSet>,
    virality: ViralityRule,
    followed: HashSet<String>,
    follows_blocked: Option<bool>,
}

impl DecisionRule {
    pub fn new(
        provider: Arc<dyn DecisionProvider>,
        phrases: Arc<BannedPhraseSet>,
        virality: ViralityRule,
    ) -> Self {
        Self {
            provider,
            phrases,
            virality,
            followed: HashSet::new(),
            follows_blocked: None,
        }
    }

    /// Handles the session account follows (builder pattern)
    pub fn with_followed<S: AsRef<str>>(mut self, handles: impl IntoIterator<Item = S>) -> Self {
        self.followed = handles
            .into_iter()
            .map(|handle| handle.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Whether the session account follows too many blocked accounts
    ///
    /// Usually computed once per session with
    /// [`signals::follows_too_many_blocked`].
    pub fn with_follows_blocked(mut self, follows_blocked: bool) -> Self {
        self.follows_blocked = Some(follows_blocked);
        self
    }

    /// Signal vector describing `record`
    pub fn signals_for(&self, record: &PostRecord) -> SignalVector {
        let followed = !record.author_handle.is_empty()
            && self.followed.contains(&record.author_handle.to_lowercase());

        let signals = SignalVector::new()
            .with(HAS_USED_BANWORD, self.phrases.matches(record.text_or_empty()))
            .with(IS_VIRAL, self.virality.is_viral(&record.engagement))
            .with(IS_IN_FOLLOWED_FEED, followed);
        match self.follows_blocked {
            Some(value) => signals.with(FOLLOWS_BLOCKED_ACCOUNTS, value),
            None => signals,
        }
    }
}

impl SuppressionRule for DecisionRule {
    fn name(&self) -> &str {
        "DecisionRule"
    }

    fn should_suppress(&self, record: &PostRecord) -> Result<bool> {
        let signals = self.signals_for(record);
        let decisions = self
            .provider
            .decide(&signals)
            .context("Decision provider failed")?;
        Ok(decisions.is_set(BLOCK_POST))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_model::Engagement;
    use signals::{LocalDecisionTable, SignalError};

    struct Unreachable;

    impl DecisionProvider for Unreachable {
        fn decide(&self, _signals: &SignalVector) -> signals::Result<SignalVector> {
            Err(SignalError::Service("connection refused".to_string()))
        }
    }

    fn phrases() -> Arc<BannedPhraseSet> {
        Arc::new(BannedPhraseSet::new(["trump"]))
    }

    #[test]
    fn test_signals_for_record() {
        let rule = DecisionRule::new(
            Arc::new(LocalDecisionTable::default()),
            phrases(),
            ViralityRule::default(),
        )
        .with_followed(["Friend.test"]);

        let record = PostRecord {
            text: Some("Trump rally".to_string()),
            author_handle: "friend.test".to_string(),
            permalink: String::new(),
            engagement: Engagement::new(Some(5), Some(900)),
        };
        let signals = rule.signals_for(&record);

        assert!(signals.is_set(HAS_USED_BANWORD));
        assert!(signals.is_set(IS_VIRAL));
        assert!(signals.is_set(IS_IN_FOLLOWED_FEED));
        assert_eq!(signals.get(FOLLOWS_BLOCKED_ACCOUNTS), None);
    }

    #[test]
    fn test_follows_blocked_signal_reaches_provider() {
        let follows = vec!["a.test".to_string(), "b.test".to_string(), "c.test".to_string()];
        let blocked = vec!["b.test".to_string()];
        let table = LocalDecisionTable::new(
            [HAS_USED_BANWORD, IS_VIRAL, IS_IN_FOLLOWED_FEED, FOLLOWS_BLOCKED_ACCOUNTS],
            [FOLLOWS_BLOCKED_ACCOUNTS],
        );
        let rule = DecisionRule::new(Arc::new(table), phrases(), ViralityRule::default())
            .with_follows_blocked(signals::follows_too_many_blocked(&follows, &blocked, 5.0));
        let record = PostRecord {
            text: Some("cat picture".to_string()),
            ..Default::default()
        };

        assert_eq!(rule.signals_for(&record).get(FOLLOWS_BLOCKED_ACCOUNTS), Some(true));
        assert!(rule.should_suppress(&record).unwrap());
    }

    #[test]
    fn test_viral_only_policy() {
        let table = LocalDecisionTable::new(
            [HAS_USED_BANWORD, IS_VIRAL, IS_IN_FOLLOWED_FEED],
            [IS_VIRAL],
        );
        let rule = DecisionRule::new(Arc::new(table), phrases(), ViralityRule::new(10, 10));

        let quiet = PostRecord {
            text: Some("trump".to_string()),
            ..Default::default()
        };
        let loud = PostRecord {
            text: Some("cat picture".to_string()),
            engagement: Engagement::new(Some(50), None),
            ..Default::default()
        };

        assert!(!rule.should_suppress(&quiet).unwrap());
        assert!(rule.should_suppress(&loud).unwrap());
    }

    #[test]
    fn test_provider_failure_is_an_error() {
        let rule = DecisionRule::new(Arc::new(Unreachable), phrases(), ViralityRule::default());
        let record = PostRecord {
            text: Some("trump".to_string()),
            ..Default::default()
        };

        let err = rule.should_suppress(&record).unwrap_err();
        assert!(format!("{:#}", err).contains("connection refused"));
    }
}
