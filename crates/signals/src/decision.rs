//! Named-signal decision interface.
//!
//! A decision provider receives a vector of named boolean signals describing
//! one post and answers with a vector of named boolean decisions. The filter
//! only reads the [`BLOCK_POST`] decision.

use crate::{Result, SignalError};
use std::collections::BTreeMap;
use tracing::debug;

/// The post text contains a banned phrase
pub const HAS_USED_BANWORD: &str = "has used banword";
/// The post's engagement is above the virality thresholds
pub const IS_VIRAL: &str = "is viral";
/// The author is followed by the session account
pub const IS_IN_FOLLOWED_FEED: &str = "is in followed feed";
/// The session account follows too many blocked accounts
pub const FOLLOWS_BLOCKED_ACCOUNTS: &str = "is 5% of followings blocked accounts";
/// Decision: remove the post from view
pub const BLOCK_POST: &str = "block post";

/// Ordered map from signal (or decision) name to its value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedFlags {
    flags: BTreeMap<String, bool>,
}

/// Input to a decision provider
pub type SignalVector = NamedFlags;

/// Output of a decision provider
pub type DecisionVector = NamedFlags;

impl NamedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag (builder style)
    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Value of a flag, `None` if it was never set
    pub fn get(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    /// Value of a flag, treating unset as `false`
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// A rule engine mapping signals to decisions
///
/// Remote implementations should fail with [`SignalError::UnknownSignal`]
/// when a signal name is not part of their project, rather than guessing.
pub trait DecisionProvider: Send + Sync {
    fn decide(&self, signals: &SignalVector) -> Result<DecisionVector>;
}

/// In-process decision provider: block when any trigger signal is set
///
/// Signals outside `known` are rejected, matching how a remote project
/// refuses elements it does not define.
#[derive(Debug, Clone)]
pub struct LocalDecisionTable {
    known: Vec<String>,
    triggers: Vec<String>,
}

impl LocalDecisionTable {
    /// # Arguments
    /// * `known` - Every signal name this table accepts
    /// * `triggers` - Signals that, when true, produce `block post = true`
    pub fn new<S: Into<String>>(
        known: impl IntoIterator<Item = S>,
        triggers: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            known: known.into_iter().map(Into::into).collect(),
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for LocalDecisionTable {
    /// Accepts the four standard signals, blocks on banned phrases only
    fn default() -> Self {
        Self::new(
            [HAS_USED_BANWORD, IS_VIRAL, IS_IN_FOLLOWED_FEED, FOLLOWS_BLOCKED_ACCOUNTS],
            [HAS_USED_BANWORD],
        )
    }
}

impl DecisionProvider for LocalDecisionTable {
    fn decide(&self, signals: &SignalVector) -> Result<DecisionVector> {
        if let Some(unknown) = signals.names().find(|name| !self.known.iter().any(|k| k == *name)) {
            return Err(SignalError::UnknownSignal(unknown.to_string()));
        }

        let block = self.triggers.iter().any(|trigger| signals.is_set(trigger));
        debug!("Local decision: {:?} -> block={}", signals, block);
        Ok(DecisionVector::new().with(BLOCK_POST, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_flags() {
        let flags = SignalVector::new()
            .with(IS_VIRAL, true)
            .with(HAS_USED_BANWORD, false);

        assert_eq!(flags.len(), 2);
        assert_eq!(flags.get(IS_VIRAL), Some(true));
        assert_eq!(flags.get(HAS_USED_BANWORD), Some(false));
        assert_eq!(flags.get(BLOCK_POST), None);
        assert!(!flags.is_set(BLOCK_POST));
        // BTreeMap keeps names sorted
        assert_eq!(flags.names().collect::<Vec<_>>(), vec![HAS_USED_BANWORD, IS_VIRAL]);
    }

    #[test]
    fn test_local_table_blocks_on_trigger() {
        let table = LocalDecisionTable::default();

        let banned = SignalVector::new()
            .with(HAS_USED_BANWORD, true)
            .with(IS_VIRAL, false);
        assert!(table.decide(&banned).unwrap().is_set(BLOCK_POST));

        let clean = SignalVector::new()
            .with(HAS_USED_BANWORD, false)
            .with(IS_VIRAL, true);
        assert_eq!(table.decide(&clean).unwrap().get(BLOCK_POST), Some(false));
    }

    #[test]
    fn test_local_table_rejects_unknown_signal() {
        let table = LocalDecisionTable::default();
        let signals = SignalVector::new().with("is spicy", true);

        assert_eq!(
            table.decide(&signals),
            Err(SignalError::UnknownSignal("is spicy".to_string()))
        );
    }
}
