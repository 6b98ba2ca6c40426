//! The SuppressionPolicy orchestrates multiple rules.
//!
//! This module provides the main SuppressionPolicy struct that chains
//! multiple rules together using the builder pattern.

use crate::traits::SuppressionRule;
use feed_model::PostRecord;
use tracing;

/// Chains suppression rules; the first rule that fires wins.
///
/// ## Usage
/// ```ignore
/// let policy = SuppressionPolicy::new()
///     .add_rule(BannedPhraseRule::new(phrases.clone()))
///     .add_rule(ViralityRule::new(100, 100));
///
/// if let Some(rule) = policy.evaluate(&record) {
///     // suppress, `rule` names the reason
/// }
/// ```
pub struct SuppressionPolicy {
    rules: Vec<Box<dyn SuppressionRule>>,
}

impl SuppressionPolicy {
    /// Create a new empty SuppressionPolicy.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule to the policy (builder pattern).
    pub fn add_rule(mut self, rule: impl SuppressionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide whether `record` should be suppressed.
    ///
    /// ## Algorithm
    /// 1. Records with empty or unreadable text are never suppressed
    /// 2. Rules run in insertion order until one returns `Ok(true)`
    /// 3. A rule error is logged and counts as "keep" for that rule
    ///
    /// # Returns
    /// The name of the rule that fired, or `None` to keep the post
    pub fn evaluate(&self, record: &PostRecord) -> Option<&str> {
        if record.text_or_empty().is_empty() {
            return None;
        }

        for rule in &self.rules {
            match rule.should_suppress(record) {
                Ok(true) => {
                    tracing::debug!("Rule {} fired", rule.name());
                    return Some(rule.name());
                }
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!("Rule {} failed, keeping post: {:#}", rule.name(), err);
                }
            }
        }
        None
    }
}

impl Default for SuppressionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
