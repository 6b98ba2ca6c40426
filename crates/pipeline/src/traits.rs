//! Core traits for the suppression pipeline.
//!
//! This module defines the SuppressionRule trait that allows composable,
//! extensible predicates to decide whether a post leaves the view.

use anyhow::Result;
use feed_model::PostRecord;

/// Core trait for deciding whether a post should be suppressed.
///
/// All rules must implement this trait to be used in the SuppressionPolicy.
///
/// ## Design Note
/// - `Send + Sync` lets the policy be shared with the scheduler task
/// - Rules see only the extracted record, never the live element, so they
///   cannot touch the view
/// - An `Err` is a per-post failure; the policy logs it and moves on
pub trait SuppressionRule: Send + Sync {
    /// Returns the name of this rule (for logging/debugging)
    fn name(&self) -> &str;

    /// Decide whether `record` should be removed from view.
    ///
    /// # Returns
    /// * `Ok(true)` - Suppress the post
    /// * `Ok(false)` - Keep the post
    /// * `Err` - The rule could not decide for this post
    fn should_suppress(&self, record: &PostRecord) -> Result<bool>;
}
