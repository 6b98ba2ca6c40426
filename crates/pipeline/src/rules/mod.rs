//! Suppression rule implementations.
//!
//! This module contains all the concrete rules that can be composed into a
//! SuppressionPolicy. The banned-phrase rule is the core one; the others
//! bring in engagement, list membership and remote decisions.

pub mod author_list;
pub mod banned_phrase;
pub mod decision;
pub mod virality;

// Re-export for convenience
pub use author_list::AuthorListRule;
pub use banned_phrase::BannedPhraseRule;
pub use decision::DecisionRule;
pub use virality::ViralityRule;
