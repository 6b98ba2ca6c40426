//! Pipeline stages of one filtering pass.
//!
//! This crate provides:
//! - SnapshotExtractor for reading post records out of a rendered view
//! - FingerprintIndex for at-most-once evaluation of each post
//! - BannedPhraseSet, the case-insensitive substring matcher
//! - SuppressionRule trait, its implementations and SuppressionPolicy
//! - Suppressor for removing posts from the view
//!
//! ## Architecture
//! A pass processes the snapshot in stages:
//! 1. The extractor reads every rendered feed item into a record
//! 2. The fingerprint index drops records already evaluated
//! 3. The policy runs its rules over the remaining records
//! 4. The suppressor removes the records a rule fired on
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{BannedPhraseSet, FingerprintIndex, SnapshotExtractor, SuppressionPolicy, Suppressor};
//! use pipeline::rules::BannedPhraseRule;
//!
//! let phrases = Arc::new(BannedPhraseSet::new(["Luis Rubiales"]));
//! let policy = SuppressionPolicy::new().add_rule(BannedPhraseRule::new(phrases));
//! let mut index = FingerprintIndex::new();
//!
//! for post in SnapshotExtractor::new().extract(&view)? {
//!     let fp = index.fingerprint(post.record.text.as_deref());
//!     if index.seen(&fp) {
//!         continue;
//!     }
//!     if policy.evaluate(&post.record).is_some() {
//!         Suppressor::new().suppress(&view, &post)?;
//!     }
//!     index.mark_seen(fp);
//! }
//! ```

pub mod executor;
pub mod extractor;
pub mod fingerprint;
pub mod matcher;
pub mod rules;
pub mod suppression_policy;
pub mod traits;

// Re-export main types
pub use executor::Suppressor;
pub use extractor::SnapshotExtractor;
pub use fingerprint::{Fingerprint, FingerprintIndex};
pub use matcher::BannedPhraseSet;
pub use suppression_policy::SuppressionPolicy;
pub use traits::SuppressionRule;
