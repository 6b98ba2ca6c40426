//! Rule that suppresses posts containing a banned phrase.

use crate::matcher::BannedPhraseSet;
use crate::traits::SuppressionRule;
use anyhow::Result;
use feed_model::PostRecord;
use std::sync::Arc;
use tracing::debug;

/// Suppresses posts whose text contains any phrase of the set.
///
/// ## Algorithm
/// Lowercase substring test via [`BannedPhraseSet::first_match`]. Records
/// with unreadable or empty text never match.
pub struct BannedPhraseRule {
    phrases: Arc<BannedPhraseSet>,
}

impl BannedPhraseRule {
    pub fn new(phrases: Arc<BannedPhraseSet>) -> Self {
        Self { phrases }
    }

    pub fn phrases(&self) -> &BannedPhraseSet {
        &self.phrases
    }
}

impl SuppressionRule for BannedPhraseRule {
    fn name(&self) -> &str {
        "BannedPhraseRule"
    }

    fn should_suppress(&self, record: &PostRecord) -> Result<bool> {
        match self.phrases.first_match(record.text_or_empty()) {
            Some(phrase) => {
                debug!("Matched banned phrase '{}'", phrase);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
