//! Rule that suppresses posts with viral engagement.

use crate::traits::SuppressionRule;
use anyhow::Result;
use feed_model::{Engagement, PostRecord};

/// Default repost count above which a post counts as viral
pub const DEFAULT_REPOST_THRESHOLD: u64 = 100;
/// Default like count above which a post counts as viral
pub const DEFAULT_LIKE_THRESHOLD: u64 = 100;

/// Suppresses posts whose reposts or likes exceed a threshold.
///
/// Missing counters never count as viral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViralityRule {
    repost_threshold: u64,
    like_threshold: u64,
}

impl ViralityRule {
    /// Create a new ViralityRule.
    ///
    /// # Arguments
    /// * `repost_threshold` - Reposts strictly above this are viral
    /// * `like_threshold` - Likes strictly above this are viral
    pub fn new(repost_threshold: u64, like_threshold: u64) -> Self {
        Self {
            repost_threshold,
            like_threshold,
        }
    }

    pub fn is_viral(&self, engagement: &Engagement) -> bool {
        engagement.reposts.is_some_and(|n| n > self.repost_threshold)
            || engagement.likes.is_some_and(|n| n > self.like_threshold)
    }
}

impl Default for ViralityRule {
    fn default() -> Self {
        Self::new(DEFAULT_REPOST_THRESHOLD, DEFAULT_LIKE_THRESHOLD)
    }
}

impl SuppressionRule for ViralityRule {
    fn name(&self) -> &str {
        "ViralityRule"
    }

    fn should_suppress(&self, record: &PostRecord) -> Result<bool> {
        Ok(self.is_viral(&record.engagement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virality_thresholds() {
        let rule = ViralityRule::default();

        assert!(!rule.is_viral(&Engagement::new(Some(100), Some(100))));
        assert!(rule.is_viral(&Engagement::new(Some(101), Some(0))));
        assert!(rule.is_viral(&Engagement::new(None, Some(1200))));
        assert!(!rule.is_viral(&Engagement::default()));
    }

    #[test]
    fn test_virality_rule_reads_record() {
        let rule = ViralityRule::new(10, 500);
        let record = PostRecord {
            text: Some("hot take".to_string()),
            engagement: Engagement::new(Some(11), None),
            ..Default::default()
        };
        assert!(rule.should_suppress(&record).unwrap());
    }
}
