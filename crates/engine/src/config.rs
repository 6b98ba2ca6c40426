//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so a config file only needs
//! the phrases:
//!
//! ```toml
//! banned_phrases = ["Luis Rubiales", "trump"]
//!
//! [scheduler]
//! poll_interval_ms = 500
//! settle_delay_ms = 1000
//! max_consecutive_failures = 20
//!
//! [virality]
//! enabled = false
//! repost_threshold = 100
//! like_threshold = 100
//! ```

use crate::error::ConfigError;
use pipeline::rules::{AuthorListRule, BannedPhraseRule, ViralityRule};
use pipeline::rules::virality::{DEFAULT_LIKE_THRESHOLD, DEFAULT_REPOST_THRESHOLD};
use pipeline::{BannedPhraseSet, SuppressionPolicy};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration of one filtering session
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Phrases whose presence suppresses a post (case-insensitive substring)
    pub banned_phrases: Vec<String>,
    /// Authors whose posts are always suppressed (`@handle`, handle or profile URL)
    pub blocked_authors: Vec<String>,
    pub scheduler: SchedulerConfig,
    pub virality: ViralityConfig,
}

/// Timing of the scroll-triggered scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Interval between two scroll-position reads while idle
    pub poll_interval_ms: u64,
    /// Wait after a scroll change before filtering
    pub settle_delay_ms: u64,
    /// Consecutive failed passes (or scroll reads) tolerated before giving up
    pub max_consecutive_failures: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            settle_delay_ms: 1_000,
            max_consecutive_failures: 20,
        }
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Optional engagement-based suppression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViralityConfig {
    pub enabled: bool,
    pub repost_threshold: u64,
    pub like_threshold: u64,
}

impl Default for ViralityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            repost_threshold: DEFAULT_REPOST_THRESHOLD,
            like_threshold: DEFAULT_LIKE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Read, parse and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file without validating it
    ///
    /// For callers that merge in more settings before validating.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            origin: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a usable session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.scheduler.max_consecutive_failures == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.max_consecutive_failures must be greater than zero".to_string(),
            ));
        }
        if self.phrase_set().is_empty() && !self.virality.enabled && self.blocked_authors.is_empty()
        {
            return Err(ConfigError::Invalid(
                "no banned phrase, blocked author or virality rule configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Normalized phrase set
    pub fn phrase_set(&self) -> BannedPhraseSet {
        BannedPhraseSet::new(&self.banned_phrases)
    }

    /// Build the suppression policy this config describes
    ///
    /// The phrase rule always comes first, then the author list, then virality.
    pub fn build_policy(&self, phrases: Arc<BannedPhraseSet>) -> SuppressionPolicy {
        let mut policy = SuppressionPolicy::new().add_rule(BannedPhraseRule::new(phrases));
        if !self.blocked_authors.is_empty() {
            policy = policy.add_rule(AuthorListRule::new("blocked_authors", &self.blocked_authors));
        }
        if self.virality.enabled {
            policy = policy.add_rule(ViralityRule::new(
                self.virality.repost_threshold,
                self.virality.like_threshold,
            ));
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = EngineConfig::from_toml_str(r#"banned_phrases = ["trump"]"#).unwrap();

        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.scheduler.poll_interval(), Duration::from_millis(500));
        assert_eq!(config.scheduler.settle_delay(), Duration::from_secs(1));
        assert!(!config.virality.enabled);
    }

    #[test]
    fn test_full_config() {
        let config = EngineConfig::from_toml_str(
            r#"
            banned_phrases = ["Luis Rubiales", "Amazon MGM"]
            blocked_authors = ["@spam.example"]

            [scheduler]
            poll_interval_ms = 250
            settle_delay_ms = 2000
            max_consecutive_failures = 5

            [virality]
            enabled = true
            like_threshold = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.banned_phrases.len(), 2);
        assert_eq!(config.scheduler.poll_interval_ms, 250);
        assert_eq!(config.scheduler.max_consecutive_failures, 5);
        assert_eq!(config.virality.like_threshold, 500);
        assert_eq!(config.virality.repost_threshold, DEFAULT_REPOST_THRESHOLD);

        let policy = config.build_policy(Arc::new(config.phrase_set()));
        assert_eq!(
            policy.rule_names(),
            vec!["BannedPhraseRule", "blocked_authors", "ViralityRule"]
        );
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = EngineConfig::from_toml_str(
            r#"
            banned_phrases = ["trump"]
            [scheduler]
            poll_interval_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_config_with_nothing_to_filter() {
        let err = EngineConfig::from_toml_str(r#"banned_phrases = ["   "]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let err = EngineConfig::from_toml_str(r#"banned_words = ["trump"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/feedguard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
