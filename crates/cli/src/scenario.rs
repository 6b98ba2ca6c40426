//! Scripted feed sessions for the `replay` command.
//!
//! A scenario is a JSON file with the posts rendered at startup and a
//! timeline of user actions:
//!
//! ```json
//! {
//!   "posts": [{ "text": "Weather update", "author_handle": "meteo.bsky.social" }],
//!   "steps": [
//!     { "at_ms": 700, "scroll_to": 400.0,
//!       "reveal": [{ "text": "Breaking: Luis Rubiales resigns", "author_handle": "afpfr.bsky.social" }] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use feed_model::{SimPostId, SimulatedFeed, SimulatedPost};
use serde::Deserialize;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::debug;

/// One user action at a fixed offset from the start of the replay
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    pub at_ms: u64,
    pub scroll_to: Option<f64>,
    pub scroll_by: Option<f64>,
    /// Posts rendered at the bottom of the feed
    pub reveal: Vec<SimulatedPost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    pub posts: Vec<SimulatedPost>,
    pub steps: Vec<Step>,
}

/// Texts of every post the replay rendered, by id
pub type RenderLog = HashMap<SimPostId, Option<String>>;

impl Scenario {
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut scenario: Self =
            serde_json::from_str(raw).context("Failed to parse scenario JSON")?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    /// Render the startup posts into a fresh feed
    pub fn initial_feed(&self, log: &mut RenderLog) -> SimulatedFeed {
        let feed = SimulatedFeed::new();
        reveal(&feed, &self.posts, log);
        feed
    }

    /// Offset of the last step
    pub fn last_step_ms(&self) -> u64 {
        self.steps.last().map(|step| step.at_ms).unwrap_or(0)
    }

    /// Play the timeline against `feed`, then wait `linger` so the last
    /// change can be filtered
    pub async fn play(&self, feed: &SimulatedFeed, log: &mut RenderLog, linger: Duration) {
        let start = Instant::now();
        for step in &self.steps {
            sleep_until(start + Duration::from_millis(step.at_ms)).await;
            step.apply(feed, log);
        }
        sleep(linger).await;
    }
}

impl Step {
    pub fn apply(&self, feed: &SimulatedFeed, log: &mut RenderLog) {
        if let Some(offset) = self.scroll_to {
            feed.scroll_to(offset);
        }
        if let Some(delta) = self.scroll_by {
            feed.scroll_by(delta);
        }
        reveal(feed, &self.reveal, log);
        debug!("Applied step at {}ms ({} posts revealed)", self.at_ms, self.reveal.len());
    }
}

fn reveal(feed: &SimulatedFeed, posts: &[SimulatedPost], log: &mut RenderLog) {
    for post in posts {
        let id = feed.push(post.clone());
        log.insert(id, post.text.clone());
    }
}
