//! Filtering engine and its scroll-triggered scheduler.
//!
//! - [`FilterEngine`] runs one extract, dedup, match, suppress pass and owns
//!   the session's processed set
//! - [`ScrollScheduler`] decides when passes run, from scroll movement
//! - [`EngineConfig`] describes a session and builds its suppression policy
//!
//! ## Example Usage
//! ```ignore
//! use engine::{EngineConfig, FilterEngine, ScrollScheduler};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = EngineConfig::load(Path::new("feedguard.toml"))?;
//! let scheduler = ScrollScheduler::new(view, FilterEngine::from_config(&config), &config.scheduler);
//! let summary = scheduler.run(CancellationToken::new()).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scheduler;

pub use config::{EngineConfig, SchedulerConfig, ViralityConfig};
pub use engine::{FilterEngine, PassReport};
pub use error::{ConfigError, EngineError};
pub use scheduler::{SchedulerState, SchedulerSummary, ScrollScheduler};
