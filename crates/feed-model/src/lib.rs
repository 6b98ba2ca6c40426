//! # Feed Model Crate
//!
//! Types shared by every stage of the feed filter: what a post looks like
//! once read from the page, how reads against the page fail, and the view
//! abstraction itself.
//!
//! ## Main Components
//!
//! - **types**: `PostRecord`, `Engagement`, `LivePost`
//! - **error**: `ViewError` and its element/view scopes
//! - **view**: the `RenderedView` trait and `Selector` locators
//! - **parser**: engagement counter and profile link parsing
//! - **simulated**: `SimulatedFeed`, an in-memory view for tests and replays
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_model::{RenderedView, Selector, SimulatedFeed, SimulatedPost};
//!
//! let feed = SimulatedFeed::with_posts(vec![
//!     SimulatedPost::new("Weather update", "afpfr.bsky.social"),
//! ]);
//!
//! for item in feed.find_all(Selector::FeedItem)? {
//!     println!("{}", feed.text(&item)?);
//! }
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod simulated;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use error::{Result, ViewError};
pub use simulated::{SimElement, SimPart, SimPostId, SimulatedFeed, SimulatedPost};
pub use types::{Engagement, LivePost, PostRecord};
pub use view::{RenderedView, Selector};
