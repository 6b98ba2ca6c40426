//! # Signals Crate
//!
//! Interfaces to the services that sit around the feed filter without being
//! part of it:
//!
//! ### Graph service
//! List and follow-graph membership on the social network: block lists,
//! followed accounts, handle resolution. [`graph::GraphService`] is the seam;
//! the crate only ships the account parsing and the pure heuristics built on
//! top of it.
//!
//! ### Decision provider
//! A remote rule engine that turns named boolean signals ("is viral",
//! "has used banword", ...) into named boolean decisions ("block post").
//! [`decision::DecisionProvider`] is the seam; [`decision::LocalDecisionTable`]
//! is an in-process stand-in.
//!
//! ## Example Usage
//!
//! ```ignore
//! use signals::{AccountRef, GraphService, block_account};
//!
//! let account = AccountRef::parse("https://bsky.app/profile/spam.example")?;
//! let id = block_account(&service, "block list", &account)?;
//! ```

use thiserror::Error;

// Public modules
pub mod decision;
pub mod graph;

// Re-export commonly used types
pub use decision::{
    BLOCK_POST, DecisionProvider, DecisionVector, FOLLOWS_BLOCKED_ACCOUNTS, HAS_USED_BANWORD,
    IS_IN_FOLLOWED_FEED, IS_VIRAL, LocalDecisionTable, NamedFlags, SignalVector,
};
pub use graph::{
    AccountRef, GraphService, ListId, StableId, block_account, blocked_follow_share,
    follows_too_many_blocked,
};

/// Errors raised by external signal providers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The account reference could not be turned into a handle
    #[error("Invalid account reference: {0:?}")]
    InvalidAccount(String),

    /// A named list does not exist
    #[error("List not found: {0}")]
    ListNotFound(String),

    /// The provider does not know a signal name
    #[error("Unknown signal: {0}")]
    UnknownSignal(String),

    /// The provider could not be reached or answered with an error
    #[error("Service error: {0}")]
    Service(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SignalError>;
