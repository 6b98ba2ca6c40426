//! List and follow-graph membership.
//!
//! The graph service itself lives on the social network; this module defines
//! the operations the filter may need from it and the pure helpers layered on
//! top (account parsing, the "share of follows blocked" heuristic, the
//! block-an-account workflow).

use crate::{Result, SignalError};
use std::collections::HashSet;
use tracing::{debug, info};

/// Identifier of a list on the social network (an at-uri on Bluesky)
pub type ListId = String;

/// Identifier that survives handle changes (a DID on Bluesky)
pub type StableId = String;

/// A user-supplied reference to an account
///
/// Accepts `@handle`, `handle`, or a profile URL; all normalize to the bare
/// lowercase handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountRef {
    handle: String,
}

impl AccountRef {
    /// Parse an account reference
    ///
    /// ```ignore
    /// assert_eq!(AccountRef::parse("@Alice.bsky.social")?.handle(), "alice.bsky.social");
    /// assert_eq!(AccountRef::parse("https://bsky.app/profile/bob.test")?.handle(), "bob.test");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let handle = if trimmed.starts_with("http") {
            trimmed
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or("")
        } else {
            trimmed.trim_start_matches('@')
        };
        let handle = handle.trim().to_lowercase();

        if handle.is_empty() || handle.contains(char::is_whitespace) {
            return Err(SignalError::InvalidAccount(raw.to_string()));
        }
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}

/// Membership queries and list edits against the social network
///
/// Implementations talk to the network and own authentication; the filter
/// never logs in itself.
pub trait GraphService: Send + Sync {
    /// Handles of every member of the caller's list named `list_name`
    fn list_members(&self, list_name: &str) -> Result<Vec<String>>;

    /// Handles followed by `account`
    fn followed_handles(&self, account: &AccountRef) -> Result<Vec<String>>;

    /// Resolve a handle to its stable identifier
    fn resolve_to_stable_id(&self, account: &AccountRef) -> Result<StableId>;

    /// Add an account to a list
    fn add_member(&self, list_id: &ListId, id: &StableId) -> Result<()>;

    /// Find the caller's list named `name`, creating it if needed
    fn get_or_create_list(&self, name: &str) -> Result<ListId>;
}

/// Add `account` to the caller's list named `list_name`
///
/// Creates the list on first use. Returns the stable id that was added.
pub fn block_account(
    service: &dyn GraphService,
    list_name: &str,
    account: &AccountRef,
) -> Result<StableId> {
    let list_id = service.get_or_create_list(list_name)?;
    let id = service.resolve_to_stable_id(account)?;
    debug!("Resolved {} to {}", account.handle(), id);

    service.add_member(&list_id, &id)?;
    info!("Added {} to list '{}'", account.handle(), list_name);
    Ok(id)
}

/// Percentage (0-100) of `follows` that also appear in `blocked`
///
/// An empty follow list yields 0.
pub fn blocked_follow_share(follows: &[String], blocked: &[String]) -> f64 {
    let follows: HashSet<&str> = follows.iter().map(String::as_str).collect();
    if follows.is_empty() {
        return 0.0;
    }
    let blocked: HashSet<&str> = blocked.iter().map(String::as_str).collect();
    let overlap = follows.intersection(&blocked).count();
    overlap as f64 / follows.len() as f64 * 100.0
}

/// Whether more than `threshold_pct` percent of `follows` are blocked
pub fn follows_too_many_blocked(follows: &[String], blocked: &[String], threshold_pct: f64) -> bool {
    blocked_follow_share(follows, blocked) > threshold_pct
}
