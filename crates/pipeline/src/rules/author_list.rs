//! Rule that suppresses posts by authors on a list.
//!
//! The handle set is a snapshot taken when the rule is built, typically from
//! a block list on the graph service. It is not refreshed during a session.

use crate::traits::SuppressionRule;
use anyhow::Result;
use feed_model::PostRecord;
use signals::{AccountRef, GraphService};
use std::collections::HashSet;
use tracing::{info, warn};

/// Suppresses posts whose author handle is in a fixed set.
pub struct AuthorListRule {
    list_name: String,
    handles: HashSet<String>,
}

impl AuthorListRule {
    /// Build from raw account references (`@handle`, handle, profile URL)
    ///
    /// References that do not parse are skipped with a warning.
    pub fn new<S: AsRef<str>>(list_name: impl Into<String>, accounts: impl IntoIterator<Item = S>) -> Self {
        let list_name = list_name.into();
        let mut handles = HashSet::new();
        for account in accounts {
            match AccountRef::parse(account.as_ref()) {
                Ok(account) => {
                    handles.insert(account.handle().to_string());
                }
                Err(err) => warn!("Skipping entry of '{}': {}", list_name, err),
            }
        }
        Self { list_name, handles }
    }

    /// Snapshot the members of `list_name` from the graph service
    pub fn from_service(service: &dyn GraphService, list_name: &str) -> signals::Result<Self> {
        let members = service.list_members(list_name)?;
        info!("{} users found in list '{}'", members.len(), list_name);
        Ok(Self::new(list_name, members))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.handles.contains(&handle.to_lowercase())
    }
}

impl SuppressionRule for AuthorListRule {
    fn name(&self) -> &str {
        &self.list_name
    }

    fn should_suppress(&self, record: &PostRecord) -> Result<bool> {
        if record.author_handle.is_empty() {
            return Ok(false);
        }
        Ok(self.contains(&record.author_handle))
    }
}
