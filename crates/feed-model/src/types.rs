//! Core domain types for rendered feed posts.
//!
//! A [`PostRecord`] is rebuilt from the view on every pass. It never outlives
//! the pass, and neither does the element handle carried next to it in a
//! [`LivePost`].

use serde::{Deserialize, Serialize};

// =============================================================================
// Post-related Types
// =============================================================================

/// Engagement counters rendered under a post
///
/// Each counter is `None` when the counter is not rendered or its text could
/// not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub reposts: Option<u64>,
    pub likes: Option<u64>,
}

impl Engagement {
    pub fn new(reposts: Option<u64>, likes: Option<u64>) -> Self {
        Self { reposts, likes }
    }
}

/// Structured representation of one rendered feed item
///
/// Every field is best-effort. Partial records are expected while the feed
/// is still rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Post body
    ///
    /// - `None` means the text could not be read (stale element)
    /// - `Some("")` means the post carries no text element or no text
    pub text: Option<String>,
    /// Handle of the author, empty if the profile link was unreadable
    pub author_handle: String,
    /// Absolute or site-relative link to the post, possibly empty
    pub permalink: String,
    pub engagement: Engagement,
}

impl PostRecord {
    /// Text of the post, or `""` when the read failed
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Short preview for log lines
    pub fn preview(&self, max_chars: usize) -> String {
        let text = self.text_or_empty();
        let mut preview: String = text.chars().take(max_chars).collect();
        if text.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}

/// A post record paired with the live element it was read from
///
/// The element handle is owned by the rendering layer; holding it here does
/// not keep the element alive. Any read through it may fail.
#[derive(Debug, Clone)]
pub struct LivePost<E> {
    pub record: PostRecord,
    pub element: E,
    /// Whether the container was displayed when the snapshot was taken
    pub visible: bool,
}

impl<E> LivePost<E> {
    pub fn new(record: PostRecord, element: E, visible: bool) -> Self {
        Self {
            record,
            element,
            visible,
        }
    }
}
