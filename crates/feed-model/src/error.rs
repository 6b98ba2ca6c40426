//! Error types for reads and writes against a rendered view.
//!
//! The renderer mutates the tree while we read it, so every operation on a
//! [`RenderedView`](crate::view::RenderedView) can fail. The variants split into
//! two scopes:
//!
//! - **Element-scoped**: one element went away or lacks a child. Callers recover
//!   locally (empty field, no-op removal).
//! - **View-scoped**: the whole page is unreadable. `Unavailable` aborts the
//!   current pass; `Disconnected` ends the session.

use thiserror::Error;

/// Errors returned by a rendered view
///
/// Rust concept: `#[derive(Error)]` gives us `Display` from the `#[error(...)]`
/// attributes and an `std::error::Error` impl for free.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The element reference no longer points at a live element
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// A required child element is not rendered
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// The view cannot be read right now (navigation, re-render of the whole page)
    #[error("view unavailable: {0}")]
    Unavailable(String),

    /// The view handle is permanently gone (window closed, session ended)
    #[error("view disconnected: {0}")]
    Disconnected(String),
}

impl ViewError {
    /// True for failures that only concern a single element.
    pub fn is_element_scoped(&self) -> bool {
        matches!(self, ViewError::StaleElement(_) | ViewError::NoSuchElement(_))
    }

    /// True when retrying can never succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ViewError::Disconnected(_))
    }

    /// Promote an element-scoped failure to a view-scoped one.
    ///
    /// Used where the failing element is the view root itself, e.g. the
    /// top-level feed query.
    pub fn into_view_scoped(self) -> Self {
        match self {
            ViewError::StaleElement(reason) | ViewError::NoSuchElement(reason) => {
                ViewError::Unavailable(reason)
            }
            other => other,
        }
    }
}

/// Convenience type alias for view results
pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes() {
        assert!(ViewError::StaleElement("post".into()).is_element_scoped());
        assert!(ViewError::NoSuchElement("postText".into()).is_element_scoped());
        assert!(!ViewError::Unavailable("reload".into()).is_element_scoped());
        assert!(!ViewError::Disconnected("closed".into()).is_element_scoped());

        assert!(ViewError::Disconnected("closed".into()).is_permanent());
        assert!(!ViewError::Unavailable("reload".into()).is_permanent());
    }

    #[test]
    fn test_into_view_scoped() {
        let err = ViewError::StaleElement("feed".into()).into_view_scoped();
        assert_eq!(err, ViewError::Unavailable("feed".into()));

        let err = ViewError::Disconnected("gone".into()).into_view_scoped();
        assert!(err.is_permanent());
    }
}
