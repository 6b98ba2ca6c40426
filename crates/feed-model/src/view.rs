//! The rendered-view abstraction the engine reads from and writes to.
//!
//! A view is owned by an external renderer (a browser page, a test fixture).
//! The engine only borrows element handles for the duration of one pass and
//! treats every call as fallible.

use crate::error::Result;
use std::sync::Arc;

/// Semantic locators for the parts of a feed the engine cares about
///
/// DOM-backed views use [`Selector::xpath`]; other views can match on the
/// variant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// A feed item container (one per post)
    FeedItem,
    /// The post body inside a feed item
    PostText,
    /// The link to the author's profile inside a feed item
    AuthorLink,
    /// The link to the post itself inside a feed item
    PostLink,
    /// The repost counter inside a feed item
    RepostCount,
    /// The like counter inside a feed item
    LikeCount,
}

impl Selector {
    /// XPath expression matching this selector in the Bluesky web client
    pub fn xpath(&self) -> &'static str {
        match self {
            Selector::FeedItem => "//div[starts-with(@data-testid, 'feedItem-by-')]",
            Selector::PostText => ".//div[@data-testid='postText']",
            Selector::AuthorLink => ".//a[@aria-label='View profile']",
            Selector::PostLink => {
                ".//a[starts-with(@href, '/profile/') and contains(@href, '/post/')]"
            }
            Selector::RepostCount => ".//div[@data-testid='repostCount']",
            Selector::LikeCount => ".//div[@data-testid='likeCount']",
        }
    }
}

/// A live, externally mutated tree of rendered posts
///
/// ## Contract
/// - Every method may fail at any time; two reads of the same element are not
///   guaranteed to be consistent.
/// - Element-scoped failures (`StaleElement`, `NoSuchElement`) concern only the
///   element passed in.
/// - `Unavailable` and `Disconnected` describe the whole view.
/// - `Send + Sync` lets the scheduler run on a multi-threaded runtime.
pub trait RenderedView: Send + Sync {
    /// Non-owning handle to a rendered element
    type Element: Clone + Send + Sync + std::fmt::Debug;

    /// Find every element in the view matching `selector`
    fn find_all(&self, selector: Selector) -> Result<Vec<Self::Element>>;

    /// Find every descendant of `element` matching `selector`
    fn find_within(&self, element: &Self::Element, selector: Selector)
    -> Result<Vec<Self::Element>>;

    /// Whether the element is currently displayed
    fn is_displayed(&self, element: &Self::Element) -> Result<bool>;

    /// Rendered text of the element
    fn text(&self, element: &Self::Element) -> Result<String>;

    /// Value of an attribute, `None` if the attribute is absent
    fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Remove the element from the rendered tree
    fn remove(&self, element: &Self::Element) -> Result<()>;

    /// Current vertical scroll offset of the view
    fn scroll_offset(&self) -> Result<f64>;
}

impl<V: RenderedView + ?Sized> RenderedView for Arc<V> {
    type Element = V::Element;

    fn find_all(&self, selector: Selector) -> Result<Vec<Self::Element>> {
        (**self).find_all(selector)
    }

    fn find_within(
        &self,
        element: &Self::Element,
        selector: Selector,
    ) -> Result<Vec<Self::Element>> {
        (**self).find_within(element, selector)
    }

    fn is_displayed(&self, element: &Self::Element) -> Result<bool> {
        (**self).is_displayed(element)
    }

    fn text(&self, element: &Self::Element) -> Result<String> {
        (**self).text(element)
    }

    fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>> {
        (**self).attribute(element, name)
    }

    fn remove(&self, element: &Self::Element) -> Result<()> {
        (**self).remove(element)
    }

    fn scroll_offset(&self) -> Result<f64> {
        (**self).scroll_offset()
    }
}
