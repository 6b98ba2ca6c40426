//! In-memory feed that behaves like a live, concurrently re-rendered page.
//!
//! `SimulatedFeed` implements [`RenderedView`] over a list of posts kept
//! behind a mutex, so a test (or the replay CLI) can scroll, reveal posts,
//! invalidate elements and take the page down while the engine is running.
//! Every removal performed through the view is recorded for assertions.

use crate::error::{Result, ViewError};
use crate::view::{RenderedView, Selector};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Stable identifier of a post inside a simulated feed
pub type SimPostId = u64;

/// One post as the simulated renderer shows it
///
/// Fields left as `None` are simply not rendered, which is how partially
/// loaded feed items look in practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedPost {
    pub text: Option<String>,
    pub author_handle: Option<String>,
    pub permalink: Option<String>,
    /// Rendered repost counter, e.g. `"1.2K"`
    pub reposts: Option<String>,
    /// Rendered like counter
    pub likes: Option<String>,
    /// Rendered but not displayed (collapsed, off-screen placeholder)
    pub hidden: bool,
    /// Every read on the container fails with a stale reference
    pub stale: bool,
    /// Only the text element is stale
    pub stale_text: bool,
}

impl SimulatedPost {
    /// A fully rendered post with the given text and author
    pub fn new(text: impl Into<String>, author_handle: impl Into<String>) -> Self {
        let author_handle = author_handle.into();
        Self {
            text: Some(text.into()),
            permalink: Some(format!("/profile/{}/post/3k{}", author_handle, author_handle.len())),
            author_handle: Some(author_handle),
            ..Default::default()
        }
    }

    pub fn with_counts(mut self, reposts: impl Into<String>, likes: impl Into<String>) -> Self {
        self.reposts = Some(reposts.into());
        self.likes = Some(likes.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_stale_text(mut self) -> Self {
        self.stale_text = true;
        self
    }
}

/// Which part of a post a [`SimElement`] points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimPart {
    Container,
    Text,
    AuthorLink,
    PostLink,
    RepostCount,
    LikeCount,
}

/// Element handle handed out by [`SimulatedFeed`]
///
/// Handles are plain ids; they go stale as soon as the post is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimElement {
    pub post_id: SimPostId,
    pub part: SimPart,
}

#[derive(Debug, Default)]
struct FeedState {
    posts: Vec<(SimPostId, SimulatedPost)>,
    next_id: SimPostId,
    scroll: f64,
    removed: Vec<SimPostId>,
    snapshots: usize,
    failing_snapshots: u32,
    failing_scroll_reads: u32,
    failing_removals: u32,
    disconnected: bool,
}

impl FeedState {
    fn check_connected(&self) -> Result<()> {
        if self.disconnected {
            return Err(ViewError::Disconnected("simulated page closed".to_string()));
        }
        Ok(())
    }

    fn live_post(&self, element: &SimElement) -> Result<&SimulatedPost> {
        self.check_connected()?;
        let post = self
            .posts
            .iter()
            .find(|(id, _)| *id == element.post_id)
            .map(|(_, post)| post)
            .ok_or_else(|| ViewError::StaleElement(format!("post {} was removed", element.post_id)))?;
        if post.stale || (post.stale_text && element.part == SimPart::Text) {
            return Err(ViewError::StaleElement(format!(
                "post {} is being re-rendered",
                element.post_id
            )));
        }
        Ok(post)
    }
}

/// Thread-safe in-memory implementation of [`RenderedView`]
#[derive(Debug, Default)]
pub struct SimulatedFeed {
    state: Mutex<FeedState>,
}

impl SimulatedFeed {
    /// Create an empty feed scrolled to the top
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feed already rendering `posts`
    pub fn with_posts(posts: impl IntoIterator<Item = SimulatedPost>) -> Self {
        let feed = Self::new();
        for post in posts {
            feed.push(post);
        }
        feed
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render a new post at the bottom of the feed
    pub fn push(&self, post: SimulatedPost) -> SimPostId {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.posts.push((id, post));
        id
    }

    /// Set the scroll offset, as a user scrolling would
    pub fn scroll_to(&self, offset: f64) {
        self.state().scroll = offset;
    }

    /// Move the scroll offset by `delta`
    pub fn scroll_by(&self, delta: f64) {
        self.state().scroll += delta;
    }

    /// Drop a post the way the renderer would (virtualized list, refresh)
    ///
    /// This is not recorded as a suppression.
    pub fn unrender(&self, id: SimPostId) -> bool {
        let mut state = self.state();
        let before = state.posts.len();
        state.posts.retain(|(post_id, _)| *post_id != id);
        state.posts.len() != before
    }

    /// Mark a post's container as stale (`true`) or live again (`false`)
    pub fn set_stale(&self, id: SimPostId, stale: bool) {
        let mut state = self.state();
        if let Some((_, post)) = state.posts.iter_mut().find(|(post_id, _)| *post_id == id) {
            post.stale = stale;
        }
    }

    /// Make the next `count` feed snapshots fail with `Unavailable`
    pub fn fail_snapshots(&self, count: u32) {
        self.state().failing_snapshots = count;
    }

    /// Make the next `count` scroll reads fail with `Unavailable`
    pub fn fail_scroll_reads(&self, count: u32) {
        self.state().failing_scroll_reads = count;
    }

    /// Make the next `count` removals fail with `Unavailable`
    pub fn fail_removals(&self, count: u32) {
        self.state().failing_removals = count;
    }

    /// Close the page for good; every later call fails with `Disconnected`
    pub fn disconnect(&self) {
        self.state().disconnected = true;
    }

    /// Whether post `id` is still rendered
    pub fn contains(&self, id: SimPostId) -> bool {
        self.state().posts.iter().any(|(post_id, _)| *post_id == id)
    }

    /// Number of posts currently rendered
    pub fn len(&self) -> usize {
        self.state().posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Texts of the rendered posts, in feed order
    pub fn rendered_texts(&self) -> Vec<Option<String>> {
        self.state()
            .posts
            .iter()
            .map(|(_, post)| post.text.clone())
            .collect()
    }

    /// Ids removed through [`RenderedView::remove`], in removal order
    pub fn removed_ids(&self) -> Vec<SimPostId> {
        self.state().removed.clone()
    }

    /// Number of feed snapshots taken so far (one per filtering pass)
    pub fn snapshot_count(&self) -> usize {
        self.state().snapshots
    }
}

impl RenderedView for SimulatedFeed {
    type Element = SimElement;

    fn find_all(&self, selector: Selector) -> Result<Vec<SimElement>> {
        let mut state = self.state();
        state.check_connected()?;
        if selector != Selector::FeedItem {
            return Ok(Vec::new());
        }
        state.snapshots += 1;
        if state.failing_snapshots > 0 {
            state.failing_snapshots -= 1;
            return Err(ViewError::Unavailable("feed is reloading".to_string()));
        }
        Ok(state
            .posts
            .iter()
            .map(|(id, _)| SimElement {
                post_id: *id,
                part: SimPart::Container,
            })
            .collect())
    }

    fn find_within(&self, element: &SimElement, selector: Selector) -> Result<Vec<SimElement>> {
        let state = self.state();
        let post = state.live_post(element)?;
        if element.part != SimPart::Container {
            return Ok(Vec::new());
        }
        let (part, rendered) = match selector {
            Selector::FeedItem => return Ok(Vec::new()),
            Selector::PostText => (SimPart::Text, post.text.is_some()),
            Selector::AuthorLink => (SimPart::AuthorLink, post.author_handle.is_some()),
            Selector::PostLink => (SimPart::PostLink, post.permalink.is_some()),
            Selector::RepostCount => (SimPart::RepostCount, post.reposts.is_some()),
            Selector::LikeCount => (SimPart::LikeCount, post.likes.is_some()),
        };
        if !rendered {
            return Ok(Vec::new());
        }
        Ok(vec![SimElement {
            post_id: element.post_id,
            part,
        }])
    }

    fn is_displayed(&self, element: &SimElement) -> Result<bool> {
        let state = self.state();
        Ok(!state.live_post(element)?.hidden)
    }

    fn text(&self, element: &SimElement) -> Result<String> {
        let state = self.state();
        let post = state.live_post(element)?;
        let text = match element.part {
            SimPart::Container | SimPart::Text => post.text.clone(),
            SimPart::RepostCount => post.reposts.clone(),
            SimPart::LikeCount => post.likes.clone(),
            SimPart::AuthorLink | SimPart::PostLink => None,
        };
        Ok(text.unwrap_or_default())
    }

    fn attribute(&self, element: &SimElement, name: &str) -> Result<Option<String>> {
        let state = self.state();
        let post = state.live_post(element)?;
        if name != "href" {
            return Ok(None);
        }
        Ok(match element.part {
            SimPart::AuthorLink => post
                .author_handle
                .as_ref()
                .map(|handle| format!("https://bsky.app/profile/{}", handle)),
            SimPart::PostLink => post.permalink.clone(),
            _ => None,
        })
    }

    fn remove(&self, element: &SimElement) -> Result<()> {
        let mut state = self.state();
        state.live_post(element)?;
        if state.failing_removals > 0 {
            state.failing_removals -= 1;
            return Err(ViewError::Unavailable("page is re-rendering".to_string()));
        }
        if element.part == SimPart::Container {
            state.posts.retain(|(id, _)| *id != element.post_id);
            state.removed.push(element.post_id);
        }
        Ok(())
    }

    fn scroll_offset(&self) -> Result<f64> {
        let mut state = self.state();
        state.check_connected()?;
        if state.failing_scroll_reads > 0 {
            state.failing_scroll_reads -= 1;
            return Err(ViewError::Unavailable("scroll position unreadable".to_string()));
        }
        Ok(state.scroll)
    }
}
