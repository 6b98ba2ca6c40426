//! Snapshot extraction: turn the rendered feed into post records.
//!
//! Each feed item is read field by field. A field whose element is stale or
//! not rendered comes back empty; only a failure of the whole view aborts the
//! snapshot.

use feed_model::parser::{handle_from_href, parse_count};
use feed_model::{Engagement, LivePost, PostRecord, RenderedView, Selector, ViewError};
use tracing::{debug, trace};

/// Reads every rendered feed item out of a view
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotExtractor;

impl SnapshotExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Take a snapshot of the posts currently rendered in `view`
    ///
    /// # Returns
    /// * `Ok(posts)` - One entry per feed item, in render order; fields may be
    ///   partial
    /// * `Err` - The view itself could not be read (always view-scoped)
    pub fn extract<V: RenderedView>(
        &self,
        view: &V,
    ) -> Result<Vec<LivePost<V::Element>>, ViewError> {
        let containers = view
            .find_all(Selector::FeedItem)
            .map_err(ViewError::into_view_scoped)?;

        let mut posts = Vec::with_capacity(containers.len());
        for container in containers {
            posts.push(self.read_post(view, container)?);
        }
        debug!("Extracted {} feed items", posts.len());
        Ok(posts)
    }

    fn read_post<V: RenderedView>(
        &self,
        view: &V,
        container: V::Element,
    ) -> Result<LivePost<V::Element>, ViewError> {
        let visible = recover(view.is_displayed(&container))?.unwrap_or(false);

        let text = post_text(view, &container)?;
        let author_handle = child_href(view, &container, Selector::AuthorLink)?
            .map(|href| handle_from_href(&href))
            .unwrap_or_default();
        let permalink = child_href(view, &container, Selector::PostLink)?.unwrap_or_default();

        let reposts = child_text(view, &container, Selector::RepostCount)?
            .and_then(|raw| parse_count(&raw));
        let likes =
            child_text(view, &container, Selector::LikeCount)?.and_then(|raw| parse_count(&raw));

        let record = PostRecord {
            text,
            author_handle,
            permalink,
            engagement: Engagement::new(reposts, likes),
        };
        Ok(LivePost::new(record, container, visible))
    }
}

/// Swallow element-scoped failures, keep view-scoped ones
fn recover<T>(result: Result<T, ViewError>) -> Result<Option<T>, ViewError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_element_scoped() => {
            trace!("Recovered element read: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn first_child<V: RenderedView>(
    view: &V,
    container: &V::Element,
    selector: Selector,
) -> Result<Option<V::Element>, ViewError> {
    let children = recover(view.find_within(container, selector))?;
    Ok(children.and_then(|children| children.into_iter().next()))
}

fn child_text<V: RenderedView>(
    view: &V,
    container: &V::Element,
    selector: Selector,
) -> Result<Option<String>, ViewError> {
    match first_child(view, container, selector)? {
        Some(child) => recover(view.text(&child)),
        None => Ok(None),
    }
}

/// Body of a post
///
/// A post without a text element (image-only) reads as `Some("")`. `None` is
/// reserved for a container or text element that went stale mid-read.
fn post_text<V: RenderedView>(
    view: &V,
    container: &V::Element,
) -> Result<Option<String>, ViewError> {
    let Some(children) = recover(view.find_within(container, Selector::PostText))? else {
        return Ok(None);
    };
    match children.into_iter().next() {
        Some(child) => recover(view.text(&child)),
        None => Ok(Some(String::new())),
    }
}

fn child_href<V: RenderedView>(
    view: &V,
    container: &V::Element,
    selector: Selector,
) -> Result<Option<String>, ViewError> {
    match first_child(view, container, selector)? {
        Some(child) => Ok(recover(view.attribute(&child, "href"))?.flatten()),
        None => Ok(None),
    }
}
