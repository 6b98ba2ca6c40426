//! Suppression: remove a post from the rendered view.

use feed_model::{LivePost, RenderedView, ViewError};
use tracing::{debug, info};

/// Removes matched posts from the view
#[derive(Debug, Clone, Copy, Default)]
pub struct Suppressor;

impl Suppressor {
    pub fn new() -> Self {
        Self
    }

    /// Remove `post` from `view`
    ///
    /// A post that is already gone (removed or re-rendered by the renderer)
    /// is a no-op. Only view-scoped failures are returned.
    pub fn suppress<V: RenderedView>(
        &self,
        view: &V,
        post: &LivePost<V::Element>,
    ) -> Result<(), ViewError> {
        match view.remove(&post.element) {
            Ok(()) => {
                info!(
                    "Removed post: {} by {}, post link: {}",
                    post.record.preview(25),
                    post.record.author_handle,
                    post.record.permalink
                );
                Ok(())
            }
            Err(err) if err.is_element_scoped() => {
                debug!("Post already gone before removal: {}", err);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
