use std::sync::Arc;

use uuid::Uuid;

use crate::db::{BookmarkStore, ReactionStore};
use crate::error::Result;
use crate::models::{Post, ViewerContext};

/// Resolves what the viewing user has done with a post.
#[derive(Clone)]
pub struct ViewerContextResolver {
    reactions: Arc<dyn ReactionStore>,
    bookmarks: Arc<dyn BookmarkStore>,
}

impl ViewerContextResolver {
    pub fn new(reactions: Arc<dyn ReactionStore>, bookmarks: Arc<dyn BookmarkStore>) -> Self {
        Self {
            reactions,
            bookmarks,
        }
    }

    /// Anonymous viewers get the empty context without any store access.
    /// Authors never have their own post bookmarked, so that lookup is skipped too.
    pub async fn resolve(&self, post: &Post, viewer: Option<Uuid>) -> Result<ViewerContext> {
        let Some(viewer_id) = viewer else {
            return Ok(ViewerContext::ANONYMOUS);
        };

        let reaction = self.reactions.find(post.id, viewer_id);
        let bookmarked = async {
            if viewer_id == post.user_id {
                Ok(false)
            } else {
                self.bookmarks
                    .find(post.id, viewer_id)
                    .await
                    .map(|b| b.is_some())
            }
        };

        let (reaction, is_bookmarked) = tokio::try_join!(reaction, bookmarked)?;

        Ok(ViewerContext {
            user_reaction: reaction.map(|r| r.kind),
            is_bookmarked,
        })
    }
}
