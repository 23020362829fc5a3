use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::db::{BookmarkStore, PostStore, Stores};
use crate::error::{AppError, Result};
use crate::metrics::engagement::BOOKMARK_TOGGLE_TOTAL;
use crate::models::{BookmarkToggleResponse, NewBookmark, Post};

pub struct BookmarkService {
    posts: Arc<dyn PostStore>,
    bookmarks: Arc<dyn BookmarkStore>,
}

impl BookmarkService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            bookmarks: stores.bookmarks.clone(),
        }
    }

    /// Bookmark the post if it is not bookmarked yet, otherwise remove the bookmark.
    /// Users cannot bookmark their own posts.
    pub async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<BookmarkToggleResponse> {
        let post = self.require_post(post_id).await?;

        if post.user_id == user_id {
            warn!(post_id = %post_id, user_id = %user_id, "rejected bookmark of own post");
            BOOKMARK_TOGGLE_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(AppError::Forbidden(
                "You cannot bookmark your own post".to_string(),
            ));
        }

        let response = match self.bookmarks.find(post_id, user_id).await? {
            Some(existing) => {
                self.bookmarks.delete(existing.id).await?;
                BOOKMARK_TOGGLE_TOTAL.with_label_values(&["removed"]).inc();
                BookmarkToggleResponse {
                    message: "Bookmark removed successfully".to_string(),
                    is_bookmarked: false,
                }
            }
            None => {
                self.bookmarks
                    .create(NewBookmark {
                        user_id,
                        post_id,
                        post_author_id: post.user_id,
                    })
                    .await?;
                BOOKMARK_TOGGLE_TOTAL.with_label_values(&["added"]).inc();
                BookmarkToggleResponse {
                    message: "Post bookmarked successfully".to_string(),
                    is_bookmarked: true,
                }
            }
        };

        info!(
            post_id = %post_id,
            user_id = %user_id,
            bookmarked = response.is_bookmarked,
            "bookmark toggled"
        );
        Ok(response)
    }

    pub async fn status(&self, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let post = self.require_post(post_id).await?;
        if post.user_id == user_id {
            return Ok(false);
        }
        Ok(self.bookmarks.find(post_id, user_id).await?.is_some())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }
}
