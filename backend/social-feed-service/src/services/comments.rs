use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::db::{CommentStore, PostStore, Stores, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{
    AuthorIdentity, AuthorSummary, Comment, CommentView, NewComment, Reply, ReplyView,
};

pub struct CommentService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    users: Arc<dyn UserDirectory>,
}

impl CommentService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            comments: stores.comments.clone(),
            users: stores.users.clone(),
        }
    }

    pub async fn create_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<CommentView> {
        let text = require_text(text)?;
        self.require_post(post_id).await?;

        let comment = self
            .comments
            .create(NewComment {
                post_id,
                user_id,
                text,
            })
            .await?;

        debug!(post_id = %post_id, comment_id = %comment.id, "comment created");
        let mut views = self.decorate(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("comment vanished after insert".to_string()))
    }

    /// Append a reply to a comment of `post_id`. Returns the whole comment.
    pub async fn reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        text: &str,
    ) -> Result<CommentView> {
        let text = require_text(text)?;

        let belongs_to_post = self
            .comments
            .find_by_id(comment_id)
            .await?
            .map(|c| c.post_id == post_id)
            .unwrap_or(false);
        if !belongs_to_post {
            return Err(AppError::NotFound(format!(
                "Comment {} not found",
                comment_id
            )));
        }

        let comment = self
            .comments
            .append_reply(
                comment_id,
                Reply {
                    user_id,
                    text,
                    created_at: Utc::now(),
                },
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment_id)))?;

        debug!(post_id = %post_id, comment_id = %comment_id, replies = comment.replies.len(), "reply added");
        let mut views = self.decorate(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal("comment vanished after reply".to_string()))
    }

    /// Comments of a post, newest first, with every author resolved.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        self.require_post(post_id).await?;
        let comments = self.comments.list_by_post(post_id).await?;
        self.decorate(comments).await
    }

    /// One batched author lookup for the comments and all their replies.
    async fn decorate(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>> {
        let mut ids: Vec<Uuid> = comments.iter().flat_map(Comment::participant_ids).collect();
        ids.sort_unstable();
        ids.dedup();

        let authors: HashMap<Uuid, AuthorSummary> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|a| (a.user_id, a))
            .collect();
        let identity = |id: Uuid| AuthorIdentity::resolve(id, authors.get(&id));

        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                id: comment.id,
                post_id: comment.post_id,
                user: identity(comment.user_id),
                text: comment.text,
                replies: comment
                    .replies
                    .into_iter()
                    .map(|reply| ReplyView {
                        user: identity(reply.user_id),
                        text: reply.text,
                        created_at: reply.created_at,
                    })
                    .collect(),
                created_at: comment.created_at,
            })
            .collect())
    }

    async fn require_post(&self, post_id: Uuid) -> Result<()> {
        match self.posts.find_by_id(post_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Post {} not found", post_id))),
        }
    }
}

fn require_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(
            "Comment text cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewPost, Post, PostType};

    async fn setup() -> (Arc<MemoryStore>, CommentService, Post) {
        let store = Arc::new(MemoryStore::new());
        let post = PostStore::create(
            store.as_ref(),
            NewPost {
                user_id: Uuid::new_v4(),
                post_type: PostType::Text,
                content: "discuss".into(),
                media_url: None,
                hashtags: vec![],
            },
        )
        .await
        .unwrap();
        let service = CommentService::new(&Stores::in_memory(store.clone()));
        (store, service, post)
    }

    #[tokio::test]
    async fn replies_resolve_authors_with_fallback() {
        let (store, service, post) = setup().await;
        let alice = store.insert_user("alice").await;
        let stranger = Uuid::new_v4();

        let comment = service
            .create_comment(post.id, alice.id, "  first!  ")
            .await
            .unwrap();
        assert_eq!(comment.text, "first!");
        assert_eq!(comment.user.username(), "alice");

        let replied = service
            .reply(post.id, comment.id, stranger, "who am I")
            .await
            .unwrap();
        assert_eq!(replied.replies.len(), 1);
        assert_eq!(replied.replies[0].user.username(), "Unknown User");

        let listed = service.list_comments(post.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].replies[0].text, "who am I");
    }

    #[tokio::test]
    async fn reply_to_comment_of_other_post_is_not_found() {
        let (store, service, post) = setup().await;
        let other = PostStore::create(
            store.as_ref(),
            NewPost {
                user_id: Uuid::new_v4(),
                post_type: PostType::Text,
                content: "elsewhere".into(),
                media_url: None,
                hashtags: vec![],
            },
        )
        .await
        .unwrap();
        let comment = service
            .create_comment(other.id, Uuid::new_v4(), "over here")
            .await
            .unwrap();

        let err = service
            .reply(post.id, comment.id, Uuid::new_v4(), "wrong thread")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_comment_is_rejected() {
        let (_, service, post) = setup().await;
        let err = service
            .create_comment(post.id, Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let (_, service, post) = setup().await;
        let user = Uuid::new_v4();
        service.create_comment(post.id, user, "older").await.unwrap();
        service.create_comment(post.id, user, "newer").await.unwrap();

        let listed = service.list_comments(post.id).await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["newer", "older"]);
    }
}
