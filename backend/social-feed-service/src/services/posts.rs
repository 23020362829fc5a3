//! Post service - create, read, edit and delete posts
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::enrichment::PostEnricher;
use super::feature_flags::FeatureFlags;
use super::hashtags::extract_hashtags;
use crate::db::{PostStore, Stores};
use crate::error::{AppError, Result};
use crate::models::{
    CreatePostRequest, EnrichedPost, NewPost, Post, PostChanges, TagCount, UpdatePostRequest,
};

pub const TRENDING_TAG_LIMIT: i64 = 10;

pub struct PostService {
    posts: Arc<dyn PostStore>,
    enricher: PostEnricher,
    features: FeatureFlags,
}

impl PostService {
    pub fn new(stores: &Stores, features: FeatureFlags) -> Self {
        Self {
            posts: stores.posts.clone(),
            enricher: PostEnricher::new(stores),
            features,
        }
    }

    /// Create a post for `user_id`. The type must be enabled, media types need a media
    /// reference and text posts need content.
    pub async fn create_post(&self, user_id: Uuid, req: CreatePostRequest) -> Result<Post> {
        let post_type = req.post_type;
        if !self.features.is_post_type_enabled(post_type) {
            return Err(AppError::BadRequest(format!(
                "Post type '{}' is not enabled",
                post_type
            )));
        }

        let media_url = req
            .media_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        if post_type.requires_media() && media_url.is_none() {
            return Err(AppError::Validation(format!(
                "A media reference is required for {} posts",
                post_type
            )));
        }
        if !post_type.requires_media() && req.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Post content cannot be empty".to_string(),
            ));
        }

        let hashtags = extract_hashtags(&req.content);
        let post = self
            .posts
            .create(NewPost {
                user_id,
                post_type,
                content: req.content,
                media_url,
                hashtags,
            })
            .await?;

        info!(post_id = %post.id, user_id = %user_id, post_type = %post.post_type, "post created");
        Ok(post)
    }

    /// Fetch one post decorated for `viewer`.
    pub async fn get_post(&self, post_id: Uuid, viewer: Option<Uuid>) -> Result<EnrichedPost> {
        let post = self.require_post(post_id).await?;
        self.enricher.enrich(post, viewer).await
    }

    /// Edit content or media. Only the author may edit; hashtags follow the content.
    /// An empty request leaves the post as it is.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<Post> {
        let post = self.require_post(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        let media_url = req
            .media_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(content) = &req.content {
            if content.trim().is_empty() && !post.post_type.requires_media() {
                return Err(AppError::Validation(
                    "Post content cannot be empty".to_string(),
                ));
            }
        }

        let changes = PostChanges {
            hashtags: req.content.as_deref().map(extract_hashtags),
            content: req.content,
            media_url,
        };
        if changes.is_empty() {
            return Ok(post);
        }

        let updated = self
            .posts
            .update(post_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))?;

        debug!(post_id = %post_id, "post updated");
        Ok(updated)
    }

    /// Delete a post. Engagement records are left in place.
    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let post = self.require_post(post_id).await?;
        if post.user_id != user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }

        if !self.posts.delete(post_id).await? {
            return Err(AppError::NotFound(format!("Post {} not found", post_id)));
        }

        info!(post_id = %post_id, user_id = %user_id, "post deleted");
        Ok(())
    }

    pub async fn trending_tags(&self) -> Result<Vec<TagCount>> {
        self.posts.trending_tags(TRENDING_TAG_LIMIT).await
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::PostType;

    fn service(features: FeatureFlags) -> PostService {
        PostService::new(&Stores::in_memory(Arc::new(MemoryStore::new())), features)
    }

    fn text(content: &str) -> CreatePostRequest {
        CreatePostRequest {
            post_type: PostType::Text,
            content: content.to_string(),
            media_url: None,
        }
    }

    #[tokio::test]
    async fn create_extracts_hashtags() {
        let service = service(FeatureFlags::default());
        let post = service
            .create_post(Uuid::new_v4(), text("hello #world #rust"))
            .await
            .unwrap();
        assert_eq!(post.hashtags, vec!["world", "rust"]);
    }

    #[tokio::test]
    async fn disabled_media_type_is_rejected() {
        let service = service(FeatureFlags::default());
        let err = service
            .create_post(
                Uuid::new_v4(),
                CreatePostRequest {
                    post_type: PostType::Gif,
                    content: String::new(),
                    media_url: Some("media/cat.gif".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn media_post_requires_reference() {
        let service = service(FeatureFlags::all_enabled());
        let err = service
            .create_post(
                Uuid::new_v4(),
                CreatePostRequest {
                    post_type: PostType::Image,
                    content: "no picture".into(),
                    media_url: Some("  ".into()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn only_author_may_edit_and_hashtags_follow_content() {
        let service = service(FeatureFlags::default());
        let author = Uuid::new_v4();
        let post = service.create_post(author, text("old #a")).await.unwrap();

        let err = service
            .update_post(
                post.id,
                Uuid::new_v4(),
                UpdatePostRequest {
                    content: Some("hijack".into()),
                    media_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = service
            .update_post(
                post.id,
                author,
                UpdatePostRequest {
                    content: Some("new #b #c".into()),
                    media_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.hashtags, vec!["b", "c"]);
        assert_eq!(updated.post_type, PostType::Text);
    }

    #[tokio::test]
    async fn text_post_may_carry_media_and_empty_edit_is_a_no_op() {
        let service = service(FeatureFlags::default());
        let author = Uuid::new_v4();
        let post = service
            .create_post(
                author,
                CreatePostRequest {
                    post_type: PostType::Text,
                    content: "with a link preview".into(),
                    media_url: Some("media/preview.png".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(post.media_url.as_deref(), Some("media/preview.png"));

        let unchanged = service
            .update_post(
                post.id,
                author,
                UpdatePostRequest {
                    content: None,
                    media_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(unchanged, post);
    }

    #[tokio::test]
    async fn deleted_post_is_not_found() {
        let service = service(FeatureFlags::default());
        let author = Uuid::new_v4();
        let post = service.create_post(author, text("bye")).await.unwrap();

        service.delete_post(post.id, author).await.unwrap();

        let err = service.get_post(post.id, None).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
