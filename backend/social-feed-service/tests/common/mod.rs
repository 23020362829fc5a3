//! Shared fixtures for HTTP tests: an in-memory store wired into `AppState`.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::test::TestRequest;
use actix_web::web;
use uuid::Uuid;

use social_feed_service::db::{MemoryStore, PostStore, ReactionStore, Stores};
use social_feed_service::models::{NewPost, Post, PostType, ReactionKind};
use social_feed_service::services::{FeatureFlags, FeedConfig, HasMorePolicy};
use social_feed_service::AppState;

pub const USER_HEADER: &str = "x-user-id";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    /// Every feature on, page size 10, full-page `hasMore`.
    pub fn new() -> Self {
        Self::with(FeedConfig::default(), FeatureFlags::all_enabled())
    }

    pub fn with_policy(policy: HasMorePolicy) -> Self {
        Self::with(
            FeedConfig {
                has_more_policy: policy,
                ..FeedConfig::default()
            },
            FeatureFlags::all_enabled(),
        )
    }

    pub fn with(feed: FeedConfig, features: FeatureFlags) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = web::Data::new(AppState::new(
            Stores::in_memory(store.clone()),
            feed,
            features,
        ));
        Self { store, state }
    }

    pub async fn post(&self, author: Uuid, post_type: PostType, content: &str) -> Post {
        let media_url = post_type
            .requires_media()
            .then(|| format!("media/{}.bin", Uuid::new_v4()));
        PostStore::create(
            self.store.as_ref(),
            NewPost {
                user_id: author,
                post_type,
                content: content.to_string(),
                media_url,
                hashtags: Vec::new(),
            },
        )
        .await
        .expect("seed post")
    }

    pub async fn text_posts(&self, author: Uuid, count: usize) -> Vec<Post> {
        let mut posts = Vec::with_capacity(count);
        for i in 0..count {
            posts.push(self.post(author, PostType::Text, &format!("post {}", i)).await);
        }
        posts
    }

    pub async fn react(&self, post_id: Uuid, user_id: Uuid, kind: ReactionKind) {
        ReactionStore::create(self.store.as_ref(), post_id, user_id, kind)
            .await
            .expect("seed reaction");
    }
}

/// Attach the caller identity header.
pub fn as_user(req: TestRequest, user_id: Uuid) -> TestRequest {
    req.insert_header((USER_HEADER, user_id.to_string()))
}

/// Build the full service around a `TestContext`.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .app_data(social_feed_service::handlers::json_config())
                .app_data(social_feed_service::handlers::query_config())
                .app_data(social_feed_service::handlers::path_config())
                .route(
                    "/health",
                    actix_web::web::get().to(social_feed_service::handlers::health::health),
                )
                .route(
                    "/ready",
                    actix_web::web::get().to(social_feed_service::handlers::health::ready),
                )
                .configure(social_feed_service::handlers::configure),
        )
        .await
    };
}
