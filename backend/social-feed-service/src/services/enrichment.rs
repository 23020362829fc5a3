//! Post enrichment.
//!
//! Decorates raw posts with author identity, reaction tally, viewer context and
//! comment count. The sub-lookups for one post run concurrently; a page of posts
//! shares one batched author lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, error};
use uuid::Uuid;

use super::viewer_context::ViewerContextResolver;
use crate::db::{CommentStore, ReactionStore, Stores, UserDirectory};
use crate::error::{AppError, Result};
use crate::metrics::feed::POST_ENRICHMENT_DURATION_SECONDS;
use crate::models::{AuthorIdentity, AuthorSummary, EnrichedPost, Post};

#[derive(Clone)]
pub struct PostEnricher {
    users: Arc<dyn UserDirectory>,
    reactions: Arc<dyn ReactionStore>,
    comments: Arc<dyn CommentStore>,
    viewer_context: ViewerContextResolver,
}

impl PostEnricher {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
            reactions: stores.reactions.clone(),
            comments: stores.comments.clone(),
            viewer_context: ViewerContextResolver::new(
                stores.reactions.clone(),
                stores.bookmarks.clone(),
            ),
        }
    }

    /// Enrich a single post for `viewer`.
    pub async fn enrich(&self, post: Post, viewer: Option<Uuid>) -> Result<EnrichedPost> {
        let started = Instant::now();
        let post_id = post.id;

        let result = async {
            let (author, tally, context, comment_count) = tokio::try_join!(
                self.author_of(post.user_id),
                self.reactions.tally(post.id),
                self.viewer_context.resolve(&post, viewer),
                self.comments.count_by_post(post.id),
            )?;
            Ok::<_, AppError>(EnrichedPost::assemble(
                post,
                author,
                tally,
                context,
                comment_count,
            ))
        }
        .await;

        observe(post_id, started, &result);
        result
    }

    /// Enrich posts in order. Any failure aborts the whole page.
    pub async fn enrich_page(
        &self,
        posts: Vec<Post>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<EnrichedPost>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let authors = self.authors_for(&posts).await?;
        debug!(
            posts = posts.len(),
            authors = authors.len(),
            "enriching page"
        );

        try_join_all(posts.into_iter().map(|post| {
            let author = AuthorIdentity::resolve(post.user_id, authors.get(&post.user_id));
            self.enrich_with_author(post, author, viewer)
        }))
        .await
    }

    /// Batched author lookup keyed by user id.
    pub async fn authors_for(&self, posts: &[Post]) -> Result<HashMap<Uuid, AuthorSummary>> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        self.resolve_authors(&ids).await
    }

    pub async fn resolve_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, AuthorSummary>> {
        let found = self.users.find_many(ids).await?;
        Ok(found.into_iter().map(|a| (a.user_id, a)).collect())
    }

    async fn enrich_with_author(
        &self,
        post: Post,
        author: AuthorIdentity,
        viewer: Option<Uuid>,
    ) -> Result<EnrichedPost> {
        let started = Instant::now();
        let post_id = post.id;

        let result = async {
            let (tally, context, comment_count) = tokio::try_join!(
                self.reactions.tally(post.id),
                self.viewer_context.resolve(&post, viewer),
                self.comments.count_by_post(post.id),
            )?;
            Ok::<_, AppError>(EnrichedPost::assemble(
                post,
                author,
                tally,
                context,
                comment_count,
            ))
        }
        .await;

        observe(post_id, started, &result);
        result
    }

    async fn author_of(&self, user_id: Uuid) -> Result<AuthorIdentity> {
        let authors = self.resolve_authors(&[user_id]).await?;
        Ok(AuthorIdentity::resolve(user_id, authors.get(&user_id)))
    }
}

fn observe(post_id: Uuid, started: Instant, result: &Result<EnrichedPost>) {
    let label = match result {
        Ok(_) => "ok",
        Err(err) => {
            error!(post_id = %post_id, error = %err, "post enrichment failed");
            "error"
        }
    };
    POST_ENRICHMENT_DURATION_SECONDS
        .with_label_values(&[label])
        .observe(started.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, PostStore};
    use crate::models::{NewComment, NewPost, PostType, ReactionKind, Reply};
    use chrono::Utc;

    async fn post_by(store: &MemoryStore, author: Uuid, content: &str) -> Post {
        PostStore::create(
            store,
            NewPost {
                user_id: author,
                post_type: PostType::Text,
                content: content.into(),
                media_url: None,
                hashtags: vec![],
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn enrich_combines_all_lookups() {
        let store = Arc::new(MemoryStore::new());
        let enricher = PostEnricher::new(&Stores::in_memory(store.clone()));

        let author = store.insert_user("alice").await;
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let post = post_by(&store, author.id, "hi").await;

        for (user, kind) in [
            (a, ReactionKind::Love),
            (b, ReactionKind::Love),
            (c, ReactionKind::Wow),
        ] {
            ReactionStore::create(store.as_ref(), post.id, user, kind)
                .await
                .unwrap();
        }
        let comment = CommentStore::create(
            store.as_ref(),
            NewComment {
                post_id: post.id,
                user_id: b,
                text: "first".into(),
            },
        )
        .await
        .unwrap();
        store
            .append_reply(
                comment.id,
                Reply {
                    user_id: c,
                    text: "replies are not counted".into(),
                    created_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let enriched = enricher.enrich(post, Some(a)).await.unwrap();

        assert_eq!(enriched.reactions.get(ReactionKind::Love), 2);
        assert_eq!(enriched.reactions.get(ReactionKind::Wow), 1);
        assert_eq!(enriched.like_count, 3);
        assert_eq!(enriched.user_reaction, Some(ReactionKind::Love));
        assert!(enriched.is_liked);
        assert_eq!(enriched.comment_count, 1);
        assert_eq!(enriched.author.username(), "alice");
    }

    #[tokio::test]
    async fn missing_author_becomes_unknown() {
        let store = Arc::new(MemoryStore::new());
        let enricher = PostEnricher::new(&Stores::in_memory(store.clone()));
        let ghost = store.insert_user("ghost").await;
        let post = post_by(&store, ghost.id, "boo").await;
        store.remove_user(ghost.id).await;

        let enriched = enricher.enrich(post, None).await.unwrap();

        assert!(!enriched.author.is_known());
        assert_eq!(enriched.author.username(), "Unknown User");
    }

    #[tokio::test]
    async fn page_preserves_order_and_shares_authors() {
        let store = Arc::new(MemoryStore::new());
        let enricher = PostEnricher::new(&Stores::in_memory(store.clone()));
        let alice = store.insert_user("alice").await;
        let bob = store.insert_user("bob").await;

        let posts = vec![
            post_by(&store, alice.id, "one").await,
            post_by(&store, bob.id, "two").await,
            post_by(&store, alice.id, "three").await,
        ];
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let enriched = enricher.enrich_page(posts, None).await.unwrap();

        assert_eq!(enriched.iter().map(|e| e.post.id).collect::<Vec<_>>(), ids);
        assert_eq!(enriched[1].author.username(), "bob");
        assert_eq!(enriched[2].author.username(), "alice");
    }
}
