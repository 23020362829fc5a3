use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::enrichment::PostEnricher;
use crate::db::{PostStore, Stores, UserDirectory};
use crate::error::Result;
use crate::models::{AuthorIdentity, Post, UserProfile};

pub const SEARCH_LIMIT: i64 = 20;

/// A matching post with its author.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSearchHit {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorIdentity,
}

pub struct SearchService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserDirectory>,
    enricher: PostEnricher,
}

impl SearchService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            posts: stores.posts.clone(),
            users: stores.users.clone(),
            enricher: PostEnricher::new(stores),
        }
    }

    /// Users whose username or email contains `query`.
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserProfile>> {
        let Some(term) = normalize_query(query) else {
            return Ok(Vec::new());
        };
        let users = self.users.search(term, SEARCH_LIMIT).await?;
        debug!(query = term, hits = users.len(), "user search");
        Ok(users)
    }

    /// Posts whose content or hashtags contain `query`.
    pub async fn search_posts(&self, query: &str) -> Result<Vec<PostSearchHit>> {
        let Some(term) = normalize_query(query) else {
            return Ok(Vec::new());
        };
        let term = term.trim_start_matches('#');
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let posts = self.posts.search(term, SEARCH_LIMIT).await?;
        let authors = self.enricher.authors_for(&posts).await?;
        debug!(query = term, hits = posts.len(), "post search");

        Ok(posts
            .into_iter()
            .map(|post| PostSearchHit {
                author: AuthorIdentity::resolve(post.user_id, authors.get(&post.user_id)),
                post,
            })
            .collect())
    }
}

fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewPost, PostType};
    use uuid::Uuid;

    #[tokio::test]
    async fn blank_query_returns_nothing() {
        let service = SearchService::new(&Stores::in_memory(Arc::new(MemoryStore::new())));
        assert!(service.search_users("   ").await.unwrap().is_empty());
        assert!(service.search_posts("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn posts_match_content_and_hashtags() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice").await;
        for (content, tags) in [
            ("Morning run", vec!["fitness"]),
            ("Lunch #foodie", vec!["foodie"]),
            ("FITNESS check", vec![]),
        ] {
            PostStore::create(
                store.as_ref(),
                NewPost {
                    user_id: alice.id,
                    post_type: PostType::Text,
                    content: content.into(),
                    media_url: None,
                    hashtags: tags.into_iter().map(String::from).collect(),
                },
            )
            .await
            .unwrap();
        }
        let service = SearchService::new(&Stores::in_memory(store.clone()));

        let hits = service.search_posts("#fitness").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.author.username() == "alice"));

        let users = service.search_users("ALI").await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(service.search_users(&Uuid::new_v4().to_string()).await.unwrap().is_empty());
    }
}
