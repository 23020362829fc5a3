//! In-memory implementation of every store trait.
//!
//! Backs the `memory` storage backend and the test suite. Ordering and
//! filtering follow the SQL in the PostgreSQL repositories.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookmarkStore, CommentStore, PostStore, ReactionStore, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{
    AuthorSummary, Bookmark, Comment, NewBookmark, NewComment, NewPost, Post, PostChanges,
    PostQuery, ProfileUpdate, Reaction, ReactionKind, ReactionTally, Reply, TagCount,
    UserProfile,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserProfile>,
    posts: HashMap<Uuid, Post>,
    reactions: HashMap<Uuid, Reaction>,
    bookmarks: HashMap<Uuid, Bookmark>,
    comments: HashMap<Uuid, Comment>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing clock so "newest first" is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(next);
        next
    }
}

/// Number of viewer-specific lookups served, for asserting short-circuits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupCounts {
    pub reactions: usize,
    pub bookmarks: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    reaction_lookups: AtomicUsize,
    bookmark_lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user. Users are owned upstream, so this is the only way in.
    pub async fn insert_user(&self, username: &str) -> UserProfile {
        let mut tables = self.tables.write().await;
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@flappy.dev", username.to_lowercase()),
            bio: None,
            website: None,
            profile_photo_url: Some(format!("avatars/{}.png", username.to_lowercase())),
            created_at: tables.tick(),
        };
        tables.users.insert(profile.id, profile.clone());
        profile
    }

    pub async fn remove_user(&self, id: Uuid) -> bool {
        self.tables.write().await.users.remove(&id).is_some()
    }

    pub fn lookup_counts(&self) -> LookupCounts {
        LookupCounts {
            reactions: self.reaction_lookups.load(Ordering::SeqCst),
            bookmarks: self.bookmark_lookups.load(Ordering::SeqCst),
        }
    }
}

fn newest_first(
    a: &DateTime<Utc>,
    a_id: &Uuid,
    b: &DateTime<Utc>,
    b_id: &Uuid,
) -> std::cmp::Ordering {
    b.cmp(a).then_with(|| b_id.cmp(a_id))
}

fn window<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| query.matches(post))
            .cloned()
            .collect();
        posts.sort_by(|a, b| newest_first(&a.created_at, &a.id, &b.created_at, &b.id));
        Ok(window(posts, query.offset, query.limit))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.posts.get(id).cloned())
            .collect())
    }

    async fn create(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let created = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            post_type: post.post_type,
            content: post.content,
            media_url: post.media_url,
            hashtags: post.hashtags,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        Ok(tables.posts.get_mut(&id).map(|post| {
            changes.apply(post);
            post.updated_at = now;
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }

    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Post>> {
        let needle = term.to_lowercase();
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| {
                contains_ci(&post.content, &needle)
                    || post.hashtags.iter().any(|tag| contains_ci(tag, &needle))
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| newest_first(&a.created_at, &a.id, &b.created_at, &b.id));
        Ok(window(posts, 0, limit))
    }

    async fn trending_tags(&self, limit: i64) -> Result<Vec<TagCount>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
        for post in tables.posts.values() {
            for tag in &post.hashtags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        Ok(window(tags, 0, limit))
    }
}

#[async_trait::async_trait]
impl ReactionStore for MemoryStore {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>> {
        self.reaction_lookups.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        Ok(tables
            .reactions
            .values()
            .find(|r| r.post_id == post_id && r.user_id == user_id)
            .cloned())
    }

    async fn tally(&self, post_id: Uuid) -> Result<ReactionTally> {
        let tables = self.tables.read().await;
        Ok(ReactionTally::from_kinds(
            tables
                .reactions
                .values()
                .filter(|r| r.post_id == post_id)
                .map(|r| r.kind),
        ))
    }

    async fn create(&self, post_id: Uuid, user_id: Uuid, kind: ReactionKind) -> Result<Reaction> {
        let mut tables = self.tables.write().await;
        if tables
            .reactions
            .values()
            .any(|r| r.post_id == post_id && r.user_id == user_id)
        {
            return Err(AppError::Conflict(format!(
                "reaction already exists for post {} and user {}",
                post_id, user_id
            )));
        }
        let now = tables.tick();
        let reaction = Reaction {
            id: Uuid::new_v4(),
            post_id,
            user_id,
            kind,
            created_at: now,
            updated_at: now,
        };
        tables.reactions.insert(reaction.id, reaction.clone());
        Ok(reaction)
    }

    async fn update_kind(&self, id: Uuid, kind: ReactionKind) -> Result<Reaction> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let reaction = tables
            .reactions
            .get_mut(&id)
            .ok_or_else(|| AppError::Database(format!("reaction {} vanished", id)))?;
        reaction.kind = kind;
        reaction.updated_at = now;
        Ok(reaction.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.tables.write().await.reactions.remove(&id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookmarkStore for MemoryStore {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>> {
        self.bookmark_lookups.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        Ok(tables
            .bookmarks
            .values()
            .find(|b| b.post_id == post_id && b.user_id == user_id)
            .cloned())
    }

    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        if bookmark.user_id == bookmark.post_author_id {
            return Err(AppError::Database(
                "bookmark violates ck_bookmarks_not_own_post".to_string(),
            ));
        }
        let mut tables = self.tables.write().await;
        if tables
            .bookmarks
            .values()
            .any(|b| b.post_id == bookmark.post_id && b.user_id == bookmark.user_id)
        {
            return Err(AppError::Conflict(format!(
                "bookmark already exists for post {} and user {}",
                bookmark.post_id, bookmark.user_id
            )));
        }
        let created = Bookmark {
            id: Uuid::new_v4(),
            user_id: bookmark.user_id,
            post_id: bookmark.post_id,
            post_author_id: bookmark.post_author_id,
            created_at: tables.tick(),
        };
        tables.bookmarks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.tables.write().await.bookmarks.remove(&id);
        Ok(())
    }

    async fn list_post_ids(&self, user_id: Uuid, offset: i64, limit: i64) -> Result<Vec<Uuid>> {
        let tables = self.tables.read().await;
        let mut bookmarks: Vec<&Bookmark> = tables
            .bookmarks
            .values()
            .filter(|b| b.user_id == user_id)
            .collect();
        bookmarks.sort_by(|a, b| newest_first(&a.created_at, &a.id, &b.created_at, &b.id));
        Ok(window(
            bookmarks.into_iter().map(|b| b.post_id).collect(),
            offset,
            limit,
        ))
    }
}

#[async_trait::async_trait]
impl CommentStore for MemoryStore {
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as i64)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| newest_first(&a.created_at, &a.id, &b.created_at, &b.id));
        Ok(comments)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        let created = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            text: comment.text,
            replies: Vec::new(),
            created_at: tables.tick(),
        };
        tables.comments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn append_reply(&self, comment_id: Uuid, reply: Reply) -> Result<Option<Comment>> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&comment_id).map(|comment| {
            comment.replies.push(reply);
            comment.clone()
        }))
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>> {
        let tables = self.tables.read().await;
        let unique: HashSet<&Uuid> = ids.iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| tables.users.get(id).map(UserProfile::summary))
            .collect())
    }

    async fn search(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>> {
        let needle = term.to_lowercase();
        let tables = self.tables.read().await;
        let mut users: Vec<UserProfile> = tables
            .users
            .values()
            .filter(|u| contains_ci(&u.username, &needle) || contains_ci(&u.email, &needle))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(window(users, 0, limit))
    }

    async fn search_by_username(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>> {
        let needle = term.to_lowercase();
        let tables = self.tables.read().await;
        let mut users: Vec<UserProfile> = tables
            .users
            .values()
            .filter(|u| contains_ci(&u.username, &needle))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(window(users, 0, limit))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>> {
        let mut tables = self.tables.write().await;
        if let Some(username) = &update.username {
            let taken = tables
                .users
                .values()
                .any(|u| u.id != id && u.username == *username);
            if taken {
                return Err(AppError::Conflict(format!(
                    "username '{}' is already taken",
                    username
                )));
            }
        }
        Ok(tables.users.get_mut(&id).map(|profile| {
            update.apply(profile);
            profile.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostType;

    fn text_post(user_id: Uuid, content: &str, hashtags: &[&str]) -> NewPost {
        NewPost {
            user_id,
            post_type: PostType::Text,
            content: content.to_string(),
            media_url: None,
            hashtags: hashtags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn list_is_newest_first_with_window() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(
                PostStore::create(&store, text_post(author, &format!("post {}", i), &[]))
                    .await
                    .unwrap()
                    .id,
            );
        }

        let page = store
            .list(&PostQuery {
                offset: 1,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        let got: Vec<Uuid> = page.iter().map(|p| p.id).collect();
        assert_eq!(got, vec![ids[3], ids[2]]);
    }

    #[tokio::test]
    async fn trending_counts_every_occurrence() {
        let store = MemoryStore::new();
        let author = Uuid::new_v4();
        PostStore::create(&store, text_post(author, "#rust #rust", &["rust", "rust"]))
            .await
            .unwrap();
        PostStore::create(&store, text_post(author, "#go #rust", &["go", "rust"]))
            .await
            .unwrap();

        let tags = store.trending_tags(10).await.unwrap();
        assert_eq!(
            tags,
            vec![
                TagCount {
                    tag: "rust".into(),
                    count: 3
                },
                TagCount {
                    tag: "go".into(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_reaction_is_a_conflict() {
        let store = MemoryStore::new();
        let (post, user) = (Uuid::new_v4(), Uuid::new_v4());
        ReactionStore::create(&store, post, user, ReactionKind::Love)
            .await
            .unwrap();
        let err = ReactionStore::create(&store, post, user, ReactionKind::Wow)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_many_skips_unknown_users() {
        let store = MemoryStore::new();
        let wren = store.insert_user("wren").await;
        let authors = UserDirectory::find_many(&store, &[wren.id, Uuid::new_v4(), wren.id])
            .await
            .unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].username, "wren");
    }
}
