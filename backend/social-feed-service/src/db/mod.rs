//! Storage seams.
//!
//! Each store is a trait with a PostgreSQL implementation (`*_repo` modules) and
//! an in-memory implementation ([`memory::MemoryStore`]) used by tests and local runs.

pub mod bookmark_repo;
pub mod comment_repo;
pub mod memory;
pub mod post_repo;
pub mod reaction_repo;
pub mod user_repo;

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AuthorSummary, Bookmark, Comment, NewBookmark, NewComment, NewPost, Post, PostChanges,
    PostQuery, ProfileUpdate, Reaction, ReactionKind, ReactionTally, Reply, TagCount,
    UserProfile,
};

pub use bookmark_repo::PgBookmarkRepository;
pub use comment_repo::PgCommentRepository;
pub use memory::MemoryStore;
pub use post_repo::PgPostRepository;
pub use reaction_repo::PgReactionRepository;
pub use user_repo::PgUserDirectory;

#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Posts matching the query, newest first, after skipping `offset` and taking `limit`.
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

    /// Posts with the given ids, in no particular order. Missing ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Post>>;

    async fn create(&self, post: NewPost) -> Result<Post>;

    /// Apply changes and bump `updated_at`. `None` when the post does not exist.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    /// Returns whether a post was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Case-insensitive substring match on content or any hashtag, newest first.
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Post>>;

    /// Hashtags ordered by the number of posts using them.
    async fn trending_tags(&self, limit: i64) -> Result<Vec<TagCount>>;
}

#[async_trait::async_trait]
pub trait ReactionStore: Send + Sync {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>>;

    /// Counts per kind for one post; kinds without reactions are absent.
    async fn tally(&self, post_id: Uuid) -> Result<ReactionTally>;

    async fn create(&self, post_id: Uuid, user_id: Uuid, kind: ReactionKind) -> Result<Reaction>;

    async fn update_kind(&self, id: Uuid, kind: ReactionKind) -> Result<Reaction>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>>;

    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Bookmarked post ids for a user, most recently bookmarked first.
    async fn list_post_ids(&self, user_id: Uuid, offset: i64, limit: i64) -> Result<Vec<Uuid>>;
}

#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Top-level comments only; replies are not counted.
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64>;

    /// Newest first.
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>>;

    async fn create(&self, comment: NewComment) -> Result<Comment>;

    /// Append to the embedded reply list. `None` when the comment does not exist.
    async fn append_reply(&self, comment_id: Uuid, reply: Reply) -> Result<Option<Comment>>;
}

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>>;

    /// Batch author lookup. Unknown ids are simply absent from the result.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>>;

    /// Case-insensitive substring match on username or email.
    async fn search(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>>;

    /// Case-insensitive substring match on username only.
    async fn search_by_username(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>>;

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
        -> Result<Option<UserProfile>>;
}

/// `%term%` for ILIKE, with LIKE wildcards in the term escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Handles to every store, shared by all workers.
#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub reactions: Arc<dyn ReactionStore>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub comments: Arc<dyn CommentStore>,
    pub users: Arc<dyn UserDirectory>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            reactions: Arc::new(PgReactionRepository::new(pool.clone())),
            bookmarks: Arc::new(PgBookmarkRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            users: Arc::new(PgUserDirectory::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            reactions: store.clone(),
            bookmarks: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }
}
