use sqlx::PgPool;
use uuid::Uuid;

use super::BookmarkStore;
use crate::error::Result;
use crate::models::{Bookmark, NewBookmark};

/// PostgreSQL bookmark store
#[derive(Clone)]
pub struct PgBookmarkRepository {
    pool: PgPool,
}

impl PgBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl BookmarkStore for PgBookmarkRepository {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, post_id, post_author_id, created_at
            FROM bookmarks
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bookmark)
    }

    async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        let created = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, post_id, post_author_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, post_id, post_author_id, created_at
            "#,
        )
        .bind(bookmark.user_id)
        .bind(bookmark.post_id)
        .bind(bookmark.post_author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_post_ids(&self, user_id: Uuid, offset: i64, limit: i64) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT post_id
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
