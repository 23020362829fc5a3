use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::CommentStore;
use crate::error::Result;
use crate::models::comment::CommentRow;
use crate::models::{Comment, NewComment, Reply};

/// PostgreSQL comment store. Replies are kept in a JSONB array on the comment row.
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CommentStore for PgCommentRepository {
    async fn count_by_post(&self, post_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, post_id, user_id, text, replies, created_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, post_id, user_id, text, replies, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Comment::from))
    }

    async fn create(&self, comment: NewComment) -> Result<Comment> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (post_id, user_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, text, replies, created_at
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.text)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn append_reply(&self, comment_id: Uuid, reply: Reply) -> Result<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET replies = replies || $2
            WHERE id = $1
            RETURNING id, post_id, user_id, text, replies, created_at
            "#,
        )
        .bind(comment_id)
        .bind(Json(vec![reply]))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Comment::from))
    }
}
