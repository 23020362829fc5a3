use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{like_pattern, PostStore};
use crate::error::Result;
use crate::models::{NewPost, Post, PostChanges, PostQuery, TagCount};

const POST_COLUMNS: &str =
    "id, user_id, post_type, content, media_url, hashtags, created_at, updated_at";

/// PostgreSQL post store
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostRepository {
    async fn list(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let types: Option<Vec<String>> = query
            .types
            .as_ref()
            .map(|types| types.iter().map(|t| t.as_str().to_string()).collect());

        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE ($1::varchar[] IS NULL OR post_type = ANY($1))
              AND ($2::uuid IS NULL OR user_id = $2)
            ORDER BY created_at DESC, id DESC
            OFFSET $3 LIMIT $4
            "#
        );

        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(types)
            .bind(query.author_id)
            .bind(query.offset)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            offset = query.offset,
            limit = query.limit,
            returned = posts.len(),
            "listed posts"
        );
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ANY($1)");
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> Result<Post> {
        let sql = format!(
            r#"
            INSERT INTO posts (user_id, post_type, content, media_url, hashtags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(post.user_id)
            .bind(post.post_type)
            .bind(&post.content)
            .bind(&post.media_url)
            .bind(&post.hashtags)
            .fetch_one(&self.pool)
            .await?;

        debug!(post_id = %created.id, user_id = %created.user_id, "created post");
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let sql = format!(
            r#"
            UPDATE posts
            SET content = COALESCE($2, content),
                media_url = COALESCE($3, media_url),
                hashtags = COALESCE($4, hashtags),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(changes.content)
            .bind(changes.media_url)
            .bind(changes.hashtags)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, term: &str, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE content ILIKE $1
               OR EXISTS (SELECT 1 FROM unnest(hashtags) AS tag WHERE tag ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn trending_tags(&self, limit: i64) -> Result<Vec<TagCount>> {
        let tags = sqlx::query_as::<_, TagCount>(
            r#"
            SELECT tag, COUNT(*) AS count
            FROM posts, unnest(posts.hashtags) AS tag
            GROUP BY tag
            ORDER BY count DESC, tag ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }
}
