use sqlx::PgPool;
use uuid::Uuid;

use super::{like_pattern, UserDirectory};
use crate::error::Result;
use crate::models::{AuthorSummary, ProfileUpdate, UserProfile};

const PROFILE_COLUMNS: &str = "id, username, email, bio, website, profile_photo_url, created_at";

/// PostgreSQL view of the users table
#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let authors = sqlx::query_as::<_, AuthorSummary>(
            "SELECT id AS user_id, username, profile_photo_url FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn search(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>> {
        let sql = format!(
            r#"
            SELECT {PROFILE_COLUMNS}
            FROM users
            WHERE username ILIKE $1 OR email ILIKE $1
            ORDER BY username
            LIMIT $2
            "#
        );
        let users = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn search_by_username(&self, term: &str, limit: i64) -> Result<Vec<UserProfile>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE username ILIKE $1 ORDER BY username LIMIT $2"
        );
        let users = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(like_pattern(term))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<UserProfile>> {
        let sql = format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                bio = COALESCE($3, bio),
                website = COALESCE($4, website),
                profile_photo_url = COALESCE($5, profile_photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .bind(update.username)
            .bind(update.bio)
            .bind(update.website)
            .bind(update.profile_photo_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
