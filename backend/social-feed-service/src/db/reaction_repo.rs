use sqlx::PgPool;
use uuid::Uuid;

use super::ReactionStore;
use crate::error::Result;
use crate::models::{Reaction, ReactionKind, ReactionTally};

/// PostgreSQL reaction store
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReactionStore for PgReactionRepository {
    async fn find(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<Reaction>> {
        let reaction = sqlx::query_as::<_, Reaction>(
            r#"
            SELECT id, post_id, user_id, kind, created_at, updated_at
            FROM reactions
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reaction)
    }

    async fn tally(&self, post_id: Uuid) -> Result<ReactionTally> {
        let rows = sqlx::query_as::<_, (ReactionKind, i64)>(
            r#"
            SELECT kind, COUNT(*) AS count
            FROM reactions
            WHERE post_id = $1
            GROUP BY kind
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ReactionTally::from_counts(rows))
    }

    async fn create(&self, post_id: Uuid, user_id: Uuid, kind: ReactionKind) -> Result<Reaction> {
        let reaction = sqlx::query_as::<_, Reaction>(
            r#"
            INSERT INTO reactions (post_id, user_id, kind)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, kind, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(reaction)
    }

    async fn update_kind(&self, id: Uuid, kind: ReactionKind) -> Result<Reaction> {
        let reaction = sqlx::query_as::<_, Reaction>(
            r#"
            UPDATE reactions
            SET kind = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, post_id, user_id, kind, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(kind)
        .fetch_one(&self.pool)
        .await?;
        Ok(reaction)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM reactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
