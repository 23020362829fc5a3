use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::AuthorIdentity;

/// A reply embedded in its parent comment. Replies have no identity of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Every user referenced by the comment or its replies.
    pub fn participant_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.user_id).chain(self.replies.iter().map(|r| r.user_id))
    }
}

/// Row shape for the comments table; replies live in a JSONB column.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub replies: sqlx::types::Json<Vec<Reply>>,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            text: row.text,
            replies: row.replies.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub user: AuthorIdentity,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment with its author and reply authors resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub post_id: Uuid,
    pub user: AuthorIdentity,
    pub text: String,
    pub replies: Vec<ReplyView>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}
