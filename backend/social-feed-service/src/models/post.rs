use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of post. Text is always available; media kinds are gated by feature flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum PostType {
    Text,
    Image,
    Gif,
}

impl PostType {
    pub const ALL: [PostType; 3] = [PostType::Text, PostType::Image, PostType::Gif];

    /// Types shown by the reels feed.
    pub const MEDIA: [PostType; 2] = [PostType::Image, PostType::Gif];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PostType::Text => "text",
            PostType::Image => "image",
            PostType::Gif => "gif",
        }
    }

    pub const fn requires_media(&self) -> bool {
        matches!(self, PostType::Image | PostType::Gif)
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(PostType::Text),
            "image" => Ok(PostType::Image),
            "gif" => Ok(PostType::Gif),
            other => Err(format!("unknown post type '{}'", other)),
        }
    }
}

/// A stored post as it comes out of the post store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub content: String,
    pub media_url: Option<String>,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a post. Hashtags are extracted by the caller.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub post_type: PostType,
    pub content: String,
    pub media_url: Option<String>,
    pub hashtags: Vec<String>,
}

/// Mutable subset of a post. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub content: Option<String>,
    pub media_url: Option<String>,
    pub hashtags: Option<Vec<String>>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.media_url.is_none() && self.hashtags.is_none()
    }

    pub fn apply(self, post: &mut Post) {
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(media_url) = self.media_url {
            post.media_url = Some(media_url);
        }
        if let Some(hashtags) = self.hashtags {
            post.hashtags = hashtags;
        }
    }
}

/// Selection criteria for a chronological post listing.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    /// Restrict to these types; `None` means every type.
    pub types: Option<Vec<PostType>>,
    pub author_id: Option<Uuid>,
    pub offset: i64,
    pub limit: i64,
}

impl PostQuery {
    pub fn matches(&self, post: &Post) -> bool {
        let type_ok = self
            .types
            .as_ref()
            .map(|types| types.contains(&post.post_type))
            .unwrap_or(true);
        let author_ok = self
            .author_id
            .map(|author| author == post.user_id)
            .unwrap_or(true);
        type_ok && author_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub content: String,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub media_url: Option<String>,
}
