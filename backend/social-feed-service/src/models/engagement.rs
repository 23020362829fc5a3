use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of reactions a user can leave on a post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ReactionKind {
    Love,
    Laugh,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 5] = [
        ReactionKind::Love,
        ReactionKind::Laugh,
        ReactionKind::Wow,
        ReactionKind::Sad,
        ReactionKind::Angry,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Love => "love",
            ReactionKind::Laugh => "laugh",
            ReactionKind::Wow => "wow",
            ReactionKind::Sad => "sad",
            ReactionKind::Angry => "angry",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown reaction type '{}'", s))
    }
}

/// One user's reaction to one post. At most one exists per (post, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reaction counts for a post, keyed by kind.
///
/// Only kinds with at least one reaction are present; absent kinds count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionTally(BTreeMap<ReactionKind, i64>);

impl ReactionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every reaction in the iterator once.
    pub fn from_kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ReactionKind>,
    {
        let mut tally = Self::new();
        for kind in kinds {
            *tally.0.entry(kind).or_insert(0) += 1;
        }
        tally
    }

    /// Build from grouped (kind, count) rows, dropping non-positive counts.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (ReactionKind, i64)>,
    {
        Self(counts.into_iter().filter(|(_, count)| *count > 0).collect())
    }

    pub fn get(&self, kind: ReactionKind) -> i64 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    /// Sum over all kinds; the legacy like count.
    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ReactionKind> + '_ {
        self.0.keys().copied()
    }
}

/// A saved post. `post_author_id` is kept so the own-post rule can be checked
/// without loading the post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub post_author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub post_author_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactRequest {
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionToggleResponse {
    pub message: String,
    pub is_reacted: bool,
    pub reaction_type: Option<ReactionKind>,
    pub reaction_counts: ReactionTally,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReactionResponse {
    pub reaction_type: Option<ReactionKind>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub message: String,
    pub is_liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSummary {
    pub like_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkToggleResponse {
    pub message: String,
    pub is_bookmarked: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkStatusResponse {
    pub is_bookmarked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_only_present_kinds() {
        let tally = ReactionTally::from_kinds([
            ReactionKind::Love,
            ReactionKind::Love,
            ReactionKind::Laugh,
        ]);

        assert_eq!(tally.get(ReactionKind::Love), 2);
        assert_eq!(tally.get(ReactionKind::Laugh), 1);
        assert_eq!(tally.get(ReactionKind::Wow), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(
            tally.kinds().collect::<Vec<_>>(),
            vec![ReactionKind::Love, ReactionKind::Laugh]
        );
    }

    #[test]
    fn tally_serialises_as_plain_map() {
        let tally = ReactionTally::from_counts([(ReactionKind::Wow, 1), (ReactionKind::Sad, 0)]);
        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json, serde_json::json!({ "wow": 1 }));
    }

    #[test]
    fn empty_tally_is_valid() {
        let tally = ReactionTally::new();
        assert!(tally.is_empty());
        assert_eq!(tally.total(), 0);
        assert_eq!(serde_json::to_value(&tally).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn reaction_kind_round_trips_through_str() {
        for kind in ReactionKind::ALL {
            assert_eq!(kind.as_str().parse::<ReactionKind>().unwrap(), kind);
        }
        assert!("like".parse::<ReactionKind>().is_err());
    }
}
