use serde::Serialize;

use super::engagement::{ReactionKind, ReactionTally};
use super::post::Post;
use super::user::AuthorIdentity;

/// What a particular viewer has done with a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerContext {
    pub user_reaction: Option<ReactionKind>,
    pub is_bookmarked: bool,
}

impl ViewerContext {
    pub const ANONYMOUS: ViewerContext = ViewerContext {
        user_reaction: None,
        is_bookmarked: false,
    };
}

/// A post decorated with author, engagement and viewer state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorIdentity,
    pub reactions: ReactionTally,
    pub user_reaction: Option<ReactionKind>,
    pub like_count: i64,
    pub is_liked: bool,
    pub is_bookmarked: bool,
    pub comment_count: i64,
}

impl EnrichedPost {
    /// Merge the sub-lookups. `like_count` and `is_liked` are derived here
    /// and nowhere else.
    pub fn assemble(
        post: Post,
        author: AuthorIdentity,
        reactions: ReactionTally,
        viewer: ViewerContext,
        comment_count: i64,
    ) -> Self {
        Self {
            like_count: reactions.total(),
            is_liked: viewer.user_reaction == Some(ReactionKind::Love),
            user_reaction: viewer.user_reaction,
            is_bookmarked: viewer.is_bookmarked,
            post,
            author,
            reactions,
            comment_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub posts: Vec<EnrichedPost>,
    pub page: i64,
    pub has_more: bool,
}
