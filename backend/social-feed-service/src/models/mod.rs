pub mod comment;
pub mod engagement;
pub mod feed;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentRequest, CommentView, NewComment, Reply, ReplyView};
pub use engagement::{
    Bookmark, BookmarkStatusResponse, BookmarkToggleResponse, LikeSummary, LikeToggleResponse,
    NewBookmark, ReactRequest, Reaction, ReactionKind, ReactionTally, ReactionToggleResponse,
    UserReactionResponse,
};
pub use feed::{EnrichedPost, FeedPage, ViewerContext};
pub use post::{
    CreatePostRequest, NewPost, Post, PostChanges, PostQuery, PostType, TagCount,
    UpdatePostRequest,
};
pub use user::{
    AuthorIdentity, AuthorSummary, ProfileUpdate, UpdateProfileRequest, UserProfile,
    UNKNOWN_USERNAME,
};
