//! Business logic layer for the social feed service
//!
//! The feed aggregator lives in `reactions` (tally and toggles), `viewer_context`,
//! `enrichment` and `feed`; the remaining modules serve the surrounding endpoints.

pub mod bookmarks;
pub mod comments;
pub mod enrichment;
pub mod feature_flags;
pub mod feed;
pub mod hashtags;
pub mod posts;
pub mod reactions;
pub mod search;
pub mod users;
pub mod viewer_context;

pub use bookmarks::BookmarkService;
pub use comments::CommentService;
pub use enrichment::PostEnricher;
pub use feature_flags::FeatureFlags;
pub use feed::{FeedConfig, FeedService, FeedVariant, HasMorePolicy};
pub use hashtags::extract_hashtags;
pub use posts::PostService;
pub use reactions::{ReactionService, ToggleOutcome};
pub use search::SearchService;
pub use users::UserService;
pub use viewer_context::ViewerContextResolver;
