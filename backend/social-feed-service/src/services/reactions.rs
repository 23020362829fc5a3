use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::feature_flags::FeatureFlags;
use crate::db::{PostStore, ReactionStore, Stores};
use crate::error::{AppError, Result};
use crate::metrics::engagement::REACTION_TOGGLE_TOTAL;
use crate::models::{
    LikeSummary, LikeToggleResponse, Post, ReactionKind, ReactionTally, ReactionToggleResponse,
};

/// What a toggle did to the caller's reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Updated,
    Removed,
}

impl ToggleOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "added",
            ToggleOutcome::Updated => "updated",
            ToggleOutcome::Removed => "removed",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "Reaction added successfully",
            ToggleOutcome::Updated => "Reaction updated successfully",
            ToggleOutcome::Removed => "Reaction removed successfully",
        }
    }
}

pub struct ReactionService {
    posts: Arc<dyn PostStore>,
    reactions: Arc<dyn ReactionStore>,
    features: FeatureFlags,
}

impl ReactionService {
    pub fn new(stores: &Stores, features: FeatureFlags) -> Self {
        Self {
            posts: stores.posts.clone(),
            reactions: stores.reactions.clone(),
            features,
        }
    }

    /// Reaction counts for an existing post.
    pub async fn tally(&self, post_id: Uuid) -> Result<ReactionTally> {
        self.require_post(post_id).await?;
        self.reactions.tally(post_id).await
    }

    /// Toggle `kind` for the caller and return the fresh tally.
    pub async fn react(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<ReactionToggleResponse> {
        if !self.features.is_reaction_enabled(kind) {
            return Err(AppError::BadRequest(format!(
                "Reaction type '{}' is not enabled",
                kind
            )));
        }
        self.require_post(post_id).await?;

        let (outcome, current) = self.toggle(post_id, user_id, kind).await?;
        let reaction_counts = self.reactions.tally(post_id).await?;

        info!(
            post_id = %post_id,
            user_id = %user_id,
            kind = %kind,
            outcome = outcome.as_str(),
            "reaction toggled"
        );

        Ok(ReactionToggleResponse {
            message: outcome.message().to_string(),
            is_reacted: current.is_some(),
            reaction_type: current,
            reaction_counts,
        })
    }

    pub async fn user_reaction(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<ReactionKind>> {
        self.require_post(post_id).await?;
        Ok(self.reactions.find(post_id, user_id).await?.map(|r| r.kind))
    }

    /// Legacy like: toggles a `love` reaction. Any other reaction the caller
    /// had is turned into `love`.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggleResponse> {
        self.require_post(post_id).await?;

        let (outcome, current) = self.toggle(post_id, user_id, ReactionKind::Love).await?;
        let like_count = self.reactions.tally(post_id).await?.total();
        let is_liked = current == Some(ReactionKind::Love);

        debug!(post_id = %post_id, user_id = %user_id, outcome = outcome.as_str(), "like toggled");

        Ok(LikeToggleResponse {
            message: if is_liked {
                "Post liked successfully".to_string()
            } else {
                "Post unliked successfully".to_string()
            },
            is_liked,
            like_count,
        })
    }

    /// Legacy like view. `like_count` counts every reaction kind.
    pub async fn like_summary(&self, post_id: Uuid, viewer: Option<Uuid>) -> Result<LikeSummary> {
        self.require_post(post_id).await?;

        let like_count = self.reactions.tally(post_id).await?.total();
        let is_liked = match viewer {
            Some(user_id) => self
                .reactions
                .find(post_id, user_id)
                .await?
                .map(|r| r.kind == ReactionKind::Love)
                .unwrap_or(false),
            None => false,
        };

        Ok(LikeSummary {
            like_count,
            is_liked,
        })
    }

    /// Create if absent, remove if the same kind, switch kind otherwise.
    async fn toggle(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        kind: ReactionKind,
    ) -> Result<(ToggleOutcome, Option<ReactionKind>)> {
        let result = match self.reactions.find(post_id, user_id).await? {
            None => {
                self.reactions.create(post_id, user_id, kind).await?;
                (ToggleOutcome::Added, Some(kind))
            }
            Some(existing) if existing.kind == kind => {
                self.reactions.delete(existing.id).await?;
                (ToggleOutcome::Removed, None)
            }
            Some(existing) => {
                self.reactions.update_kind(existing.id, kind).await?;
                (ToggleOutcome::Updated, Some(kind))
            }
        };

        REACTION_TOGGLE_TOTAL
            .with_label_values(&[kind.as_str(), result.0.as_str()])
            .inc();
        Ok(result)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {} not found", post_id)))
    }
}
