use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::search::SEARCH_LIMIT;
use crate::db::{Stores, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{ProfileUpdate, UpdateProfileRequest, UserProfile};

pub struct UserService {
    users: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            users: stores.users.clone(),
        }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Update the caller's own profile.
    pub async fn update_profile(
        &self,
        caller: Uuid,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        if caller != user_id {
            return Err(AppError::Forbidden(
                "You can only update your own profile".to_string(),
            ));
        }
        req.validate()?;

        let profile = self
            .users
            .update_profile(user_id, ProfileUpdate::from(req))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        info!(user_id = %user_id, "profile updated");
        Ok(profile)
    }

    pub async fn search_by_username(&self, username: &str) -> Result<Vec<UserProfile>> {
        let term = username.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.users.search_by_username(term, SEARCH_LIMIT).await
    }
}
