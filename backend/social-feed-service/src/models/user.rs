use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;
use validator::Validate;

/// Display name used when a post or comment author cannot be found.
pub const UNKNOWN_USERNAME: &str = "Unknown User";

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("Invalid username regex"));

/// Public profile as returned by the user endpoints and user search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub profile_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            user_id: self.id,
            username: self.username.clone(),
            profile_photo_url: self.profile_photo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30), regex(path = *USERNAME_RE))]
    pub username: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// Validated profile changes handed to the user directory.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub profile_photo_url: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username.map(|u| u.trim().to_string()),
            bio: req.bio,
            website: req.website,
            profile_photo_url: req.profile_photo_url,
        }
    }
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut UserProfile) {
        if let Some(username) = self.username {
            profile.username = username;
        }
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        if let Some(website) = self.website {
            profile.website = Some(website);
        }
        if let Some(url) = self.profile_photo_url {
            profile.profile_photo_url = Some(url);
        }
    }
}

/// The slice of a user shown next to a post or comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    #[serde(rename = "_id")]
    pub user_id: Uuid,
    pub username: String,
    pub profile_photo_url: Option<String>,
}

/// Author of a post or comment, or a marker that the user record is gone.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorIdentity {
    Known(AuthorSummary),
    Unknown(Uuid),
}

impl AuthorIdentity {
    pub fn resolve(user_id: Uuid, found: Option<&AuthorSummary>) -> Self {
        match found {
            Some(summary) => AuthorIdentity::Known(summary.clone()),
            None => AuthorIdentity::Unknown(user_id),
        }
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            AuthorIdentity::Known(summary) => summary.user_id,
            AuthorIdentity::Unknown(id) => *id,
        }
    }

    pub fn username(&self) -> &str {
        match self {
            AuthorIdentity::Known(summary) => &summary.username,
            AuthorIdentity::Unknown(_) => UNKNOWN_USERNAME,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, AuthorIdentity::Known(_))
    }
}

impl Serialize for AuthorIdentity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let photo = match self {
            AuthorIdentity::Known(summary) => summary.profile_photo_url.as_deref(),
            AuthorIdentity::Unknown(_) => None,
        };
        let mut state = serializer.serialize_struct("AuthorIdentity", 3)?;
        state.serialize_field("_id", &self.user_id())?;
        state.serialize_field("username", self.username())?;
        state.serialize_field("profilePhotoUrl", &photo)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_author_serialises_placeholder() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(AuthorIdentity::resolve(id, None)).unwrap();
        assert_eq!(json["username"], "Unknown User");
        assert!(json["profilePhotoUrl"].is_null());
        assert_eq!(json["_id"], id.to_string());
    }

    #[test]
    fn known_author_serialises_summary() {
        let summary = AuthorSummary {
            user_id: Uuid::new_v4(),
            username: "wren".into(),
            profile_photo_url: Some("avatars/wren.png".into()),
        };
        let identity = AuthorIdentity::resolve(summary.user_id, Some(&summary));
        assert!(identity.is_known());

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["username"], "wren");
        assert_eq!(json["profilePhotoUrl"], "avatars/wren.png");
    }

    #[test]
    fn profile_update_validation() {
        let ok = UpdateProfileRequest {
            username: Some("flappy_bird".into()),
            website: Some("https://flappy.dev".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let short = UpdateProfileRequest {
            username: Some("ab".into()),
            ..Default::default()
        };
        assert!(short.validate().is_err());

        let symbols = UpdateProfileRequest {
            username: Some("no spaces!".into()),
            ..Default::default()
        };
        assert!(symbols.validate().is_err());

        let bad_site = UpdateProfileRequest {
            website: Some("not a url".into()),
            ..Default::default()
        };
        assert!(bad_site.validate().is_err());
    }
}
