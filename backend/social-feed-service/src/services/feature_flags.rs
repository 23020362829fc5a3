use serde::Serialize;

use crate::models::{PostType, ReactionKind};

/// Feature toggles, read once at start-up and shared through `AppState`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub enable_image_posts: bool,
    pub enable_gif_posts: bool,
    pub enable_video_uploads: bool,
    pub enable_advanced_search: bool,
    pub enable_reactions: bool,
    pub enable_notifications: bool,
    pub enable_chat: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnabledPostTypes {
    pub enabled_types: Vec<PostType>,
}

impl FeatureFlags {
    /// Every flag on. Convenient for tests and local runs.
    pub fn all_enabled() -> Self {
        Self {
            enable_image_posts: true,
            enable_gif_posts: true,
            enable_video_uploads: true,
            enable_advanced_search: true,
            enable_reactions: true,
            enable_notifications: true,
            enable_chat: true,
        }
    }

    /// Build from a key lookup. A flag is on only when its value is exactly `true`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "true")
                .unwrap_or(false)
        };

        Self {
            enable_image_posts: flag("ENABLE_IMAGE_POSTS"),
            enable_gif_posts: flag("ENABLE_GIF_POSTS"),
            enable_video_uploads: flag("ENABLE_VIDEO_UPLOADS"),
            enable_advanced_search: flag("ENABLE_ADVANCED_SEARCH"),
            enable_reactions: flag("ENABLE_REACTIONS"),
            enable_notifications: flag("ENABLE_NOTIFICATIONS"),
            enable_chat: flag("ENABLE_CHAT"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_post_type_enabled(&self, post_type: PostType) -> bool {
        match post_type {
            PostType::Text => true,
            PostType::Image => self.enable_image_posts,
            PostType::Gif => self.enable_gif_posts,
        }
    }

    /// Text first, then image, then gif.
    pub fn enabled_post_types(&self) -> Vec<PostType> {
        PostType::ALL
            .into_iter()
            .filter(|t| self.is_post_type_enabled(*t))
            .collect()
    }

    /// With reactions off, only the legacy like (`love`) is accepted.
    pub fn is_reaction_enabled(&self, kind: ReactionKind) -> bool {
        self.enable_reactions || kind == ReactionKind::Love
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flags_default_off() {
        let flags = FeatureFlags::from_lookup(lookup(&[]));
        assert_eq!(flags, FeatureFlags::default());
        assert_eq!(flags.enabled_post_types(), vec![PostType::Text]);
    }

    #[test]
    fn only_literal_true_enables() {
        let flags = FeatureFlags::from_lookup(lookup(&[
            ("ENABLE_GIF_POSTS", "true"),
            ("ENABLE_IMAGE_POSTS", "1"),
            ("ENABLE_REACTIONS", "TRUE"),
            ("ENABLE_CHAT", " true "),
        ]));
        assert!(flags.enable_gif_posts);
        assert!(!flags.enable_image_posts);
        assert!(!flags.enable_reactions);
        assert!(!flags.enable_chat);
        assert_eq!(
            flags.enabled_post_types(),
            vec![PostType::Text, PostType::Gif]
        );
    }

    #[test]
    fn reactions_off_allows_only_love() {
        let flags = FeatureFlags::default();
        assert!(flags.is_reaction_enabled(ReactionKind::Love));
        assert!(!flags.is_reaction_enabled(ReactionKind::Wow));

        let all = FeatureFlags::all_enabled();
        assert!(ReactionKind::ALL.iter().all(|k| all.is_reaction_enabled(*k)));
    }
}
