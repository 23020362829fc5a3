use crate::db::Stores;
use crate::services::{FeatureFlags, FeedConfig};

/// Shared across all workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub feed: FeedConfig,
    pub features: FeatureFlags,
}

impl AppState {
    pub fn new(stores: Stores, feed: FeedConfig, features: FeatureFlags) -> Self {
        Self {
            stores,
            feed,
            features,
        }
    }
}
