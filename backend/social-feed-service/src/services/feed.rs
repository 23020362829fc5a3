//! Feed pagination.
//!
//! Selects a chronological page of posts, enriches every post for the viewer
//! and wraps the result in a `{ posts, page, hasMore }` envelope.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::enrichment::PostEnricher;
use crate::db::{BookmarkStore, PostStore, Stores};
use crate::error::Result;
use crate::metrics::feed::{FEED_PAGE_SIZE, FEED_REQUEST_TOTAL};
use crate::models::{FeedPage, Post, PostQuery, PostType};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// How `hasMore` is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HasMorePolicy {
    /// `hasMore` when the page came back full. Can report a trailing empty page.
    #[default]
    FullPage,
    /// Fetch one extra record and report whether it existed.
    Lookahead,
}

impl HasMorePolicy {
    pub fn fetch_limit(&self, page_size: i64) -> i64 {
        match self {
            HasMorePolicy::FullPage => page_size,
            HasMorePolicy::Lookahead => page_size + 1,
        }
    }

    /// Trim fetched records to the page and compute `hasMore`.
    pub fn split<T>(&self, mut fetched: Vec<T>, page_size: i64) -> (Vec<T>, bool) {
        let size = page_size.max(0) as usize;
        match self {
            HasMorePolicy::FullPage => {
                let has_more = fetched.len() == size;
                (fetched, has_more)
            }
            HasMorePolicy::Lookahead => {
                let has_more = fetched.len() > size;
                fetched.truncate(size);
                (fetched, has_more)
            }
        }
    }
}

impl fmt::Display for HasMorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HasMorePolicy::FullPage => f.write_str("full_page"),
            HasMorePolicy::Lookahead => f.write_str("lookahead"),
        }
    }
}

impl FromStr for HasMorePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full_page" => Ok(HasMorePolicy::FullPage),
            "lookahead" => Ok(HasMorePolicy::Lookahead),
            other => Err(format!(
                "unknown has-more policy '{}', expected full_page or lookahead",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub page_size: i64,
    pub has_more_policy: HasMorePolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            has_more_policy: HasMorePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedVariant {
    Home,
    Reels,
    Explore,
}

impl FeedVariant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FeedVariant::Home => "home",
            FeedVariant::Reels => "reels",
            FeedVariant::Explore => "explore",
        }
    }

    /// Post types shown by this feed; `None` means all.
    pub fn post_types(&self) -> Option<Vec<PostType>> {
        match self {
            FeedVariant::Reels => Some(PostType::MEDIA.to_vec()),
            FeedVariant::Home | FeedVariant::Explore => None,
        }
    }
}

/// Pages are 1-based; anything below 1 is treated as the first page.
pub fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

pub fn page_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size)
}

pub struct FeedService {
    posts: Arc<dyn PostStore>,
    bookmarks: Arc<dyn BookmarkStore>,
    enricher: PostEnricher,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(stores: &Stores, config: FeedConfig) -> Self {
        Self {
            posts: stores.posts.clone(),
            bookmarks: stores.bookmarks.clone(),
            enricher: PostEnricher::new(stores),
            config,
        }
    }

    pub async fn feed(
        &self,
        variant: FeedVariant,
        page: i64,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        self.chronological(variant.as_str(), variant.post_types(), None, page, viewer)
            .await
    }

    /// Posts by one author, newest first.
    pub async fn user_timeline(
        &self,
        author_id: Uuid,
        page: i64,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        self.chronological("timeline", None, Some(author_id), page, viewer)
            .await
    }

    /// A user's bookmarked posts, most recently bookmarked first.
    /// Bookmarks whose post has been deleted are skipped.
    pub async fn bookmarks(
        &self,
        user_id: Uuid,
        page: i64,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let page = page.max(1);
        let policy = self.config.has_more_policy;
        let size = self.config.page_size;

        let fetched = self
            .bookmarks
            .list_post_ids(user_id, page_offset(page, size), policy.fetch_limit(size))
            .await?;
        let (ids, has_more) = policy.split(fetched, size);

        let mut by_id: HashMap<Uuid, Post> = self
            .posts
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let posts: Vec<Post> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if posts.len() < ids.len() {
            debug!(
                user_id = %user_id,
                orphaned = ids.len() - posts.len(),
                "skipping bookmarks of deleted posts"
            );
        }

        self.finish("bookmarks", posts, page, has_more, viewer).await
    }

    async fn chronological(
        &self,
        label: &'static str,
        types: Option<Vec<PostType>>,
        author_id: Option<Uuid>,
        page: i64,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let page = page.max(1);
        let policy = self.config.has_more_policy;
        let size = self.config.page_size;

        let query = PostQuery {
            types,
            author_id,
            offset: page_offset(page, size),
            limit: policy.fetch_limit(size),
        };
        let fetched = self.posts.list(&query).await?;
        let (posts, has_more) = policy.split(fetched, size);

        self.finish(label, posts, page, has_more, viewer).await
    }

    async fn finish(
        &self,
        label: &'static str,
        posts: Vec<Post>,
        page: i64,
        has_more: bool,
        viewer: Option<Uuid>,
    ) -> Result<FeedPage> {
        let posts = self.enricher.enrich_page(posts, viewer).await?;

        FEED_REQUEST_TOTAL.with_label_values(&[label]).inc();
        FEED_PAGE_SIZE
            .with_label_values(&[label])
            .observe(posts.len() as f64);
        debug!(
            feed = label,
            page,
            returned = posts.len(),
            has_more,
            "feed page assembled"
        );

        Ok(FeedPage {
            posts,
            page,
            has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-4, 10), 0);
    }

    #[test]
    fn normalize_defaults_and_clamps() {
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(Some(7)), 7);
    }

    fn ids(n: i32) -> Vec<i32> {
        (0..n).collect()
    }

    #[test]
    fn full_page_policy_reports_full_pages() {
        let policy = HasMorePolicy::FullPage;
        assert_eq!(policy.fetch_limit(10), 10);
        assert_eq!(policy.split(ids(10), 10), (ids(10), true));
        assert_eq!(policy.split(ids(9), 10), (ids(9), false));
    }

    #[test]
    fn lookahead_policy_trims_extra_record() {
        let policy = HasMorePolicy::Lookahead;
        assert_eq!(policy.fetch_limit(10), 11);
        assert_eq!(policy.split(ids(11), 10), (ids(10), true));
        assert_eq!(policy.split(ids(10), 10), (ids(10), false));
        assert_eq!(policy.split(ids(9), 10), (ids(9), false));
    }

    #[test]
    fn policy_parses_from_config_value() {
        assert_eq!(
            "lookahead".parse::<HasMorePolicy>().unwrap(),
            HasMorePolicy::Lookahead
        );
        assert_eq!(
            " FULL_PAGE ".parse::<HasMorePolicy>().unwrap(),
            HasMorePolicy::FullPage
        );
        assert!("sometimes".parse::<HasMorePolicy>().is_err());
    }

    #[test]
    fn reels_only_show_media() {
        assert_eq!(
            FeedVariant::Reels.post_types(),
            Some(vec![PostType::Image, PostType::Gif])
        );
        assert_eq!(FeedVariant::Home.post_types(), None);
    }
}
