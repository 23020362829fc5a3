use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    /// Total feed pages served by variant (home, reels, explore, timeline, bookmarks).
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "feed_request_total",
        "Total feed pages served segmented by variant",
        &["variant"]
    )
    .expect("failed to register feed_request_total");

    /// Time spent enriching a single post.
    pub static ref POST_ENRICHMENT_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "post_enrichment_duration_seconds",
        "Duration of post enrichment segmented by result",
        &["result"]
    )
    .expect("failed to register post_enrichment_duration_seconds");

    /// Posts per served page.
    pub static ref FEED_PAGE_SIZE: HistogramVec = register_histogram_vec!(
        "feed_page_posts",
        "Number of posts returned per feed page segmented by variant",
        &["variant"],
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0]
    )
    .expect("failed to register feed_page_posts");
}
