use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Reaction toggles by outcome (added, updated, removed).
    pub static ref REACTION_TOGGLE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "reaction_toggle_total",
        "Reaction toggles segmented by reaction kind and outcome",
        &["kind", "outcome"]
    )
    .expect("failed to register reaction_toggle_total");

    /// Bookmark toggles by outcome (added, removed, rejected).
    pub static ref BOOKMARK_TOGGLE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bookmark_toggle_total",
        "Bookmark toggles segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register bookmark_toggle_total");
}
