/// Social Feed Service Library
///
/// Assembles post feeds and aggregates engagement (reactions, bookmarks,
/// comments) for the Flappy social app.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and the route table
/// - `models`: Posts, reactions, bookmarks, comments, users and feed envelopes
/// - `services`: Reaction tally, viewer context, post enrichment, feed pagination and the rest
/// - `db`: Store traits with PostgreSQL and in-memory implementations
/// - `middleware`: Caller identity extractors
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
