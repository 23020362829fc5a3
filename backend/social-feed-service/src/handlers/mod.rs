/// HTTP handlers for the social feed service
///
/// This module contains handlers for:
/// - Feeds: home, reels, explore, user timelines and bookmarks
/// - Posts: create, read, edit, delete, trending hashtags
/// - Engagement: reactions, the legacy like view, bookmarks, comments and replies
/// - Search, user profiles and feature flags
pub mod bookmarks;
pub mod comments;
pub mod feature_flags;
pub mod feed;
pub mod health;
pub mod posts;
pub mod reactions;
pub mod search;
pub mod users;

use actix_web::web;

use crate::error::AppError;

/// JSON and query extractor failures use the service's error body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Register every route. Literal path segments are registered before
/// `{id}` captures so they are matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/feed")
            .route("/home", web::get().to(feed::home_feed))
            .route("/reels", web::get().to(feed::reels_feed))
            .route("/explore", web::get().to(feed::explore_feed)),
    )
    .service(
        web::scope("/posts")
            .route("", web::post().to(posts::create_post))
            .route("/trending-tags", web::get().to(posts::trending_tags))
            .route("/user/{user_id}", web::get().to(feed::user_posts))
            .route(
                "/user/{user_id}/bookmarks",
                web::get().to(feed::user_bookmarks),
            )
            .route("/{id}", web::get().to(posts::get_post))
            .route("/{id}", web::put().to(posts::update_post))
            .route("/{id}", web::delete().to(posts::delete_post))
            .route("/{id}/react", web::post().to(reactions::react))
            .route("/{id}/reactions", web::get().to(reactions::get_reactions))
            .route(
                "/{id}/user-reaction",
                web::get().to(reactions::get_user_reaction),
            )
            .route("/{id}/like", web::post().to(reactions::like_post))
            .route("/{id}/likes", web::get().to(reactions::get_likes))
            .route("/{id}/bookmark", web::post().to(bookmarks::toggle_bookmark))
            .route("/{id}/save", web::post().to(bookmarks::toggle_bookmark))
            .route(
                "/{id}/bookmark-status",
                web::get().to(bookmarks::bookmark_status),
            )
            .route("/{id}/comment", web::post().to(comments::create_comment))
            .route(
                "/{id}/comment/{comment_id}/reply",
                web::post().to(comments::reply_to_comment),
            )
            .route("/{id}/comments", web::get().to(comments::list_comments)),
    )
    .service(
        web::scope("/search")
            .route("/users", web::get().to(search::search_users))
            .route("/posts", web::get().to(search::search_posts))
            .route("/trending-tags", web::get().to(search::trending_tags)),
    )
    .service(
        web::scope("/users")
            .route("/search", web::get().to(users::search_users))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::put().to(users::update_user)),
    )
    .service(
        web::scope("/feature-flags")
            .route("", web::get().to(feature_flags::get_feature_flags))
            .route(
                "/post-types",
                web::get().to(feature_flags::get_enabled_post_types),
            ),
    );
}
