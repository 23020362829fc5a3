use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::Viewer;
use crate::services::feed::normalize_page;
use crate::services::{FeedService, FeedVariant};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

async fn serve_feed(
    state: &AppState,
    variant: FeedVariant,
    query: &PageQuery,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let service = FeedService::new(&state.stores, state.feed);
    let page = service
        .feed(variant, normalize_page(query.page), viewer.0)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /feed/home
pub async fn home_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    serve_feed(&state, FeedVariant::Home, &query, viewer).await
}

/// GET /feed/reels - image and gif posts only
pub async fn reels_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    serve_feed(&state, FeedVariant::Reels, &query, viewer).await
}

/// GET /feed/explore
pub async fn explore_feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    serve_feed(&state, FeedVariant::Explore, &query, viewer).await
}

/// GET /posts/user/{user_id}
pub async fn user_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let service = FeedService::new(&state.stores, state.feed);
    let page = service
        .user_timeline(path.into_inner(), normalize_page(query.page), viewer.0)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /posts/user/{user_id}/bookmarks
pub async fn user_bookmarks(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let service = FeedService::new(&state.stores, state.feed);
    let page = service
        .bookmarks(path.into_inner(), normalize_page(query.page), viewer.0)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
