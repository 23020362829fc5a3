use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{PostService, SearchService};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /search/users?q=
pub async fn search_users(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let users = SearchService::new(&state.stores)
        .search_users(&query.q)
        .await?;
    Ok(HttpResponse::Ok().json(users))
}

/// GET /search/posts?q=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let posts = SearchService::new(&state.stores)
        .search_posts(&query.q)
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /search/trending-tags
pub async fn trending_tags(state: web::Data<AppState>) -> Result<HttpResponse> {
    let tags = PostService::new(&state.stores, state.features)
        .trending_tags()
        .await?;
    Ok(HttpResponse::Ok().json(tags))
}
