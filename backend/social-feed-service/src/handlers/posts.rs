/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{UserId, Viewer};
use crate::models::{CreatePostRequest, UpdatePostRequest};
use crate::services::PostService;
use crate::state::AppState;

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(&state.stores, state.features);
    let post = service.create_post(user_id.0, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Get a post by ID, decorated for the caller
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let service = PostService::new(&state.stores, state.features);
    let post = service.get_post(path.into_inner(), viewer.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Edit content or media of the caller's post
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new(&state.stores, state.features);
    let post = service
        .update_post(path.into_inner(), user_id.0, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete the caller's post
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = PostService::new(&state.stores, state.features);
    service.delete_post(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post deleted successfully"
    })))
}

/// Top hashtags by number of posts
pub async fn trending_tags(state: web::Data<AppState>) -> Result<HttpResponse> {
    let service = PostService::new(&state.stores, state.features);
    let tags = service.trending_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}
