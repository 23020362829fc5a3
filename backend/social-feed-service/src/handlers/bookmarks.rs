use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::BookmarkStatusResponse;
use crate::services::BookmarkService;
use crate::state::AppState;

/// POST /posts/{id}/bookmark (also mounted as /save)
pub async fn toggle_bookmark(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = BookmarkService::new(&state.stores);
    let response = service.toggle(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /posts/{id}/bookmark-status
pub async fn bookmark_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = BookmarkService::new(&state.stores);
    let is_bookmarked = service.status(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(BookmarkStatusResponse { is_bookmarked }))
}
