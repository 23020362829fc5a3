/// Comment handlers - comments and their embedded replies
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::CommentRequest;
use crate::services::CommentService;
use crate::state::AppState;

/// POST /posts/{id}/comment
pub async fn create_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let service = CommentService::new(&state.stores);
    let comment = service
        .create_comment(path.into_inner(), user_id.0, &req.text)
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "data": comment })))
}

/// POST /posts/{id}/comment/{comment_id}/reply
pub async fn reply_to_comment(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    user_id: UserId,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let service = CommentService::new(&state.stores);
    let comment = service
        .reply(post_id, comment_id, user_id.0, &req.text)
        .await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "data": comment })))
}

/// GET /posts/{id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = CommentService::new(&state.stores);
    let comments = service.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "data": comments })))
}
