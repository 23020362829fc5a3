use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::{UserId, Viewer};
use crate::models::{ReactRequest, UserReactionResponse};
use crate::services::ReactionService;
use crate::state::AppState;

/// POST /posts/{id}/react
pub async fn react(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<ReactRequest>,
) -> Result<HttpResponse> {
    let service = ReactionService::new(&state.stores, state.features);
    let response = service.react(path.into_inner(), user_id.0, req.kind).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /posts/{id}/reactions
pub async fn get_reactions(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = ReactionService::new(&state.stores, state.features);
    let tally = service.tally(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tally))
}

/// GET /posts/{id}/user-reaction
pub async fn get_user_reaction(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = ReactionService::new(&state.stores, state.features);
    let reaction_type = service.user_reaction(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(UserReactionResponse { reaction_type }))
}

/// POST /posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let service = ReactionService::new(&state.stores, state.features);
    let response = service.toggle_like(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// GET /posts/{id}/likes
pub async fn get_likes(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    let service = ReactionService::new(&state.stores, state.features);
    let summary = service.like_summary(path.into_inner(), viewer.0).await?;
    Ok(HttpResponse::Ok().json(summary))
}
