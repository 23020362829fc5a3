use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::UserId;
use crate::models::UpdateProfileRequest;
use crate::services::UserService;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

/// GET /users/{id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = UserService::new(&state.stores)
        .get_user(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /users/{id} - callers may only update themselves
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    user_id: UserId,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let user = UserService::new(&state.stores)
        .update_profile(user_id.0, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// GET /users/search?username=
pub async fn search_users(
    state: web::Data<AppState>,
    query: web::Query<UsernameQuery>,
) -> Result<HttpResponse> {
    let users = UserService::new(&state.stores)
        .search_by_username(&query.username)
        .await?;
    Ok(HttpResponse::Ok().json(users))
}
