use actix_web::{web, HttpResponse};

use crate::services::feature_flags::EnabledPostTypes;
use crate::state::AppState;

/// GET /feature-flags
pub async fn get_feature_flags(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.features)
}

/// GET /feature-flags/post-types
pub async fn get_enabled_post_types(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(EnabledPostTypes {
        enabled_types: state.features.enabled_post_types(),
    })
}
