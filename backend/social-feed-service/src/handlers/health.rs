use actix_web::{web, HttpResponse};

use crate::models::PostQuery;
use crate::state::AppState;

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "social-feed-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe - runs an empty listing against the post store
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    let probe = PostQuery {
        limit: 0,
        ..Default::default()
    };
    match state.stores.posts.list(&probe).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "error": e.to_string(),
            }))
        }
    }
}
