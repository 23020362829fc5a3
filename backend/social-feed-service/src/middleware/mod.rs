/// Request identity extractors
///
/// An upstream gateway authenticates the caller and forwards the user id in the
/// `x-user-id` header. Writes require it (`UserId`); reads accept anonymous
/// callers (`Viewer`).
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Optional caller for read endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer(pub Option<Uuid>);

/// `Ok(None)` when the header is absent, an error when it is present but not a UUID.
fn caller_id(req: &HttpRequest) -> Result<Option<Uuid>, AppError> {
    let Some(value) = req.headers().get(USER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid user id header".to_string()))
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(caller_id(req).and_then(|id| {
            id.map(UserId)
                .ok_or_else(|| AppError::Unauthorized("User ID missing".to_string()))
        }))
    }
}

impl FromRequest for Viewer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(caller_id(req).map(Viewer))
    }
}
