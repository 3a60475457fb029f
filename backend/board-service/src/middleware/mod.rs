//! HTTP authentication for board-service
//!
//! `AuthenticatedUser` is an extractor: handlers that take it require a
//! valid bearer token, and public handlers simply don't ask for it.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

/// The user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token.to_string())
    } else {
        None
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let state = state
                .ok_or_else(|| AppError::Internal("AppState is not registered".to_string()))?;
            let token = token.ok_or_else(|| {
                tracing::debug!("Missing or malformed Authorization header");
                AppError::Unauthenticated
            })?;

            state
                .auth_service()
                .authenticate(&token)
                .await
                .map(AuthenticatedUser)
        })
    }
}
