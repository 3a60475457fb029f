//! Registration and login endpoints
use crate::error::Result;
use crate::models::{LoginRequest, RegisterRequest};
use crate::AppState;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let user = state.auth_service().register(req).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    req.validate()?;

    let token = state.auth_service().login(req).await?;
    Ok(HttpResponse::Ok().json(token))
}
