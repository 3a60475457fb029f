//! Post handlers - HTTP endpoints for post operations
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{MessageResponse, PostInput, PostListQuery};
use crate::AppState;
use actix_web::{web, HttpResponse};

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<PostInput>,
) -> Result<HttpResponse> {
    let post = state
        .post_service()
        .create_post(&user.0, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /posts?skip&limit
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse> {
    let posts = state.post_service().list_posts(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// PUT /posts/{post_id}
///
/// The body is extracted fallibly so a non-owner gets `403` even when the
/// payload is malformed.
pub async fn update_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: std::result::Result<web::Json<PostInput>, actix_web::Error>,
) -> Result<HttpResponse> {
    let input = req
        .map(web::Json::into_inner)
        .map_err(|e| AppError::Validation(e.to_string()));

    let post = state
        .post_service()
        .update_post(&user.0, path.into_inner(), input)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state
        .post_service()
        .delete_post(&user.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted".to_string(),
    }))
}
