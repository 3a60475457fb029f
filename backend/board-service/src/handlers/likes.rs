use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{LikeCountResponse, LikedResponse};
use crate::AppState;
use actix_web::{web, HttpResponse};

/// POST /posts/{post_id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let status = state
        .like_service()
        .toggle(&user.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

/// GET /posts/{post_id}/likes
pub async fn get_likes(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let likes = state.like_service().count(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LikeCountResponse { likes }))
}

/// GET /posts/{post_id}/liked
pub async fn is_liked(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let liked = state
        .like_service()
        .status(&user.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(LikedResponse { liked }))
}
