use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::CommentInput;
use crate::AppState;
use actix_web::{web, HttpResponse};

/// POST /posts/{post_id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: web::Json<CommentInput>,
) -> Result<HttpResponse> {
    let comment = state
        .comment_service()
        .add_comment(&user.0, path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// GET /posts/{post_id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let comments = state
        .comment_service()
        .list_comments(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}
