//! Board Service Library
//!
//! Users register and log in, publish posts, like them and comment on them.
//!
//! # Modules
//!
//! - `handlers`: HTTP request handlers
//! - `models`: Rows and request/response DTOs
//! - `services`: Business logic layer
//! - `db`: Storage seam with PostgreSQL and in-memory backends
//! - `middleware`: Bearer authentication and ownership checks
//! - `error`: Error types and HTTP mapping
//! - `config`: Configuration management
//! - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use crypto_core::TokenService;
use db::Store;
use services::{AuthService, CommentService, LikeService, PostService};
use std::sync::Arc;

/// Shared application state; cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.tokens.clone())
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(self.store.clone())
    }

    pub fn like_service(&self) -> LikeService {
        LikeService::new(self.store.clone())
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(self.store.clone())
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(format!("Invalid request body: {}", err)).into()
}

fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(format!("Invalid query string: {}", err)).into()
}

fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(format!("Invalid path parameter: {}", err)).into()
}

/// Register every route plus the extractor configs that render malformed
/// input as `400` JSON errors.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .route("/", web::get().to(handlers::health::root))
        .route("/health", web::get().to(handlers::health::health_check))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/register", web::post().to(handlers::auth::register))
        .route("/login", web::post().to(handlers::auth::login))
        .service(
            web::resource("/posts")
                .route(web::get().to(handlers::posts::list_posts))
                .route(web::post().to(handlers::posts::create_post)),
        )
        .service(
            web::resource("/posts/{post_id}")
                .route(web::put().to(handlers::posts::update_post))
                .route(web::delete().to(handlers::posts::delete_post)),
        )
        .route(
            "/posts/{post_id}/like",
            web::post().to(handlers::likes::toggle_like),
        )
        .route(
            "/posts/{post_id}/likes",
            web::get().to(handlers::likes::get_likes),
        )
        .route(
            "/posts/{post_id}/liked",
            web::get().to(handlers::likes::is_liked),
        )
        .service(
            web::resource("/posts/{post_id}/comments")
                .route(web::get().to(handlers::comments::list_comments))
                .route(web::post().to(handlers::comments::add_comment)),
        );
}
