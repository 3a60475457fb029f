//! Business logic layer
pub mod auth;
pub mod comments;
pub mod identity;
pub mod likes;
pub mod posts;

pub use auth::AuthService;
pub use comments::CommentService;
pub use identity::IdentityResolver;
pub use likes::LikeService;
pub use posts::PostService;
