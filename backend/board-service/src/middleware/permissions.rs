//! Ownership checks for mutating operations
//!
//! Only a post's owner may update or delete it. Comments and likes are not
//! guarded here: any authenticated user may comment, and likes are scoped
//! to the caller by construction.
use crate::error::AppError;
use crate::models::{Post, User};

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Allowed iff the actor owns the resource
pub fn authorize(actor: &User, resource_owner_id: i64) -> PermissionResult {
    if actor.id == resource_owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub fn check_post_ownership(actor: &User, post: &Post) -> PermissionResult {
    authorize(actor, post.owner_id)
}

/// Only the owner can update their own posts
pub fn check_post_update(actor: &User, post: &Post) -> PermissionResult {
    check_post_ownership(actor, post)
}

/// Only the owner can delete their own posts
pub fn check_post_deletion(actor: &User, post: &Post) -> PermissionResult {
    check_post_ownership(actor, post)
}
