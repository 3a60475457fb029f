use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::User;
use std::sync::Arc;

/// Maps a token subject (email) to the persisted user.
pub struct IdentityResolver {
    store: Arc<dyn Store>,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, subject: &str) -> Result<User> {
        self.store
            .find_user_by_email(subject)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
