//! Registration, login and bearer-token authentication
use crate::db::Store;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{LoginRequest, RegisterRequest, TokenResponse, User};
use crate::services::identity::IdentityResolver;
use crypto_core::{hash_password, verify_password, TokenService};
use std::sync::Arc;
use tracing::{debug, info};

pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<User> {
        let RegisterRequest { email, password } = req;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::EmailAlreadyRegistered);
        }

        let hashed = run_blocking(move || hash_password(&password)).await??;

        // The store's unique constraint still decides races between two
        // registrations of the same email.
        let user = self.store.create_user(&email, &hashed).await?;

        metrics::record_auth_event("register");
        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse> {
        let user = self.store.find_user_by_email(&req.email).await?;

        let verified = match user {
            Some(user) => {
                let hash = user.hashed_password.clone();
                let password = req.password;
                if run_blocking(move || verify_password(&password, &hash)).await? {
                    Some(user)
                } else {
                    None
                }
            }
            None => None,
        };

        let user = match verified {
            Some(user) => user,
            None => {
                metrics::record_auth_event("login_failure");
                return Err(AppError::InvalidCredentials);
            }
        };

        let access_token = self
            .tokens
            .issue(&user.email)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        metrics::record_auth_event("login_success");
        info!(user_id = user.id, "User logged in");
        Ok(TokenResponse::bearer(access_token))
    }

    /// Resolve a bearer token to its user. Every failure collapses to
    /// `Unauthenticated`; the cause is only logged.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.tokens.validate(token).map_err(|e| {
            debug!(reason = %e, "Rejected bearer token");
            metrics::record_auth_event("token_rejected");
            AppError::Unauthenticated
        })?;

        match IdentityResolver::new(self.store.clone())
            .resolve(&claims.sub)
            .await
        {
            Ok(user) => Ok(user),
            Err(AppError::UserNotFound) => {
                debug!("Token subject no longer resolves to a user");
                metrics::record_auth_event("token_rejected");
                Err(AppError::Unauthenticated)
            }
            Err(e) => Err(e),
        }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))
}
