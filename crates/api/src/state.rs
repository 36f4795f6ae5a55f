//! Shared application state

use sqlx::PgPool;

use crate::{
    auth::{AuthState, JwtManager},
    config::Config,
    email::EmailService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub jwt: Option<JwtManager>,
    pub email: EmailService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config, email: EmailService) -> Self {
        let jwt = config
            .jwt_secret
            .as_deref()
            .map(|secret| JwtManager::new(secret, config.jwt_expiry_hours));

        if jwt.is_none() {
            tracing::warn!(
                "JWT_SECRET is not set; protected routes will answer with a configuration error"
            );
        }

        Self {
            pool,
            config,
            jwt,
            email,
        }
    }

    /// Narrow state handed to the auth middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            jwt: self.jwt.clone(),
            pool: self.pool.clone(),
        }
    }
}
