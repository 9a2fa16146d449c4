use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    error::{AuthError, StoreError},
    users::{dto::RegisterRequest, repo::UserRepository, repo_types::User},
};

/// Registration and login on top of a [`UserRepository`]. Holds no cached rows.
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn UserRepository>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn UserRepository>) -> Self {
        Self { store }
    }

    /// Duplicate usernames are accepted and become separate records.
    pub async fn register(&self, candidate: RegisterRequest) -> Result<User, AuthError> {
        if candidate.username.trim().is_empty() {
            return Err(AuthError::MalformedInput("username must not be empty".into()));
        }
        if candidate.password.is_empty() {
            return Err(AuthError::MalformedInput("password must not be empty".into()));
        }

        self.store
            .insert(&candidate.username, &candidate.email, &candidate.password)
            .await
            .map_err(|e| {
                error!(error = %e, username = %candidate.username, "insert user failed");
                AuthError::PersistenceFailure(e.to_string())
            })
    }

    /// Unknown user and wrong password are both `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            debug!("login with empty credentials");
            return Err(AuthError::InvalidCredentials);
        }

        match self.store.find_by_credentials(username, password).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => {
                warn!(username = %username, "login invalid credentials");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                error!(error = %e, "find_by_credentials failed");
                Err(AuthError::PersistenceFailure(e.to_string()))
            }
        }
    }
}
