use crate::users::{repo::UserRepository, services::CredentialService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
}

impl AppState {
    pub fn from_parts(store: Arc<dyn UserRepository>) -> Self {
        Self {
            credentials: CredentialService::new(store),
        }
    }
}
