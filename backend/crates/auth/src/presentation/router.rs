//! Auth Router

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::application::{AuthConfig, CredentialService};
use crate::domain::repository::CredentialStore;
use crate::error::AuthResult;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any credential store
///
/// Routes are relative; the binary nests them under `/auth`.
pub fn auth_router<S>(store: S, config: AuthConfig) -> AuthResult<Router>
where
    S: CredentialStore + Send + Sync + 'static,
{
    let service = CredentialService::new(Arc::new(store), Arc::new(config))?;
    let state = AuthAppState {
        service: Arc::new(service),
    };

    Ok(Router::new()
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .with_state(state))
}
