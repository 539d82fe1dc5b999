//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, State};
use axum::http::{StatusCode, Uri};
use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};

use crate::application::{CredentialService, LoginInput, RegisterInput};
use crate::domain::repository::CredentialStore;
use crate::presentation::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Shared state for auth handlers
pub struct AuthAppState<S>
where
    S: CredentialStore + Send + Sync + 'static,
{
    pub service: Arc<CredentialService<S>>,
}

impl<S> Clone for AuthAppState<S>
where
    S: CredentialStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Body rejections carry the request path like every other error
fn reject(rejection: JsonRejection, uri: &Uri) -> AppError {
    tracing::debug!(path = uri.path(), error = %rejection, "Rejected request body");
    AppError::from(rejection).with_path(uri.path().to_string())
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)>
where
    S: CredentialStore + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| reject(rejection, &uri))?;

    let input = RegisterInput {
        first_name: req.first_name,
        last_name: req.last_name,
        user_name: req.username,
        email: req.email,
        password: req.password,
    };

    let summary = state
        .service
        .register(input)
        .await
        .map_err(|e| e.into_app_error_at(uri.path()))?;

    Ok((StatusCode::CREATED, Json(summary.into())))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>>
where
    S: CredentialStore + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|rejection| reject(rejection, &uri))?;

    let input = LoginInput {
        user_name: req.username,
        password: req.password,
    };

    let summary = state
        .service
        .login(input)
        .await
        .map_err(|e| e.into_app_error_at(uri.path()))?;

    Ok(Json(summary.into()))
}
