use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use serde::de::DeserializeOwned;
use tracing::{info, instrument, warn};

use crate::{
    error::AuthError,
    state::AppState,
    users::dto::{LoginRequest, LoginResponse, RegisterRequest, LOGGED_IN_MESSAGE, REGISTERED_MESSAGE},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register).fallback(method_not_allowed))
        .route("/login", post(login).fallback(method_not_allowed))
}

#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, &'static str), AuthError> {
    let payload: RegisterRequest = decode(&body)?;

    let user = state.credentials.register(payload).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, REGISTERED_MESSAGE))
}

#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, AuthError> {
    let payload: LoginRequest = decode(&body)?;

    // Callers never learn why a login failed; the service has already logged it.
    let user = state
        .credentials
        .login(&payload.username, &payload.password)
        .await
        .map_err(|e| match e {
            AuthError::PersistenceFailure(_) => AuthError::InvalidCredentials,
            other => other,
        })?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: LOGGED_IN_MESSAGE.into(),
        user: user.into(),
    }))
}

async fn method_not_allowed() -> AuthError {
    AuthError::MethodNotAllowed
}

/// Bodies are JSON whatever the `Content-Type`; `file://` pages post `text/plain`
/// to skip the preflight.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, AuthError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "rejected request body");
        AuthError::MalformedInput(e.to_string())
    })
}
