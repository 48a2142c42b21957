//! Authentication API Endpoints
//! Mission: Provide registration, login and token-gated endpoints

use crate::auth::{
    jwt::JwtHandler,
    middleware::AuthUser,
    models::{Claims, CredentialsRequest, LoginResponse, User},
    password::PasswordHasher,
    user_store::{StoreError, UserStore},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<dyn UserStore>,
    pub hasher: Arc<PasswordHasher>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        jwt_handler: Arc<JwtHandler>,
    ) -> Self {
        Self {
            user_store,
            hasher,
            jwt_handler,
        }
    }
}

/// Register endpoint - POST /register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<StatusCode, AuthApiError> {
    let (username, password) = payload.validated().ok_or(AuthApiError::MissingCredentials)?;

    let password_hash = state.hasher.hash(password).await.map_err(|e| {
        error!("Failed to hash password for {}: {}", username, e);
        AuthApiError::InternalError
    })?;

    state
        .user_store
        .register(User::new(username, password_hash))
        .await
        .map_err(|e| match e {
            StoreError::Conflict { .. } => {
                warn!("❌ Registration refused, username taken: {}", username);
                AuthApiError::UserAlreadyExists
            }
            StoreError::Backend(msg) => {
                error!("Failed to store user {}: {}", username, msg);
                AuthApiError::InternalError
            }
        })?;

    Ok(StatusCode::CREATED)
}

/// Login endpoint - POST /login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let (username, password) = payload.validated().ok_or(AuthApiError::MissingCredentials)?;

    info!("🔐 Login attempt: {}", username);

    let user = state
        .user_store
        .find_by_username(username)
        .await
        .map_err(|e| {
            error!("User lookup failed for {}: {}", username, e);
            AuthApiError::InternalError
        })?
        .ok_or(AuthApiError::UserNotFound)?;

    let valid = state
        .hasher
        .verify(password, &user.password_hash)
        .await
        .map_err(|e| {
            error!("Password comparison failed for {}: {}", username, e);
            AuthApiError::InternalError
        })?;

    if !valid {
        warn!("❌ Failed login attempt: {}", username);
        return Err(AuthApiError::InvalidPassword);
    }

    let access_token = state.jwt_handler.issue(&user.username).map_err(|e| {
        error!("Failed to sign token for {}: {:#}", username, e);
        AuthApiError::InternalError
    })?;

    info!("✅ Login successful: {}", user.username);

    Ok(Json(LoginResponse { access_token }))
}

/// Protected resource - GET /protected
pub async fn protected(AuthUser(claims): AuthUser) -> &'static str {
    info!("Protected route accessed by {}", claims.username);
    "Protected route accessed successfully"
}

/// Restricted resource - GET /restricted
pub async fn restricted(AuthUser(claims): AuthUser) -> &'static str {
    info!("Restricted route accessed by {}", claims.username);
    "You have accessed the restricted endpoint!"
}

/// Get current identity - GET /me
/// Answers straight from the verified token, no store lookup
pub async fn get_current_user(AuthUser(claims): AuthUser) -> Json<Claims> {
    Json(claims)
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    MissingCredentials,
    UserNotFound,
    InvalidPassword,
    UserAlreadyExists,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "Username and password are required",
            ),
            AuthApiError::UserNotFound => (StatusCode::BAD_REQUEST, "User not found"),
            AuthApiError::InvalidPassword => (StatusCode::FORBIDDEN, "Invalid password"),
            AuthApiError::UserAlreadyExists => (StatusCode::CONFLICT, "Username already exists"),
            AuthApiError::InternalError => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };

        (status, message).into_response()
    }
}
