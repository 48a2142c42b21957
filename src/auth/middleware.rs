//! Authentication Middleware
//! Mission: Protect API endpoints with JWT validation

use crate::auth::{
    jwt::{JwtHandler, VerificationError},
    models::Claims,
};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// What the `Authorization` header yields
#[derive(Debug, PartialEq, Eq)]
pub enum BearerToken<'a> {
    /// Header absent, empty or not readable as text
    Missing,
    /// Header present but carries no bearer token
    Malformed,
    Present(&'a str),
}

/// Classify the `Authorization` header of a request
pub fn bearer_token(headers: &HeaderMap) -> BearerToken<'_> {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    else {
        return BearerToken::Missing;
    };

    let mut fields = value.split(' ');
    let scheme = fields.next().unwrap_or_default();
    match fields.next() {
        Some(token) if !token.is_empty() && scheme.eq_ignore_ascii_case("Bearer") => {
            BearerToken::Present(token)
        }
        _ => BearerToken::Malformed,
    }
}

/// Auth middleware that validates JWT tokens
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = match bearer_token(req.headers()) {
        BearerToken::Present(token) => token,
        BearerToken::Missing => {
            let err = AuthError::MissingToken;
            debug!(path = %req.uri().path(), "{}", err.reason());
            return Err(err);
        }
        BearerToken::Malformed => {
            let err = AuthError::InvalidFormat;
            warn!(path = %req.uri().path(), "{}", err.reason());
            return Err(err);
        }
    };

    // Validate token and extract claims
    let claims = jwt_handler.verify(token).map_err(|e| {
        let err = AuthError::InvalidToken(e);
        warn!(path = %req.uri().path(), "{}", err.reason());
        err
    })?;

    debug!("Authenticated request for {}", claims.username);

    // Add claims to request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Identity recovered by [`auth_middleware`]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AuthError::MissingToken)
    }
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken(VerificationError),
}

impl AuthError {
    /// Log-friendly description; the response body stays generic
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Missing Authorization header",
            AuthError::InvalidFormat => "Malformed Authorization header",
            AuthError::InvalidToken(VerificationError::Malformed) => "Malformed bearer token",
            AuthError::InvalidToken(VerificationError::SignatureInvalid) => {
                "Bearer token signature invalid"
            }
            AuthError::InvalidToken(VerificationError::Expired) => "Bearer token expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken | AuthError::InvalidFormat => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AuthError::InvalidToken(_) => (StatusCode::FORBIDDEN, "Forbidden"),
        };

        (status, message).into_response()
    }
}
