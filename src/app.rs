//! Router assembly
//! Mission: Wire auth state, public routes and token-gated routes together

use crate::{
    auth::{
        api as auth_api, auth_middleware, AuthState, InMemoryUserStore, JwtHandler,
        PasswordHasher,
    },
    config::Config,
    middleware::request_logging,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the auth state described by `config`, backed by the in-memory store
pub fn auth_state_from_config(config: &Config) -> AuthState {
    let user_store = Arc::new(InMemoryUserStore::new(config.duplicate_policy()));
    let hasher = Arc::new(PasswordHasher::new(config.bcrypt_cost));
    let jwt_handler = Arc::new(JwtHandler::new(config.token_secret(), config.token_ttl()));

    AuthState::new(user_store, hasher, jwt_handler)
}

/// Build the full application router
pub fn build_router(state: AuthState) -> Router {
    // Credential routes
    let auth_router = Router::new()
        .route("/register", post(auth_api::register))
        .route("/login", post(auth_api::login))
        .with_state(state.clone());

    // Routes that require a verified bearer token
    let protected_routes = Router::new()
        .route("/protected", get(auth_api::protected))
        .route("/restricted", get(auth_api::restricted))
        .route("/me", get(auth_api::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_handler.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> &'static str {
    "OK"
}
