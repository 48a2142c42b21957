//! JWT Auth Server Library
//!
//! bcrypt-backed registration and login, HS256 bearer tokens, and a
//! middleware that gates routes on a verified token.
//! Exposes the router so binaries and integration tests share one wiring.

pub mod app;
pub mod auth;
pub mod config;
pub mod middleware;

pub use app::{auth_state_from_config, build_router};
pub use config::Config;
