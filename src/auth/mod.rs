//! Authentication Module
//! Mission: Gate API access behind bcrypt credentials and JWT bearer tokens

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use api::AuthState;
pub use jwt::{JwtHandler, VerificationError};
pub use middleware::{auth_middleware, AuthUser};
pub use password::PasswordHasher;
pub use user_store::{DuplicatePolicy, InMemoryUserStore, UserStore};
