//! Server configuration
//!
//! Every setting is a CLI flag with an environment fallback. `.env` files are
//! loaded before parsing, so either source works.

use crate::auth::{password::DEFAULT_BCRYPT_COST, DuplicatePolicy};
use anyhow::{bail, Result};
use clap::{builder::BoolishValueParser, Parser};
use std::path::Path;
use std::time::Duration;

/// Signing secret used when none is configured. Development only.
pub const DEV_TOKEN_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Parser, Debug, Clone)]
#[command(name = "jwt-auth-server")]
#[command(about = "JWT authentication server - register, login and token-gated routes")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// HMAC secret for signing and verifying access tokens
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub access_token_secret: Option<String>,

    /// Access token lifetime in seconds (tokens never expire when unset)
    #[arg(long, env = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: Option<u64>,

    /// bcrypt cost factor
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    pub bcrypt_cost: u32,

    /// Accept registrations that reuse an existing username
    /// (env accepts true/false, 1/0, yes/no, on/off)
    #[arg(long, env = "ALLOW_DUPLICATE_USERNAMES", value_parser = BoolishValueParser::new())]
    pub allow_duplicate_usernames: bool,
}

impl Config {
    /// Check values clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            bail!("HOST must not be empty");
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            bail!(
                "BCRYPT_COST must be between {} and {}, got {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST,
                self.bcrypt_cost
            );
        }

        if matches!(self.access_token_secret.as_deref(), Some(s) if s.is_empty()) {
            bail!("ACCESS_TOKEN_SECRET must not be empty");
        }

        if self.token_ttl_secs == Some(0) {
            bail!("TOKEN_TTL_SECS must be positive");
        }

        Ok(())
    }

    /// Host/port pair for `TcpListener::bind`; hostnames resolve at bind time
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// Configured secret, or the development fallback
    pub fn token_secret(&self) -> &str {
        self.access_token_secret
            .as_deref()
            .unwrap_or(DEV_TOKEN_SECRET)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.access_token_secret.is_none()
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_secs.map(Duration::from_secs)
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.allow_duplicate_usernames {
            DuplicatePolicy::Allow
        } else {
            DuplicatePolicy::Reject
        }
    }
}

/// Load `.env` from the working directory (and parents), then next to the manifest
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

/// Serializes tests that parse `Config`, since some of them set env vars.
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());
