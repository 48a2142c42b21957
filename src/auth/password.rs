//! Password Hasher
//! Mission: Salted one-way password hashing that never stalls the executor

use tracing::debug;

/// Cost factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Hashing errors
#[derive(Debug)]
pub enum HashError {
    Bcrypt(bcrypt::BcryptError),
    Task(tokio::task::JoinError),
}

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::Bcrypt(e) => write!(f, "bcrypt failure: {}", e),
            HashError::Task(e) => write!(f, "hashing task failed: {}", e),
        }
    }
}

impl std::error::Error for HashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HashError::Bcrypt(e) => Some(e),
            HashError::Task(e) => Some(e),
        }
    }
}

impl From<bcrypt::BcryptError> for HashError {
    fn from(e: bcrypt::BcryptError) -> Self {
        HashError::Bcrypt(e)
    }
}

impl From<tokio::task::JoinError> for HashError {
    fn from(e: tokio::task::JoinError) -> Self {
        HashError::Task(e)
    }
}

/// bcrypt hasher with a fixed cost factor.
///
/// Both operations run on the blocking pool; the calling task only
/// suspends while the digest is computed.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt.
    pub async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;

        debug!("Hashed password with cost {}", cost);
        Ok(hashed)
    }

    /// Compare a plaintext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a malformed hash or a failed task
    /// is an error.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await??;
        Ok(valid)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}
