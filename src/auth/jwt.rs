//! JWT Token Handler
//! Mission: Issue and verify HS256 bearer tokens with an injected secret

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::time::Duration;
use tracing::debug;

/// Why a presented token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    Malformed,
    SignatureInvalid,
    Expired,
}

impl std::fmt::Display for VerificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationError::Malformed => write!(f, "Malformed token"),
            VerificationError::SignatureInvalid => write!(f, "Invalid token signature"),
            VerificationError::Expired => write!(f, "Token expired"),
        }
    }
}

impl std::error::Error for VerificationError {}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                VerificationError::SignatureInvalid
            }
            _ => VerificationError::Malformed,
        }
    }
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl JwtHandler {
    /// Create a handler that signs with `secret`.
    ///
    /// With `ttl` unset, issued tokens carry no `exp` and never expire.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is optional; it is still enforced whenever a token carries one.
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Issue a token for `username`
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let iat = usize::try_from(now).context("Invalid timestamp")?;

        let exp = match self.ttl {
            Some(ttl) => Some(
                usize::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| iat.checked_add(secs))
                    .context("Token expiry overflows timestamp")?,
            ),
            None => None,
        };

        let claims = Claims {
            username: username.to_string(),
            iat,
            exp,
        };

        debug!(
            "Generating JWT for user {}, expires: {:?}",
            claims.username, claims.exp
        );

        self.sign(&claims)
    }

    /// Sign an arbitrary claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .context("Failed to generate JWT")
    }

    /// Validate a JWT token and extract claims
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        debug!("Validated JWT for user {}", decoded.claims.username);

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-12345";

    fn now() -> usize {
        Utc::now().timestamp() as usize
    }

    #[test]
    fn test_issue_and_verify() {
        let handler = JwtHandler::new(SECRET, None);

        let token = handler.issue("alice").unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert!(claims.iat <= now());
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_ttl_sets_expiry() {
        let handler = JwtHandler::new(SECRET, Some(Duration::from_secs(3600)));

        let token = handler.issue("alice").unwrap();
        let claims = handler.verify(&token).unwrap();

        assert_eq!(claims.exp, Some(claims.iat + 3600));
        assert!(claims.exp.unwrap() > now());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let handler = JwtHandler::new(SECRET, None);

        assert_eq!(
            handler.verify("invalid.token.here"),
            Err(VerificationError::Malformed)
        );
        assert_eq!(handler.verify("garbled"), Err(VerificationError::Malformed));
        assert_eq!(handler.verify(""), Err(VerificationError::Malformed));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1", None);
        let handler2 = JwtHandler::new("secret2", None);

        let token = handler1.issue("alice").unwrap();

        assert_eq!(
            handler2.verify(&token),
            Err(VerificationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let handler = JwtHandler::new(SECRET, None);
        let token = handler.issue("alice").unwrap();
        let other = handler.issue("mallory").unwrap();

        // Splice mallory's payload under alice's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(
            handler.verify(&forged),
            Err(VerificationError::SignatureInvalid)
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = JwtHandler::new(SECRET, None);
        let claims = Claims {
            username: "alice".to_string(),
            iat: now() - 7200,
            exp: Some(now() - 3600),
        };
        let token = handler.sign(&claims).unwrap();

        assert_eq!(handler.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let handler = JwtHandler::new(SECRET, None);
        let claims = Claims {
            username: "alice".to_string(),
            iat: now(),
            exp: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            handler.verify(&token),
            Err(VerificationError::SignatureInvalid)
        );
    }
}
