//! Authentication Models
//! Mission: Define user records, token claims and request/response bodies

use serde::{Deserialize, Serialize};

/// Registered user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// JWT Claims payload
///
/// Carries only the identity needed by protected handlers. `exp` is written
/// only when a token lifetime is configured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub username: String,
    pub iat: usize, // issued-at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>, // expiration timestamp
}

/// Register / login request body
///
/// Fields are optional so that missing values reach the handler's own
/// validation instead of a framework rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Returns `(username, password)` when both are present and non-empty.
    pub fn validated(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.trim().is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new("alice", "$2b$10$somehash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("somehash"));
    }

    #[test]
    fn test_login_response_uses_camel_case() {
        let response = LoginResponse {
            access_token: "abc".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"accessToken":"abc"}"#);
    }

    #[test]
    fn test_claims_without_expiry_omit_exp() {
        let claims = Claims {
            username: "alice".to_string(),
            iat: 1_700_000_000,
            exp: None,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("exp"));

        let parsed: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, claims);
    }

    #[test]
    fn test_credentials_validation() {
        let full: CredentialsRequest =
            serde_json::from_str(r#"{"username":"alice","password":"p@ss"}"#).unwrap();
        assert_eq!(full.validated(), Some(("alice", "p@ss")));

        let missing: CredentialsRequest = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(missing.validated(), None);

        let blank: CredentialsRequest =
            serde_json::from_str(r#"{"username":"   ","password":"x"}"#).unwrap();
        assert_eq!(blank.validated(), None);

        let empty: CredentialsRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.validated(), None);
    }
}
