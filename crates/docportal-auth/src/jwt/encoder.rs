//! Session token minting for development setups and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use docportal_core::config::AuthConfig;
use docportal_core::error::AppError;

use super::claims::Claims;

/// Creates signed session tokens shaped like the identity provider's.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    issuer: Option<String>,
    audience: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: Some(config.issuer.clone()).filter(|s| !s.is_empty()),
            audience: Some(config.audience.clone()).filter(|s| !s.is_empty()),
        }
    }

    /// Mints a token for `subject` valid for `ttl`.
    pub fn issue(&self, subject: &str, name: Option<&str>, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            name: name.map(str::to_string),
            email: None,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))
    }
}
