//! Session token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use docportal_core::config::AuthConfig;
use docportal_core::error::AppError;

use super::claims::Claims;

/// Validates session tokens against the shared secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        // A configured issuer or audience must also be present in the token.
        if !config.issuer.is_empty() {
            validation.set_issuer(&[config.issuer.as_str()]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        if config.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[config.audience.as_str()]);
            validation.required_spec_claims.insert("aud".to_string());
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a session token.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Rejected session token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Session has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                        AppError::unauthorized("Invalid token issuer")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        AppError::unauthorized("Invalid token audience")
                    }
                    jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
                        AppError::unauthorized(format!("Token is missing the '{claim}' claim"))
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::unauthorized("Token has no subject"));
        }

        Ok(token_data.claims)
    }
}
