//! Session token verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for validating session tokens minted by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC-SHA256 secret the identity provider signs tokens with.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim. Empty disables the check.
    #[serde(default)]
    pub issuer: String,
    /// Expected `aud` claim. Empty disables the check.
    #[serde(default)]
    pub audience: String,
    /// Cookie consulted when no `Authorization` header is present.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of development tokens minted by `docportal token`.
    #[serde(default = "default_dev_token_ttl")]
    pub dev_token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: String::new(),
            audience: String::new(),
            session_cookie: default_session_cookie(),
            leeway_seconds: default_leeway(),
            dev_token_ttl_minutes: default_dev_token_ttl(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_session_cookie() -> String {
    "docportal_session".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_dev_token_ttl() -> u64 {
    60
}
