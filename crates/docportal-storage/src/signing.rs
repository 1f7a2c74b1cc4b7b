//! Signed read links for providers that cannot presign natively.
//!
//! A link carries an HS256 token binding the container, the blob key and a
//! validity window. The API serves such links at `/blobs/{container}/{key}`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use docportal_core::error::{AppError, ErrorKind};
use docportal_core::result::AppResult;
use docportal_core::traits::storage::SignedUrlOptions;

/// Path prefix under which signed links are served.
pub const BLOB_ROUTE_PREFIX: &str = "/blobs";

/// Query parameter holding the link token.
pub const TOKEN_PARAM: &str = "token";

/// Characters left unescaped by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URL component (path segment or query value).
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Claims embedded in a link token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkClaims {
    /// Container the link grants access to.
    pub ctr: String,
    /// Blob key.
    pub key: String,
    /// Not-before (seconds since epoch).
    pub nbf: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
    /// Content disposition to answer with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disp: Option<String>,
}

/// Issues and verifies link tokens.
#[derive(Clone)]
pub struct LinkSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    base_url: String,
}

impl std::fmt::Debug for LinkSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSigner")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LinkSigner {
    /// Creates a signer for links rooted at `base_url` (scheme and host).
    pub fn new(secret: &str, base_url: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds a complete signed link for `key` in `container`.
    pub fn sign(
        &self,
        container: &str,
        key: &str,
        options: &SignedUrlOptions,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        if options.expires_in <= chrono::Duration::zero() {
            return Err(AppError::validation("Link lifetime must be positive"));
        }

        let claims = LinkClaims {
            ctr: container.to_string(),
            key: key.to_string(),
            nbf: options.starts_at.unwrap_or(now).timestamp(),
            exp: (now + options.expires_in).timestamp(),
            disp: options.content_disposition.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to sign blob link", e)
            })?;

        Ok(format!(
            "{}{}/{}/{}?{}={}",
            self.base_url,
            BLOB_ROUTE_PREFIX,
            encode_component(container),
            encode_component(key),
            TOKEN_PARAM,
            token
        ))
    }

    /// Verifies a link token against the container and key it was presented for.
    pub fn verify(&self, container: &str, key: &str, token: &str) -> AppResult<LinkClaims> {
        let data = decode::<LinkClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Link has expired")
                }
                jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                    AppError::unauthorized("Link is not valid yet")
                }
                _ => AppError::unauthorized("Invalid link token"),
            },
        )?;

        if data.claims.ctr != container || data.claims.key != key {
            return Err(AppError::unauthorized("Link does not match the requested blob"));
        }

        Ok(data.claims)
    }

    /// Whether `url` has the shape of a link this signer issues for `container`.
    pub fn recognizes(&self, container: &str, url: &str) -> bool {
        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };

        if let Ok(base) = url::Url::parse(&self.base_url)
            && base.host_str() != parsed.host_str()
        {
            return false;
        }

        let prefix = format!("{}/{}/", BLOB_ROUTE_PREFIX, encode_component(container));
        parsed.path().starts_with(&prefix)
            && parsed.query_pairs().any(|(k, _)| k == TOKEN_PARAM)
    }
}
