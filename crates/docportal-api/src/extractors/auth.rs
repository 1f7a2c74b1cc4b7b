//! `AuthUser` extractor: pulls the session token from the Authorization
//! header or the session cookie, validates it, and injects context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum_extra::extract::CookieJar;

use docportal_core::error::AppError;
use docportal_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.config.auth.session_cookie)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        let claims = state.jwt_decoder.decode(&token)?;
        let meta = RequestMeta::from_headers(&parts.headers);

        let ctx = RequestContext::new(
            claims.sub.clone(),
            claims.display_name().to_string(),
            meta.ip_address,
            meta.user_agent,
        );

        Ok(AuthUser(ctx))
    }
}

/// Bearer token, or the session cookie when no Authorization header is sent.
fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Caller address and agent, for unauthenticated routes that still log them.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// First hop of `X-Forwarded-For`, or `unknown`.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl RequestMeta {
    /// Reads the metadata from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip_address = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Self {
            ip_address,
            user_agent,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
