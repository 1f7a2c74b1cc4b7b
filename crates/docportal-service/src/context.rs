//! Request context carrying the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current authenticated request.
///
/// Extracted by the API layer and passed into service methods so that
/// every mutating operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Subject of the session token.
    pub subject: String,
    /// Human-readable label for logs.
    pub display_name: String,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        subject: String,
        display_name: String,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            subject,
            display_name,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Context for operations started by the process itself (CLI, sweeper).
    pub fn system() -> Self {
        Self::new("system".into(), "system".into(), "127.0.0.1".into(), None)
    }
}
