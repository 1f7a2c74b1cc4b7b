//! Stored short-URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One short code and the URL it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlRecord {
    /// The code, also used as the blob key.
    pub short_code: String,
    /// Target URL.
    pub original_url: String,
    /// After this instant the code no longer resolves.
    pub expires_at: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl ShortUrlRecord {
    /// Whether the record is past its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
