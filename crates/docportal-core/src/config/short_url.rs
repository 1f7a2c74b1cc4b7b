//! URL shortener configuration.

use serde::{Deserialize, Serialize};

/// Short-link generation and expiry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrlConfig {
    /// Number of characters in a generated code.
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    /// Lifetime applied when a request does not specify one.
    #[serde(default = "default_expiration_days")]
    pub default_expiration_days: u32,
    /// How many codes to try before giving up on a collision.
    #[serde(default = "default_max_attempts")]
    pub max_generation_attempts: u32,
    /// Period of the background sweep of expired records, in seconds.
    /// `0` leaves expiry purely lazy (records are removed when read).
    #[serde(default)]
    pub sweep_interval_seconds: u64,
}

impl Default for ShortUrlConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            default_expiration_days: default_expiration_days(),
            max_generation_attempts: default_max_attempts(),
            sweep_interval_seconds: 0,
        }
    }
}

fn default_code_length() -> usize {
    7
}

fn default_expiration_days() -> u32 {
    7
}

fn default_max_attempts() -> u32 {
    5
}
