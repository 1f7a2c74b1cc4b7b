//! Upload limits and name-collision policy.

use serde::{Deserialize, Serialize};

/// What to do when an uploaded file name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Store the upload as a new version (`<base>_v_<token><ext>`).
    Version,
    /// Store the upload under `<stem>_<unix-millis><ext>`, a separate document.
    Timestamp,
}

impl std::fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Version => write!(f, "version"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum upload size in bytes (default 50 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Name collision handling.
    #[serde(default = "default_collision_mode")]
    pub collision_mode: CollisionMode,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
            collision_mode: default_collision_mode(),
        }
    }
}

fn default_max_upload() -> u64 {
    52_428_800 // 50 MB
}

fn default_collision_mode() -> CollisionMode {
    CollisionMode::Version
}
