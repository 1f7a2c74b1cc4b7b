//! Version tags encoded in blob names.
//!
//! A versioned blob is named `<base>_v_<token><ext>`; a blob without the
//! marker is the original upload of its document. The encoding is shared
//! with containers written by earlier deployments, so it is kept as is even
//! though a base name containing `_v_` is parsed ambiguously.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use docportal_core::error::AppError;

/// Separator between the base name and the version token.
pub const VERSION_MARKER: &str = "_v_";

/// Version id reported for blobs that carry no token.
pub const ORIGINAL_VERSION: &str = "original";

/// Components of a blob name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Name with the extension and version tag removed.
    pub base_name: String,
    /// Version token, when the name carries one.
    pub version_id: Option<String>,
    /// Extension including the leading `.`, or empty.
    pub extension: String,
}

impl ParsedName {
    /// Name of the logical document: base name plus extension.
    pub fn original_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension)
    }
}

/// Split a blob name into base name, version token and extension.
///
/// The extension starts at the last `.` unless that dot is the first
/// character. When the stem contains `_v_` several times, the split happens
/// at the last occurrence that still leaves a non-empty token.
pub fn parse(file_name: &str) -> ParsedName {
    let (stem, extension) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    };

    let marker = VERSION_MARKER.as_bytes();
    let split = (1..stem.len())
        .rev()
        .filter(|&idx| idx + marker.len() < stem.len())
        .find(|&idx| stem.as_bytes()[idx..].starts_with(marker));

    match split {
        Some(idx) => ParsedName {
            base_name: stem[..idx].to_string(),
            version_id: Some(stem[idx + VERSION_MARKER.len()..].to_string()),
            extension: extension.to_string(),
        },
        None => ParsedName {
            base_name: stem.to_string(),
            version_id: None,
            extension: extension.to_string(),
        },
    }
}

/// A validated version token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Validate a token: non-empty, without `.` or `/`.
    pub fn new(token: impl Into<String>) -> Result<Self, AppError> {
        let token = token.into();
        if token.is_empty() {
            return Err(AppError::validation("Version id must not be empty"));
        }
        if token.contains(['.', '/']) {
            return Err(AppError::validation(format!(
                "Version id '{token}' must not contain '.' or '/'"
            )));
        }
        Ok(Self(token))
    }

    /// Token derived from an upload time, e.g. `2024-03-05T10-20-30-123Z`.
    pub fn from_time(at: DateTime<Utc>) -> Self {
        let iso = at.to_rfc3339_opts(SecondsFormat::Millis, true);
        Self(iso.replace([':', '.'], "-"))
    }

    /// Same token with a numeric suffix, for uploads within one millisecond.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Version token for an upload happening at `now`.
pub fn generate_version_id(now: DateTime<Utc>) -> VersionId {
    VersionId::from_time(now)
}

/// Name under which a new version of `original_name` is stored.
pub fn make_versioned(original_name: &str, version_id: &VersionId) -> String {
    let parsed = parse(original_name);
    format!(
        "{}{}{}{}",
        parsed.base_name, VERSION_MARKER, version_id, parsed.extension
    )
}

/// Whether two blob names belong to the same logical document.
pub fn are_related(a: &str, b: &str) -> bool {
    parse(a).base_name == parse(b).base_name
}
