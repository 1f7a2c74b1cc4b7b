//! Grouping of a flat listing into documents with ordered version chains.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use docportal_core::traits::storage::StorageObjectMeta;

use super::model::{DocumentGroup, DocumentVersion};
use super::naming::{ORIGINAL_VERSION, parse};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Render a byte count with base-1024 units and at most one decimal.
///
/// `0` is `"0 Bytes"`; a trailing `.0` is dropped (`1024` is `"1 KB"`).
/// Sizes beyond the GB range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.1}");
    let trimmed = rounded.strip_suffix(".0").unwrap_or(&rounded);
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

fn to_version(entry: &StorageObjectMeta, fallback_time: DateTime<Utc>) -> DocumentVersion {
    let parsed = parse(&entry.name);
    DocumentVersion {
        version_id: parsed
            .version_id
            .clone()
            .unwrap_or_else(|| ORIGINAL_VERSION.to_string()),
        file_name: entry.name.clone(),
        original_name: parsed.original_name(),
        uploaded_at: entry.last_modified.unwrap_or(fallback_time),
        size: format_bytes(entry.size_bytes),
        size_bytes: entry.size_bytes,
        version_number: 0,
    }
}

/// Sort newest first and number the chain densely: newest is N, oldest is 1.
///
/// The sort is stable, so versions with equal timestamps keep listing order.
fn number_versions(versions: &mut [DocumentVersion]) {
    versions.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    let total = versions.len();
    for (index, version) in versions.iter_mut().enumerate() {
        version.version_number = (total - index) as u32;
    }
}

/// Partition blobs by base name into documents, ordered by base name.
///
/// Blobs without a modification time are treated as uploaded at `fallback_time`.
pub fn group(entries: &[StorageObjectMeta], fallback_time: DateTime<Utc>) -> Vec<DocumentGroup> {
    let mut by_base: BTreeMap<String, Vec<DocumentVersion>> = BTreeMap::new();
    for entry in entries {
        let base_name = parse(&entry.name).base_name;
        by_base
            .entry(base_name)
            .or_default()
            .push(to_version(entry, fallback_time));
    }

    by_base
        .into_iter()
        .map(|(document_id, mut versions)| {
            number_versions(&mut versions);
            let original_name = versions[0].original_name.clone();
            DocumentGroup {
                document_id,
                original_name,
                versions,
            }
        })
        .collect()
}

/// Version chain of one document, newest first. Empty when nothing matches.
pub fn versions_of(
    entries: &[StorageObjectMeta],
    base_name: &str,
    fallback_time: DateTime<Utc>,
) -> Vec<DocumentVersion> {
    let mut versions: Vec<DocumentVersion> = entries
        .iter()
        .filter(|entry| parse(&entry.name).base_name == base_name)
        .map(|entry| to_version(entry, fallback_time))
        .collect();
    number_versions(&mut versions);
    versions
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn entry(name: &str, minutes_ago: i64, size: u64, now: DateTime<Utc>) -> StorageObjectMeta {
        StorageObjectMeta {
            name: name.to_string(),
            size_bytes: size,
            content_type: None,
            last_modified: Some(now - Duration::minutes(minutes_ago)),
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1), "1 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 / 2), "1.5 GB");
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_group_numbers_versions_densely() {
        let now = Utc::now();
        let entries = vec![
            entry("report.pdf", 30, 10, now),
            entry("report_v_b.pdf", 10, 20, now),
            entry("report_v_a.pdf", 20, 30, now),
            entry("summary.docx", 5, 2048, now),
        ];

        let groups = group(&entries, now);
        assert_eq!(groups.len(), 2);

        let report = &groups[0];
        assert_eq!(report.document_id, "report");
        assert_eq!(report.original_name, "report.pdf");
        let order: Vec<_> = report
            .versions
            .iter()
            .map(|v| (v.file_name.as_str(), v.version_number))
            .collect();
        assert_eq!(
            order,
            vec![
                ("report_v_b.pdf", 3),
                ("report_v_a.pdf", 2),
                ("report.pdf", 1)
            ]
        );
        assert_eq!(report.latest_version().unwrap().version_id, "b");
        assert_eq!(report.versions[2].version_id, ORIGINAL_VERSION);

        let summary = &groups[1];
        assert_eq!(summary.versions.len(), 1);
        assert_eq!(summary.versions[0].version_number, 1);
        assert_eq!(summary.versions[0].size, "2 KB");
    }

    #[test]
    fn test_numbers_are_a_permutation() {
        let now = Utc::now();
        let entries: Vec<_> = (0..6)
            .map(|i| entry(&format!("plan_v_{i}.txt"), (i * 7) % 5, 1, now))
            .collect();

        let groups = group(&entries, now);
        let mut numbers: Vec<u32> = groups[0].versions.iter().map(|v| v.version_number).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);

        let times: Vec<_> = groups[0].versions.iter().map(|v| v.uploaded_at).collect();
        assert!(times.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_ties_keep_listing_order() {
        let now = Utc::now();
        let entries = vec![entry("a_v_1.txt", 0, 1, now), entry("a_v_2.txt", 0, 1, now)];

        let versions = versions_of(&entries, "a", now);
        assert_eq!(versions[0].file_name, "a_v_1.txt");
        assert_eq!(versions[0].version_number, 2);
        assert_eq!(versions[1].version_number, 1);
    }

    #[test]
    fn test_original_name_follows_latest_extension() {
        let now = Utc::now();
        let entries = vec![
            entry("deck.ppt", 60, 1, now),
            entry("deck_v_2024.pptx", 1, 1, now),
        ];
        let groups = group(&entries, now);
        assert_eq!(groups[0].original_name, "deck.pptx");
    }

    #[test]
    fn test_versions_of_unknown_document_is_empty() {
        let now = Utc::now();
        let entries = vec![entry("a.txt", 0, 1, now)];
        assert!(versions_of(&entries, "b", now).is_empty());
    }

    #[test]
    fn test_missing_timestamp_uses_fallback() {
        let now = Utc::now();
        let entries = vec![StorageObjectMeta {
            name: "x.txt".into(),
            size_bytes: 0,
            content_type: None,
            last_modified: None,
        }];
        let versions = versions_of(&entries, "x", now);
        assert_eq!(versions[0].uploaded_at, now);
        assert_eq!(versions[0].size, "0 Bytes");
    }
}
