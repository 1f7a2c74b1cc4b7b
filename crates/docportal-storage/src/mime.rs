//! Content-type detection from blob names.

/// Fallback content type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type of a blob, derived from the text after its last `.`.
///
/// Only the document and image formats the portal deals with are mapped;
/// everything else is `application/octet-stream`.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => OCTET_STREAM,
    }
}

/// Whether the blob name denotes a PDF.
pub fn is_pdf(name: &str) -> bool {
    content_type_for(name) == "application/pdf"
}
