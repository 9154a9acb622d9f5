//! MIME type detection for file attachments

use crate::types::FileAttachment;

/// Guess MIME by inspecting bytes (magic numbers)
fn guess_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file name (extension-based)
fn guess_from_name(name: &str) -> Option<String> {
    mime_guess::from_path(name).first_raw().map(|s| s.to_string())
}

/// Resolve the MIME type of an attachment: prefer byte sniffing, then the
/// caller-declared type, then the file extension, otherwise octet-stream.
pub fn attachment_mime(file: &FileAttachment) -> String {
    if let Some(m) = guess_from_bytes(&file.bytes) {
        return m;
    }
    if let Some(m) = &file.mime {
        return m.clone();
    }
    if let Some(m) = guess_from_name(&file.name) {
        return m;
    }
    "application/octet-stream".to_string()
}
