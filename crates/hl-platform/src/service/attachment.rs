//! Attachment Ingestion Pipeline
//!
//! Converts an uploaded binary plus its declared filename/mimetype into a
//! durable, dereferenceable reference. The realization here is a base64
//! `data:` URI, which keeps the bytes recoverable without an external
//! object store. Content validation is caller policy ([`AttachmentKind`]),
//! not part of `ingest` itself.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::domain::StoredAsset;
use crate::error::{PortalError, Result};

/// Where an upload is headed, with the extension allow-list the api layer
/// enforces before ingesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Photo,
    Resume,
    Logo,
}

impl AttachmentKind {
    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            AttachmentKind::Photo | AttachmentKind::Logo => &["png", "jpg", "jpeg", "webp"],
            AttachmentKind::Resume => &["pdf", "doc", "docx"],
        }
    }

    pub fn allows(&self, filename: &str) -> bool {
        match extension_of(filename) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.allowed_extensions().iter().any(|a| *a == ext)
            }
            None => false,
        }
    }

    /// Validation error naming the accepted extensions.
    pub fn check(&self, filename: &str) -> Result<()> {
        if self.allows(filename) {
            Ok(())
        } else {
            Err(PortalError::validation(format!(
                "unsupported file type for {:?} upload, accepted: {}",
                self,
                self.allowed_extensions().join(", ")
            )))
        }
    }
}

/// Derive the extension from the original filename.
fn extension_of(filename: &str) -> Option<&str> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => None,
    }
}

#[derive(Default)]
pub struct AttachmentService;

impl AttachmentService {
    /// Ingest uploaded bytes into a stored asset.
    ///
    /// Rejects an empty buffer or a blank filename; otherwise the result's
    /// URI recovers the input byte-for-byte through [`Self::decode_data_uri`]
    /// and the original filename is preserved verbatim.
    pub fn ingest(
        &self,
        bytes: &[u8],
        original_filename: &str,
        declared_mime: &str,
    ) -> Result<StoredAsset> {
        if bytes.is_empty() {
            return Err(PortalError::ingest("empty upload"));
        }
        if original_filename.trim().is_empty() {
            return Err(PortalError::ingest("missing filename"));
        }

        let mime = match extension_of(original_filename).and_then(mime_for_extension) {
            Some(m) => m,
            None if !declared_mime.is_empty() => declared_mime,
            None => "application/octet-stream",
        };

        let uri = format!("data:{};base64,{}", mime, BASE64.encode(bytes));
        Ok(StoredAsset::new(uri, original_filename))
    }

    /// Recover the original bytes from an asset URI produced by `ingest`.
    pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
        let payload = uri
            .split_once(";base64,")
            .map(|(_, p)| p)
            .ok_or_else(|| PortalError::ingest("not a base64 data URI"))?;
        BASE64
            .decode(payload)
            .map_err(|e| PortalError::ingest(format!("undecodable asset payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_bytes_and_filename() {
        let service = AttachmentService;
        let bytes = b"%PDF-1.7 fake resume contents";
        let asset = service
            .ingest(bytes, "Ada Lovelace CV.pdf", "application/pdf")
            .unwrap();

        assert_eq!(asset.original_filename, "Ada Lovelace CV.pdf");
        assert!(asset.uri.starts_with("data:application/pdf;base64,"));
        assert_eq!(AttachmentService::decode_data_uri(&asset.uri).unwrap(), bytes);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let err = AttachmentService.ingest(b"", "x.png", "image/png").unwrap_err();
        assert!(matches!(err, PortalError::Ingest { .. }));
    }

    #[test]
    fn test_blank_filename_rejected() {
        let err = AttachmentService.ingest(b"data", "  ", "image/png").unwrap_err();
        assert!(matches!(err, PortalError::Ingest { .. }));
    }

    #[test]
    fn test_mime_derived_from_extension_over_declared() {
        let asset = AttachmentService
            .ingest(b"png bytes", "avatar.PNG", "application/octet-stream")
            .unwrap();
        assert!(asset.uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_declared_mime_used_for_unknown_extension() {
        let asset = AttachmentService
            .ingest(b"bytes", "notes.xyz", "text/plain")
            .unwrap();
        assert!(asset.uri.starts_with("data:text/plain;base64,"));
    }

    #[test]
    fn test_kind_allow_lists() {
        assert!(AttachmentKind::Photo.allows("me.jpeg"));
        assert!(AttachmentKind::Logo.allows("logo.webp"));
        assert!(AttachmentKind::Resume.allows("cv.pdf"));
        assert!(!AttachmentKind::Resume.allows("cv.exe"));
        assert!(!AttachmentKind::Photo.allows("no-extension"));
        assert!(AttachmentKind::Resume.check("cv.sh").is_err());
    }
}
