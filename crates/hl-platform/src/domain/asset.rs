//! Stored Asset Reference
//!
//! The result of running uploaded bytes through the attachment ingestion
//! pipeline: a dereferenceable URI plus the original display name.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An ingested binary attachment.
///
/// The URI is opaque to callers; the bytes behind it are recoverable
/// byte-for-byte through the attachment service. The original filename is
/// carried alongside so the display name survives encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    pub uri: String,
    pub original_filename: String,
}

impl StoredAsset {
    pub fn new(uri: impl Into<String>, original_filename: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            original_filename: original_filename.into(),
        }
    }
}
