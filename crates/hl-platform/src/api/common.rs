//! Common API types and utilities

use axum::extract::multipart::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{PortalError, Result};

/// The response envelope every endpoint returns:
/// `{success, message, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }

    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

pub type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, PortalError>;

/// A file part pulled from a multipart request, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Drain a multipart body into text fields and file parts, keyed by field
/// name. Parts carrying a filename are treated as files.
pub async fn collect_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, HashMap<String, UploadedFile>)> {
    let mut fields = HashMap::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PortalError::validation(format!("malformed multipart body: {}", e)))?
    {
        let name = match field.name() {
            Some(n) => n.to_string(),
            None => continue,
        };

        if let Some(filename) = field.file_name().map(String::from) {
            let content_type = field.content_type().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| PortalError::validation(format!("unreadable upload: {}", e)))?;
            files.insert(
                name,
                UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| PortalError::validation(format!("unreadable field: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, files))
}

/// Required-field accessor for multipart forms.
pub fn required_field<'a>(fields: &'a HashMap<String, String>, name: &str) -> Result<&'a str> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| PortalError::validation(format!("{} is required", name)))
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PortalError::Validation { .. } | PortalError::Ingest { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            PortalError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password".to_string(),
            ),
            PortalError::Unauthorized { .. }
            | PortalError::TokenExpired
            | PortalError::InvalidToken { .. } => (StatusCode::UNAUTHORIZED, self.to_string()),
            PortalError::Forbidden { .. } => (StatusCode::FORBIDDEN, self.to_string()),
            PortalError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            PortalError::Duplicate { .. } | PortalError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, self.to_string())
            }
            // Store and serialization failures never leak outward.
            PortalError::Database(_)
            | PortalError::Serialization(_)
            | PortalError::Deserialization(_)
            | PortalError::Json(_)
            | PortalError::Configuration { .. }
            | PortalError::Internal { .. } => {
                tracing::error!(error = %self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, try again later".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            success: false,
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}
