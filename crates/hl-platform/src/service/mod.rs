//! Service Layer
//!
//! Business logic services: credential hashing, token issue/validation,
//! role-scoped authorization, and attachment ingestion.

pub mod attachment;
pub mod auth;
pub mod authorization;
pub mod password;

pub use attachment::{AttachmentKind, AttachmentService};
pub use auth::{extract_bearer_token, AccessTokenClaims, AuthConfig, AuthService, SESSION_COOKIE};
pub use authorization::{checks, AuthContext, AuthorizationService};
pub use password::PasswordService;
