//! Auth API Endpoints
//!
//! - POST /register - Create a student or recruiter account
//! - POST /login - Password-based login, sets the session cookie
//! - POST /logout - Clears the session cookie
//! - GET /me - Get current user info

use axum::{
    extract::{multipart::Multipart, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::api::common::{collect_multipart, required_field, ApiResponse, ApiResult};
use crate::api::middleware::Authenticated;
use crate::domain::{Identity, Profile, Role};
use crate::error::PortalError;
use crate::repository::IdentityRepository;
use crate::service::{
    AttachmentKind, AttachmentService, AuthService, PasswordService, SESSION_COOKIE,
};

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sanitized identity, safe to return to clients. The credential hash
/// never leaves the domain entity.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: String,
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub profile: Profile,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Identity> for IdentityResponse {
    fn from(i: Identity) -> Self {
        Self {
            id: i.id,
            fullname: i.fullname,
            email: i.email,
            phone_number: i.phone_number,
            role: i.role,
            profile: i.profile,
            created_at: i.created_at.to_rfc3339(),
            updated_at: i.updated_at.to_rfc3339(),
        }
    }
}

/// Login response data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Access token, also set as an HttpOnly session cookie.
    pub token: String,
    pub user: IdentityResponse,
}

/// Auth service state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub password_service: Arc<PasswordService>,
    pub attachment_service: Arc<AttachmentService>,
    pub identity_repo: Arc<IdentityRepository>,
}

/// Register a new account
///
/// Multipart form: fullname, email, phoneNumber, password, role
/// (student|recruiter), optional profilePhoto file.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    responses(
        (status = 200, description = "Account created"),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    multipart: Multipart,
) -> ApiResult<IdentityResponse> {
    let (fields, files) = collect_multipart(multipart).await?;

    let fullname = required_field(&fields, "fullname")?;
    let email = required_field(&fields, "email")?;
    let phone_number = required_field(&fields, "phoneNumber")?;
    let password = required_field(&fields, "password")?;
    let role = Role::parse(required_field(&fields, "role")?)
        .ok_or_else(|| PortalError::validation("role must be student or recruiter"))?;

    state.password_service.validate_strength(password)?;

    // Friendly pre-check; the unique index still guards the race.
    if state.identity_repo.exists_by_email(email).await? {
        return Err(PortalError::duplicate(
            "Identity",
            "email",
            Identity::normalize_email(email),
        ));
    }

    // Ingest before the identity write so a pipeline failure aborts the
    // whole registration.
    let photo = files
        .get("profilePhoto")
        .map(|f| {
            AttachmentKind::Photo.check(&f.filename)?;
            state
                .attachment_service
                .ingest(&f.bytes, &f.filename, &f.content_type)
        })
        .transpose()?;

    let password_hash = state.password_service.hash_password(password)?;
    let mut identity = Identity::new(fullname, email, phone_number, password_hash, role);
    if let Some(photo) = photo {
        identity.profile.profile_photo = Some(photo.uri);
    }

    state.identity_repo.insert(&identity).await?;
    info!(identity_id = %identity.id, role = %identity.role, "account registered");

    Ok(ApiResponse::ok("Account created successfully", identity.into()))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginData),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginData>>), PortalError> {
    let identity = state
        .identity_repo
        .find_by_email(&req.email)
        .await?
        .ok_or(PortalError::InvalidCredentials)?;

    if !state
        .password_service
        .verify_password(&req.password, &identity.password_hash)?
    {
        return Err(PortalError::InvalidCredentials);
    }

    let token = state.auth_service.generate_access_token(&identity)?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    let jar = jar.add(cookie);

    info!(identity_id = %identity.id, "login");
    let message = format!("Welcome back {}", identity.fullname);
    Ok((
        jar,
        ApiResponse::ok(
            message,
            LoginData {
                token,
                user: identity.into(),
            },
        ),
    ))
}

/// Logout / clear the session cookie
///
/// The access token is a stateless JWT, so there is nothing to revoke
/// server-side; logout clears the client's cookie.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout(
    auth: Authenticated,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);

    info!(identity_id = %auth.0.identity_id, "logout");
    (jar, ApiResponse::message("Logged out successfully"))
}

/// Get current user info
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = IdentityResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthState>,
    Authenticated(ctx): Authenticated,
) -> ApiResult<IdentityResponse> {
    let identity = state
        .identity_repo
        .find_by_id(&ctx.identity_id)
        .await?
        .ok_or_else(|| PortalError::unauthorized("Unknown identity"))?;

    Ok(ApiResponse::ok("Current user", identity.into()))
}

/// Create the auth router
pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
        .with_state(state)
}
