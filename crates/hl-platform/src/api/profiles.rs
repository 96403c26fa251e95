//! Profile API Endpoints
//!
//! Self-service partial profile update. The update is shaped by the
//! caller's stored role at this boundary: student-only fields supplied by
//! a recruiter are silently dropped, which keeps the endpoint uniform
//! across roles without making it an error.

use axum::{
    extract::{multipart::Multipart, State},
    routing::put,
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::api::auth::IdentityResponse;
use crate::api::common::{collect_multipart, ApiResponse, ApiResult, UploadedFile};
use crate::api::middleware::Authenticated;
use crate::domain::{
    Identity, Profile, ProfileUpdate, RecruiterProfileUpdate, Role, StoredAsset,
    StudentProfileUpdate,
};
use crate::error::{PortalError, Result};
use crate::repository::IdentityRepository;
use crate::service::{AttachmentKind, AttachmentService};

#[derive(Clone)]
pub struct ProfilesState {
    pub identity_repo: Arc<IdentityRepository>,
    pub attachment_service: Arc<AttachmentService>,
}

fn ingest_checked(
    service: &AttachmentService,
    kind: AttachmentKind,
    file: &UploadedFile,
) -> Result<StoredAsset> {
    kind.check(&file.filename)?;
    service.ingest(&file.bytes, &file.filename, &file.content_type)
}

/// Update the caller's profile
///
/// Multipart form; every field optional. Text fields: fullname, email,
/// phoneNumber, bio, skills (comma-separated). Files: profilePhoto,
/// resume. Omitted fields keep their stored values; supplied empty values
/// overwrite.
pub async fn update_profile(
    State(state): State<ProfilesState>,
    Authenticated(ctx): Authenticated,
    multipart: Multipart,
) -> ApiResult<IdentityResponse> {
    let (fields, files) = collect_multipart(multipart).await?;

    // Self-service only: the target is always the caller's own identity,
    // freshly loaded.
    let mut identity = state
        .identity_repo
        .find_by_id(&ctx.identity_id)
        .await?
        .ok_or_else(|| PortalError::unauthorized("Unknown identity"))?;

    // An email change must not collide with another account.
    if let Some(email) = fields.get("email") {
        let normalized = Identity::normalize_email(email);
        if normalized != identity.email && state.identity_repo.exists_by_email(&normalized).await? {
            return Err(PortalError::duplicate("Identity", "email", normalized));
        }
    }

    // Attachments are ingested before the identity write; a pipeline
    // failure aborts the whole update.
    let photo = files
        .get("profilePhoto")
        .map(|f| ingest_checked(&state.attachment_service, AttachmentKind::Photo, f))
        .transpose()?;

    let update = match identity.role {
        Role::Student => {
            let resume = files
                .get("resume")
                .map(|f| ingest_checked(&state.attachment_service, AttachmentKind::Resume, f))
                .transpose()?;

            ProfileUpdate::Student(StudentProfileUpdate {
                fullname: fields.get("fullname").cloned(),
                email: fields.get("email").cloned(),
                phone_number: fields.get("phoneNumber").cloned(),
                bio: fields.get("bio").cloned(),
                skills: fields.get("skills").map(|s| Profile::normalize_skills(s)),
                resume,
                profile_photo: photo,
            })
        }
        // Student-only fields (fullname, bio, skills, resume) have nowhere
        // to go here; a recruiter supplying them gets them dropped, not an
        // error.
        Role::Recruiter => ProfileUpdate::Recruiter(RecruiterProfileUpdate {
            email: fields.get("email").cloned(),
            phone_number: fields.get("phoneNumber").cloned(),
            profile_photo: photo,
        }),
    };

    identity.apply_update(update);
    state.identity_repo.update(&identity).await?;

    info!(identity_id = %identity.id, "profile updated");
    Ok(ApiResponse::ok("Profile updated successfully", identity.into()))
}

/// Create the profiles router
pub fn profiles_router(state: ProfilesState) -> Router {
    Router::new()
        .route("/", put(update_profile))
        .with_state(state)
}
