//! Applications API Endpoints
//!
//! The apply/decide flow. Duplicate submissions are stopped by the store's
//! unique (job, applicant) index, so concurrent applies resolve to exactly
//! one success. Status decisions run through the explicit transition table.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::api::common::{ApiResponse, ApiResult};
use crate::api::middleware::Authenticated;
use crate::domain::{Application, ApplicationStatus, Job};
use crate::error::{PortalError, Result};
use crate::repository::{ApplicationRepository, CompanyRepository, JobRepository};
use crate::service::{checks, AuthContext};

/// Status decision request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    /// "accepted" or "rejected"
    pub status: String,
}

/// Application response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub job_id: String,
    pub applicant_id: String,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            job_id: a.job_id,
            applicant_id: a.applicant_id,
            status: a.status,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// Applications service state
#[derive(Clone)]
pub struct ApplicationsState {
    pub application_repo: Arc<ApplicationRepository>,
    pub job_repo: Arc<JobRepository>,
    pub company_repo: Arc<CompanyRepository>,
}

/// The decision-side ownership chain: caller must own the company behind
/// the application's job, resolved from freshly loaded documents.
async fn require_job_company_owner(
    state: &ApplicationsState,
    ctx: &AuthContext,
    job: &Job,
) -> Result<()> {
    let company = state
        .company_repo
        .find_by_id(&job.company_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Company", &job.company_id))?;
    checks::require_owner(ctx, &company.created_by)
}

/// Apply to a job
pub async fn apply(
    State(state): State<ApplicationsState>,
    Authenticated(ctx): Authenticated,
    Path(job_id): Path<String>,
) -> ApiResult<ApplicationResponse> {
    checks::require_student(&ctx)?;

    let job = state
        .job_repo
        .find_by_id(&job_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Job", &job_id))?;

    // Friendly pre-check; the unique index still decides under races.
    if state
        .application_repo
        .exists_for(&job.id, &ctx.identity_id)
        .await?
    {
        return Err(PortalError::duplicate("Application", "job", &job.id));
    }

    let application = Application::new(&job.id, &ctx.identity_id);
    state.application_repo.insert(&application).await?;

    // Denormalized cache append. Failing here leaves the application
    // record authoritative; listings query the applications collection.
    if let Err(e) = state
        .job_repo
        .push_application(&job.id, &application.id)
        .await
    {
        warn!(job_id = %job.id, error = %e, "failed to append application to job cache");
    }

    info!(application_id = %application.id, job_id = %job.id, "application submitted");
    Ok(ApiResponse::ok(
        "Application submitted successfully",
        application.into(),
    ))
}

/// Decide an application (accept or reject)
pub async fn set_status(
    State(state): State<ApplicationsState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<ApplicationResponse> {
    checks::require_recruiter(&ctx)?;

    let mut application = state
        .application_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Application", &id))?;

    let job = state
        .job_repo
        .find_by_id(&application.job_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Job", &application.job_id))?;
    require_job_company_owner(&state, &ctx, &job).await?;

    let new_status = ApplicationStatus::parse(&req.status)?;
    application.transition(new_status)?;
    state.application_repo.update(&application).await?;

    info!(application_id = %application.id, status = %new_status, "application decided");
    Ok(ApiResponse::ok("Status updated successfully", application.into()))
}

/// List applications for a job (owning recruiter)
pub async fn list_for_job(
    State(state): State<ApplicationsState>,
    Authenticated(ctx): Authenticated,
    Path(job_id): Path<String>,
) -> ApiResult<Vec<ApplicationResponse>> {
    checks::require_recruiter(&ctx)?;

    let job = state
        .job_repo
        .find_by_id(&job_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Job", &job_id))?;
    require_job_company_owner(&state, &ctx, &job).await?;

    // Query by jobId: the job document's applications array is a cache,
    // not the source of truth.
    let applications = state.application_repo.find_by_job(&job.id).await?;
    Ok(ApiResponse::ok(
        "Applicants",
        applications
            .into_iter()
            .map(ApplicationResponse::from)
            .collect(),
    ))
}

/// List the caller's own applications
pub async fn list_for_student(
    State(state): State<ApplicationsState>,
    Authenticated(ctx): Authenticated,
) -> ApiResult<Vec<ApplicationResponse>> {
    checks::require_student(&ctx)?;

    let applications = state
        .application_repo
        .find_by_applicant(&ctx.identity_id)
        .await?;
    Ok(ApiResponse::ok(
        "Applied jobs",
        applications
            .into_iter()
            .map(ApplicationResponse::from)
            .collect(),
    ))
}

/// Create the applications router
pub fn applications_router(state: ApplicationsState) -> Router {
    Router::new()
        .route("/jobs/:job_id", post(apply).get(list_for_job))
        .route("/mine", get(list_for_student))
        .route("/:id/status", put(set_status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_status_request_deserialization() {
        let req: SetStatusRequest = serde_json::from_str(r#"{"status":"accepted"}"#).unwrap();
        assert_eq!(req.status, "accepted");
    }

    #[test]
    fn test_application_response_status_wire_format() {
        let application = Application::new("job-1", "student-1");
        let response: ApplicationResponse = application.into();
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"pending\""));
        assert!(json.contains("jobId"));
        assert!(json.contains("applicantId"));
    }
}
