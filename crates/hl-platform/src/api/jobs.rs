//! Jobs API Endpoints
//!
//! Posting and discovery. A posting must target a company the recruiter
//! owns; ownership is re-checked against the stored documents on every
//! mutation, never cached.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::api::common::{ApiResponse, ApiResult};
use crate::api::middleware::Authenticated;
use crate::domain::{Job, JobType, JobUpdate};
use crate::error::{PortalError, Result};
use crate::repository::{CompanyRepository, JobRepository};
use crate::service::{checks, AuthContext};

/// Requirements arrive either as a pass-through sequence or as a
/// comma-separated string.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Requirements {
    List(Vec<String>),
    Csv(String),
}

impl Requirements {
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Requirements::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Requirements::Csv(raw) => Job::normalize_requirements(&raw),
        }
    }
}

/// Post job request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostJobRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    pub salary: String,
    pub experience_level: u32,
    pub location: String,
    pub job_type: JobType,
    pub positions: u32,
    pub company_id: String,
}

/// Update job request; only supplied fields overwrite.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Requirements>,
    pub salary: Option<String>,
    pub experience_level: Option<u32>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub positions: Option<u32>,
}

/// Job response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    pub experience_level: u32,
    pub location: String,
    pub job_type: JobType,
    pub positions: u32,
    pub company_id: String,
    pub created_by: String,
    pub applications: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobResponse {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            title: j.title,
            description: j.description,
            requirements: j.requirements,
            salary: j.salary,
            experience_level: j.experience_level,
            location: j.location,
            job_type: j.job_type,
            positions: j.positions,
            company_id: j.company_id,
            created_by: j.created_by,
            applications: j.applications,
            created_at: j.created_at.to_rfc3339(),
            updated_at: j.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the jobs list
#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    #[serde(default)]
    pub keyword: String,
}

/// Jobs service state
#[derive(Clone)]
pub struct JobsState {
    pub job_repo: Arc<JobRepository>,
    pub company_repo: Arc<CompanyRepository>,
}

/// The posting/update invariant: the target company must exist and be
/// owned by the caller, checked against the freshly loaded document.
async fn require_owned_company(
    state: &JobsState,
    ctx: &AuthContext,
    company_id: &str,
) -> Result<()> {
    let company = state
        .company_repo
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| PortalError::not_found("Company", company_id))?;
    checks::require_owner(ctx, &company.created_by)
}

/// Post a new job
pub async fn post_job(
    State(state): State<JobsState>,
    Authenticated(ctx): Authenticated,
    Json(req): Json<PostJobRequest>,
) -> ApiResult<JobResponse> {
    checks::require_recruiter(&ctx)?;

    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(PortalError::validation("title and description are required"));
    }

    // A recruiter with no company has nothing to post under.
    if state.company_repo.count_by_owner(&ctx.identity_id).await? == 0 {
        return Err(PortalError::validation(
            "register a company before posting a job",
        ));
    }

    require_owned_company(&state, &ctx, &req.company_id).await?;

    let requirements = req
        .requirements
        .map(Requirements::into_tokens)
        .unwrap_or_default();

    let job = Job::new(
        req.title.trim(),
        req.description.trim(),
        requirements,
        req.salary,
        req.experience_level,
        req.location,
        req.job_type,
        req.positions,
        req.company_id,
        &ctx.identity_id,
    )?;

    state.job_repo.insert(&job).await?;

    info!(job_id = %job.id, recruiter = %ctx.identity_id, "job posted");
    Ok(ApiResponse::ok("Job posted successfully", job.into()))
}

/// Update a job
pub async fn update_job(
    State(state): State<JobsState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> ApiResult<JobResponse> {
    checks::require_recruiter(&ctx)?;

    let mut job = state
        .job_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Job", &id))?;

    // The caller must be the posting recruiter and must still own the
    // company behind the job; a transferred company blocks the former
    // owner immediately.
    checks::require_owner(&ctx, &job.created_by)?;
    require_owned_company(&state, &ctx, &job.company_id).await?;

    job.apply_update(JobUpdate {
        title: req.title,
        description: req.description,
        requirements: req.requirements.map(Requirements::into_tokens),
        salary: req.salary,
        experience_level: req.experience_level,
        location: req.location,
        job_type: req.job_type,
        positions: req.positions,
    })?;

    state.job_repo.update(&job).await?;

    info!(job_id = %job.id, "job updated");
    Ok(ApiResponse::ok("Job updated successfully", job.into()))
}

/// Get job by id
pub async fn get_job(
    State(state): State<JobsState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<JobResponse> {
    let job = state
        .job_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Job", &id))?;

    Ok(ApiResponse::ok("Job", job.into()))
}

/// List jobs, optionally filtered by keyword
pub async fn list_jobs(
    State(state): State<JobsState>,
    Authenticated(_ctx): Authenticated,
    Query(query): Query<JobsQuery>,
) -> ApiResult<Vec<JobResponse>> {
    let jobs = state.job_repo.search(query.keyword.trim()).await?;
    Ok(ApiResponse::ok(
        "Jobs",
        jobs.into_iter().map(JobResponse::from).collect(),
    ))
}

/// List the caller's own postings
pub async fn list_recruiter_jobs(
    State(state): State<JobsState>,
    Authenticated(ctx): Authenticated,
) -> ApiResult<Vec<JobResponse>> {
    checks::require_recruiter(&ctx)?;

    let jobs = state.job_repo.find_by_creator(&ctx.identity_id).await?;
    Ok(ApiResponse::ok(
        "Jobs",
        jobs.into_iter().map(JobResponse::from).collect(),
    ))
}

/// Create the jobs router
pub fn jobs_router(state: JobsState) -> Router {
    Router::new()
        .route("/", post(post_job).get(list_jobs))
        .route("/mine", get(list_recruiter_jobs))
        .route("/:id", get(get_job).put(update_job))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirements_accepts_both_shapes() {
        let csv: Requirements = serde_json::from_str("\"rust, axum , mongodb\"").unwrap();
        assert_eq!(csv.into_tokens(), vec!["rust", "axum", "mongodb"]);

        let list: Requirements = serde_json::from_str(r#"["rust"," axum ",""]"#).unwrap();
        assert_eq!(list.into_tokens(), vec!["rust", "axum"]);
    }

    #[test]
    fn test_post_request_deserialization() {
        let json = r#"{
            "title": "Backend Engineer",
            "description": "Own the pipeline",
            "requirements": "rust, mongodb",
            "salary": "70k-90k",
            "experienceLevel": 3,
            "location": "Remote",
            "jobType": "Full-time",
            "positions": 2,
            "companyId": "company-1"
        }"#;
        let req: PostJobRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.job_type, JobType::FullTime);
        assert_eq!(req.positions, 2);
    }

    #[test]
    fn test_update_request_all_optional() {
        let req: UpdateJobRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());
        assert!(req.positions.is_none());
    }
}
