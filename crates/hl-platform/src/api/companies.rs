//! Companies API Endpoints
//!
//! Recruiter-owned organization management. Ownership is fixed at
//! creation and re-checked against the stored company on every mutation.

use axum::{
    extract::{multipart::Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::api::common::{collect_multipart, ApiResponse, ApiResult};
use crate::api::middleware::Authenticated;
use crate::domain::{Company, CompanyUpdate};
use crate::error::PortalError;
use crate::repository::{CompanyRepository, IdentityRepository};
use crate::service::{checks, AttachmentKind, AttachmentService};

/// Create company request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Company response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub logo: Option<String>,
    pub created_by: String,
    pub created_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            website: c.website,
            location: c.location,
            logo: c.logo,
            created_by: c.created_by,
            created_at: c.created_at.to_rfc3339(),
        }
    }
}

/// Companies service state
#[derive(Clone)]
pub struct CompaniesState {
    pub company_repo: Arc<CompanyRepository>,
    pub identity_repo: Arc<IdentityRepository>,
    pub attachment_service: Arc<AttachmentService>,
}

/// Register a new company
pub async fn create_company(
    State(state): State<CompaniesState>,
    Authenticated(ctx): Authenticated,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<CompanyResponse> {
    checks::require_recruiter(&ctx)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(PortalError::validation("company name is required"));
    }

    // Friendly pre-check; the unique index still guards the race.
    if state.company_repo.find_by_name(name).await?.is_some() {
        return Err(PortalError::duplicate("Company", "name", name));
    }

    let mut company = Company::new(name, &ctx.identity_id);
    company.apply_update(CompanyUpdate {
        description: req.description,
        website: req.website,
        location: req.location,
        ..Default::default()
    });

    state.company_repo.insert(&company).await?;

    // First registered company becomes the recruiter's profile company.
    let identity = state.identity_repo.find_by_id(&ctx.identity_id).await?;
    if let Some(identity) = identity {
        if identity.profile.company_id.is_none() {
            state
                .identity_repo
                .set_company(&ctx.identity_id, &company.id)
                .await?;
        }
    }

    info!(company_id = %company.id, recruiter = %ctx.identity_id, "company registered");
    Ok(ApiResponse::ok("Company registered successfully", company.into()))
}

/// List the caller's companies
pub async fn list_own_companies(
    State(state): State<CompaniesState>,
    Authenticated(ctx): Authenticated,
) -> ApiResult<Vec<CompanyResponse>> {
    checks::require_recruiter(&ctx)?;

    let companies = state.company_repo.find_by_owner(&ctx.identity_id).await?;
    Ok(ApiResponse::ok(
        "Companies",
        companies.into_iter().map(CompanyResponse::from).collect(),
    ))
}

/// Get company by id
pub async fn get_company(
    State(state): State<CompaniesState>,
    Authenticated(_ctx): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<CompanyResponse> {
    let company = state
        .company_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Company", &id))?;

    Ok(ApiResponse::ok("Company", company.into()))
}

/// Update a company
///
/// Multipart form; every field optional. Text fields: name, description,
/// website, location. File: logo.
pub async fn update_company(
    State(state): State<CompaniesState>,
    Authenticated(ctx): Authenticated,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult<CompanyResponse> {
    checks::require_recruiter(&ctx)?;

    let (fields, files) = collect_multipart(multipart).await?;

    // Ownership is evaluated against the freshly loaded company, never a
    // client-supplied claim.
    let mut company = state
        .company_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PortalError::not_found("Company", &id))?;
    checks::require_owner(&ctx, &company.created_by)?;

    if let Some(name) = fields.get("name") {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PortalError::validation("company name cannot be empty"));
        }
        if trimmed != company.name {
            if let Some(existing) = state.company_repo.find_by_name(trimmed).await? {
                if existing.id != company.id {
                    return Err(PortalError::duplicate("Company", "name", trimmed));
                }
            }
        }
    }

    let logo = files
        .get("logo")
        .map(|f| {
            AttachmentKind::Logo.check(&f.filename)?;
            state
                .attachment_service
                .ingest(&f.bytes, &f.filename, &f.content_type)
        })
        .transpose()?;

    company.apply_update(CompanyUpdate {
        name: fields.get("name").map(|n| n.trim().to_string()),
        description: fields.get("description").cloned(),
        website: fields.get("website").cloned(),
        location: fields.get("location").cloned(),
        logo: logo.map(|asset| asset.uri),
    });

    state.company_repo.update(&company).await?;

    info!(company_id = %company.id, "company updated");
    Ok(ApiResponse::ok("Company updated successfully", company.into()))
}

/// Create the companies router
pub fn companies_router(state: CompaniesState) -> Router {
    Router::new()
        .route("/", post(create_company).get(list_own_companies))
        .route("/:id", get(get_company).put(update_company))
        .with_state(state)
}
