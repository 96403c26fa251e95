//! OpenAPI Documentation

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HireLane Platform API",
        description = "Job portal backend: identities, companies, jobs, applications",
        version = "0.1.0"
    ),
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::get_current_user,
    ),
    components(schemas(
        crate::api::auth::LoginRequest,
        crate::api::auth::LoginData,
        crate::api::auth::IdentityResponse,
        crate::api::companies::CreateCompanyRequest,
        crate::api::companies::CompanyResponse,
        crate::api::jobs::Requirements,
        crate::api::jobs::PostJobRequest,
        crate::api::jobs::UpdateJobRequest,
        crate::api::jobs::JobResponse,
        crate::api::applications::SetStatusRequest,
        crate::api::applications::ApplicationResponse,
        crate::domain::Role,
        crate::domain::Profile,
        crate::domain::StoredAsset,
        crate::domain::JobType,
        crate::domain::ApplicationStatus,
    )),
    tags(
        (name = "auth", description = "Registration, login, session")
    )
)]
pub struct ApiDoc;
