//! API Layer
//!
//! REST API endpoints for the portal, one router + state per aggregate.

pub mod applications;
pub mod auth;
pub mod common;
pub mod companies;
pub mod jobs;
pub mod middleware;
pub mod openapi;
pub mod profiles;

pub use common::*;
pub use middleware::{AppState, Authenticated, OptionalAuth};

pub use applications::{applications_router, ApplicationsState};
pub use auth::{auth_router, AuthState};
pub use companies::{companies_router, CompaniesState};
pub use jobs::{jobs_router, JobsState};
pub use openapi::ApiDoc;
pub use profiles::{profiles_router, ProfilesState};
