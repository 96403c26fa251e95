//! HireLane Platform Server
//!
//! Production server for the job-portal REST APIs:
//! - Auth APIs: register, login, logout, me
//! - Profile API: self-service partial update with attachments
//! - Companies, Jobs, Applications APIs
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HL_API_PORT` | `8080` | HTTP API port |
//! | `HL_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `HL_MONGO_DB` | `hirelane` | MongoDB database name |
//! | `HL_JWT_SECRET` | dev default | HMAC signing secret |
//! | `HL_JWT_ISSUER` | `hirelane` | JWT issuer claim |
//! | `HL_TOKEN_TTL_SECS` | `86400` | Access token lifetime |
//! | `HL_DEV_MODE` | unset | Seed demo data when `true`/`1` |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::{response::Json, routing::get, Extension, Router};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hl_platform::api::{
    applications_router, auth_router, companies_router, jobs_router, profiles_router, ApiDoc,
    AppState, ApplicationsState, AuthState, CompaniesState, JobsState, OptionalAuth,
    ProfilesState,
};
use hl_platform::repository::{
    ensure_indexes, ApplicationRepository, CompanyRepository, IdentityRepository, JobRepository,
};
use hl_platform::seed::DevDataSeeder;
use hl_platform::service::{
    AttachmentService, AuthConfig, AuthService, AuthorizationService, PasswordService,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting HireLane Platform Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("HL_API_PORT", 8080);
    let mongo_url = env_or("HL_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("HL_MONGO_DB", "hirelane");
    let jwt_secret = env_or("HL_JWT_SECRET", "dev-only-secret-change-me");
    let jwt_issuer = env_or("HL_JWT_ISSUER", "hirelane");
    let token_ttl_secs: i64 = env_or_parse("HL_TOKEN_TTL_SECS", 86400);

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    // Indexes carry the uniqueness invariants; create them before traffic.
    ensure_indexes(&db).await?;

    // Seed development data if in dev mode
    let dev_mode = std::env::var("HL_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        let seeder = DevDataSeeder::new(db.clone());
        if let Err(e) = seeder.seed().await {
            tracing::warn!("Dev data seeding skipped (data may already exist): {}", e);
        }
    }

    // Initialize repositories
    let identity_repo = Arc::new(IdentityRepository::new(&db));
    let company_repo = Arc::new(CompanyRepository::new(&db));
    let job_repo = Arc::new(JobRepository::new(&db));
    let application_repo = Arc::new(ApplicationRepository::new(&db));
    info!("Repositories initialized");

    // Initialize services
    let auth_config = AuthConfig {
        secret_key: jwt_secret,
        issuer: jwt_issuer.clone(),
        audience: jwt_issuer,
        access_token_expiry_secs: token_ttl_secs,
    };
    let auth_service = Arc::new(AuthService::new(auth_config));
    let authz_service = Arc::new(AuthorizationService::new(identity_repo.clone()));
    let password_service = Arc::new(PasswordService::default());
    let attachment_service = Arc::new(AttachmentService);
    info!("Auth services initialized");

    // Create AppState for the authentication extractors
    let app_state = AppState {
        auth_service: auth_service.clone(),
        authz_service,
    };

    // Build API states
    let auth_state = AuthState {
        auth_service,
        password_service,
        attachment_service: attachment_service.clone(),
        identity_repo: identity_repo.clone(),
    };
    let profiles_state = ProfilesState {
        identity_repo: identity_repo.clone(),
        attachment_service: attachment_service.clone(),
    };
    let companies_state = CompaniesState {
        company_repo: company_repo.clone(),
        identity_repo,
        attachment_service,
    };
    let jobs_state = JobsState {
        job_repo: job_repo.clone(),
        company_repo: company_repo.clone(),
    };
    let applications_state = ApplicationsState {
        application_repo,
        job_repo,
        company_repo,
    };

    // Build API router
    let app = Router::new()
        .nest("/auth", auth_router(auth_state))
        .nest("/api/profile", profiles_router(profiles_state))
        .nest("/api/companies", companies_router(companies_state))
        .nest("/api/jobs", jobs_router(jobs_state))
        .nest("/api/applications", applications_router(applications_state))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        // OpenAPI / Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth extractor state
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let listener = TcpListener::bind(&api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HireLane Platform Server shutdown complete");
    Ok(())
}

async fn health_handler(OptionalAuth(auth): OptionalAuth) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated": auth.is_some()
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "READY"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
