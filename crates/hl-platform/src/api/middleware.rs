//! API Middleware
//!
//! Authentication extractors for Axum. A request is authenticated by a
//! bearer token in the Authorization header or by the session cookie set
//! at login; the header wins when both are present. Anything without a
//! validated identity is rejected here, before role or ownership checks
//! run.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::error::PortalError;
use crate::service::{extract_bearer_token, AuthContext, AuthService, AuthorizationService, SESSION_COOKIE};

/// Application state containing shared auth services, attached to the
/// router as an Extension layer by the server binary.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub authz_service: Arc<AuthorizationService>,
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .map(String::from);

    from_header.or_else(|| {
        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
    })
}

/// Extractor for authenticated requests. Validates the token and builds
/// the [`AuthContext`] from the freshly loaded identity.
pub struct Authenticated(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts
            .extensions
            .get::<AppState>()
            .cloned()
            .ok_or_else(|| {
                PortalError::Internal {
                    message: "AppState not attached".to_string(),
                }
                .into_response()
            })?;

        let token = token_from_parts(parts).ok_or_else(|| {
            PortalError::unauthorized("Authentication required").into_response()
        })?;

        let claims = app_state
            .auth_service
            .validate_token(&token)
            .map_err(|e| e.into_response())?;

        let context = app_state
            .authz_service
            .build_context(&claims)
            .await
            .map_err(|e| e.into_response())?;

        Ok(Authenticated(context))
    }
}

/// Extractor for optionally authenticated requests.
pub struct OptionalAuth(pub Option<AuthContext>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = match parts.extensions.get::<AppState>().cloned() {
            Some(s) => s,
            None => return Ok(OptionalAuth(None)),
        };

        let token = match token_from_parts(parts) {
            Some(t) => t,
            None => return Ok(OptionalAuth(None)),
        };

        let claims = match app_state.auth_service.validate_token(&token) {
            Ok(c) => c,
            Err(_) => return Ok(OptionalAuth(None)),
        };

        match app_state.authz_service.build_context(&claims).await {
            Ok(ctx) => Ok(OptionalAuth(Some(ctx))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
