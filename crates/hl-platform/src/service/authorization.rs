//! Authorization Service
//!
//! Builds the per-request [`AuthContext`] from validated token claims and
//! provides the pure decision functions the handlers compose: role
//! membership and resource ownership. Deny decisions carry a reason; the
//! api layer converts them into the externally visible failure.

use std::sync::Arc;

use crate::domain::Role;
use crate::error::{PortalError, Result};
use crate::repository::IdentityRepository;
use crate::service::auth::AccessTokenClaims;

/// The validated caller: identity plus the role read back from the store.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity_id: String,
    pub role: Role,
    pub email: String,
    pub fullname: String,
}

impl AuthContext {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_recruiter(&self) -> bool {
        self.role == Role::Recruiter
    }
}

pub struct AuthorizationService {
    identity_repo: Arc<IdentityRepository>,
}

impl AuthorizationService {
    pub fn new(identity_repo: Arc<IdentityRepository>) -> Self {
        Self { identity_repo }
    }

    /// Resolve claims into a context. The identity is freshly loaded so the
    /// role and existence are never trusted from the claim alone.
    pub async fn build_context(&self, claims: &AccessTokenClaims) -> Result<AuthContext> {
        let identity = self
            .identity_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| PortalError::unauthorized("Unknown identity"))?;

        Ok(AuthContext {
            identity_id: identity.id,
            role: identity.role,
            email: identity.email,
            fullname: identity.fullname,
        })
    }
}

/// Pure authorization checks. Each returns `Ok(())` for allow or a typed
/// deny; no side effects.
pub mod checks {
    use super::*;

    pub fn require_role(ctx: &AuthContext, role: Role) -> Result<()> {
        if ctx.role == role {
            Ok(())
        } else {
            Err(PortalError::forbidden(format!(
                "This operation requires the {} role",
                role
            )))
        }
    }

    pub fn require_student(ctx: &AuthContext) -> Result<()> {
        require_role(ctx, Role::Student)
    }

    pub fn require_recruiter(ctx: &AuthContext) -> Result<()> {
        require_role(ctx, Role::Recruiter)
    }

    /// Self-service guard: the caller must be the identity being mutated.
    pub fn require_self(ctx: &AuthContext, identity_id: &str) -> Result<()> {
        if ctx.identity_id == identity_id {
            Ok(())
        } else {
            Err(PortalError::forbidden("Not your account"))
        }
    }

    /// Ownership guard. `owner_id` must come from a freshly loaded
    /// resource, never from a client-supplied claim.
    pub fn require_owner(ctx: &AuthContext, owner_id: &str) -> Result<()> {
        if ctx.identity_id == owner_id {
            Ok(())
        } else {
            Err(PortalError::forbidden("Not the owner of this resource"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            identity_id: "id-1".to_string(),
            role,
            email: "test@example.com".to_string(),
            fullname: "Test User".to_string(),
        }
    }

    #[test]
    fn test_role_checks() {
        assert!(checks::require_student(&ctx(Role::Student)).is_ok());
        assert!(checks::require_student(&ctx(Role::Recruiter)).is_err());
        assert!(checks::require_recruiter(&ctx(Role::Recruiter)).is_ok());
        assert!(checks::require_recruiter(&ctx(Role::Student)).is_err());
    }

    #[test]
    fn test_self_check() {
        let ctx = ctx(Role::Student);
        assert!(checks::require_self(&ctx, "id-1").is_ok());
        let err = checks::require_self(&ctx, "id-2").unwrap_err();
        assert!(matches!(err, PortalError::Forbidden { .. }));
    }

    #[test]
    fn test_owner_check() {
        let ctx = ctx(Role::Recruiter);
        assert!(checks::require_owner(&ctx, "id-1").is_ok());
        assert!(checks::require_owner(&ctx, "someone-else").is_err());
    }
}
