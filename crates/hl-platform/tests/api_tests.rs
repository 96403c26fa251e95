//! Platform API Integration Tests
//!
//! Tests for the portal domain models, authorization checks, attachment
//! pipeline, and error handling. These run without a MongoDB instance;
//! store-backed invariants (unique indexes) are covered by the repository
//! layer's index setup and exercised in deployment.

use std::collections::HashSet;

use hl_platform::domain::{
    Application, ApplicationStatus, Company, Identity, Job, JobType, Profile, ProfileUpdate,
    Role, StoredAsset, StudentProfileUpdate,
};
use hl_platform::service::attachment::{AttachmentKind, AttachmentService};
use hl_platform::service::{checks, AuthConfig, AuthContext, AuthService, PasswordService};
use hl_platform::{PortalError, TsidGenerator};

fn student() -> Identity {
    Identity::new(
        "Ada Lovelace",
        "a@x.com",
        "555-0100",
        "$argon2id$stub",
        Role::Student,
    )
}

fn recruiter() -> Identity {
    Identity::new(
        "Grace Hopper",
        "grace@initech.com",
        "555-0101",
        "$argon2id$stub",
        Role::Recruiter,
    )
}

// Unit tests for domain models
mod domain_tests {
    use super::*;

    #[test]
    fn test_identity_creation_normalizes_email() {
        let identity = Identity::new(
            "Ada Lovelace",
            "  A@X.Com ",
            "555-0100",
            "$argon2id$stub",
            Role::Student,
        );
        assert_eq!(identity.email, "a@x.com");
        assert!(identity.is_student());
        assert!(!identity.is_recruiter());
    }

    #[test]
    fn test_company_ownership_is_fixed_at_creation() {
        let owner = recruiter();
        let company = Company::new("Initech", &owner.id);
        assert!(company.is_owned_by(&owner.id));
        assert!(!company.is_owned_by("somebody-else"));
    }

    #[test]
    fn test_job_requires_at_least_one_position() {
        let err = Job::new(
            "Backend Engineer",
            "desc",
            vec![],
            "70k",
            1,
            "Remote",
            JobType::FullTime,
            0,
            "company-1",
            "recruiter-1",
        )
        .unwrap_err();
        assert!(matches!(err, PortalError::Validation { .. }));
    }

    #[test]
    fn test_job_keyword_filter() {
        let job = Job::new(
            "Backend Engineer",
            "Own the ingestion pipeline",
            vec![],
            "70k",
            1,
            "Remote",
            JobType::FullTime,
            1,
            "company-1",
            "recruiter-1",
        )
        .unwrap();
        assert!(job.matches_keyword("ENGINEER"));
        assert!(job.matches_keyword("pipeline"));
        assert!(job.matches_keyword(""));
        assert!(!job.matches_keyword("designer"));
    }
}

// Profile merge semantics
mod profile_tests {
    use super::*;

    #[test]
    fn test_partial_merge_only_touches_supplied_fields() {
        let mut identity = student();
        identity.profile.bio = Some("systems programmer".to_string());
        identity.profile.skills = vec!["rust".to_string(), "sql".to_string()];
        identity.profile.resume = Some("data:application/pdf;base64,AA==".to_string());
        identity.profile.resume_original_name = Some("cv.pdf".to_string());
        let before = identity.profile.clone();

        identity.apply_update(ProfileUpdate::Student(StudentProfileUpdate {
            phone_number: Some("555-9999".to_string()),
            ..Default::default()
        }));

        assert_eq!(identity.phone_number, "555-9999");
        assert_eq!(identity.profile, before);
    }

    #[test]
    fn test_supplied_empty_values_overwrite() {
        let mut identity = student();
        identity.profile.skills = vec!["rust".to_string()];

        identity.apply_update(ProfileUpdate::Student(StudentProfileUpdate {
            skills: Some(Vec::new()),
            ..Default::default()
        }));
        assert!(identity.profile.skills.is_empty());
    }

    #[test]
    fn test_skills_tokenization() {
        assert_eq!(
            Profile::normalize_skills("rust, tokio,  , axum"),
            vec!["rust", "tokio", "axum"]
        );
    }
}

// Application state machine
mod application_tests {
    use super::*;

    #[test]
    fn test_new_application_is_pending() {
        let application = Application::new("J1", "student-1");
        assert_eq!(application.status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_accept_then_reject_fails() {
        let mut application = Application::new("J1", "student-1");
        application.transition(ApplicationStatus::Accepted).unwrap();

        let err = application
            .transition(ApplicationStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidTransition { .. }));
        assert_eq!(application.status, ApplicationStatus::Accepted);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_transition_table_is_exhaustive() {
        use ApplicationStatus::*;
        let allowed: Vec<(ApplicationStatus, ApplicationStatus)> = [Pending, Accepted, Rejected]
            .iter()
            .flat_map(|from| {
                [Pending, Accepted, Rejected]
                    .iter()
                    .filter(|to| from.can_transition(**to))
                    .map(|to| (*from, *to))
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(allowed, vec![(Pending, Accepted), (Pending, Rejected)]);
    }
}

// Authorization context tests
mod authorization_tests {
    use super::*;

    fn ctx(role: Role, id: &str) -> AuthContext {
        AuthContext {
            identity_id: id.to_string(),
            role,
            email: "test@example.com".to_string(),
            fullname: "Test User".to_string(),
        }
    }

    #[test]
    fn test_role_membership() {
        assert!(checks::require_student(&ctx(Role::Student, "s1")).is_ok());
        assert!(checks::require_recruiter(&ctx(Role::Student, "s1")).is_err());
        assert!(checks::require_recruiter(&ctx(Role::Recruiter, "r1")).is_ok());
    }

    #[test]
    fn test_ownership_against_fresh_resource() {
        let owner = ctx(Role::Recruiter, "r1");
        let mut company = Company::new("Initech", "r1");
        assert!(checks::require_owner(&owner, &company.created_by).is_ok());

        // Hypothetical transfer: the former owner is blocked immediately
        // because the check runs against the stored owner, not a cache.
        company.created_by = "r2".to_string();
        let err = checks::require_owner(&owner, &company.created_by).unwrap_err();
        assert!(matches!(err, PortalError::Forbidden { .. }));
    }

    #[test]
    fn test_self_service_guard() {
        let caller = ctx(Role::Student, "s1");
        assert!(checks::require_self(&caller, "s1").is_ok());
        assert!(checks::require_self(&caller, "s2").is_err());
    }
}

// Credential and token tests
mod auth_tests {
    use super::*;

    #[test]
    fn test_password_mismatch_is_false_not_error() {
        let service = PasswordService::default();
        let hash = service.hash_password("hunter2hunter2").unwrap();
        assert!(service.verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!service.verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip_carries_identity_and_role() {
        let service = AuthService::new(AuthConfig::default());
        let identity = recruiter();
        let token = service.generate_access_token(&identity).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, identity.id);
        assert_eq!(claims.role, Role::Recruiter);
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = AuthService::new(AuthConfig {
            secret_key: "secret-a".to_string(),
            ..AuthConfig::default()
        });
        let validator = AuthService::new(AuthConfig {
            secret_key: "secret-b".to_string(),
            ..AuthConfig::default()
        });
        let token = issuer.generate_access_token(&student()).unwrap();
        assert!(validator.validate_token(&token).is_err());
    }
}

// Attachment pipeline tests
mod attachment_tests {
    use super::*;

    #[test]
    fn test_ingest_round_trip() {
        let service = AttachmentService;
        let bytes: Vec<u8> = (0u8..=255).collect();
        let asset = service.ingest(&bytes, "photo.png", "image/png").unwrap();

        assert_eq!(asset.original_filename, "photo.png");
        assert_eq!(
            AttachmentService::decode_data_uri(&asset.uri).unwrap(),
            bytes
        );
    }

    #[test]
    fn test_empty_upload_rejected() {
        let err = AttachmentService.ingest(&[], "x.pdf", "").unwrap_err();
        assert!(matches!(err, PortalError::Ingest { .. }));
    }

    #[test]
    fn test_caller_policy_allow_lists() {
        assert!(AttachmentKind::Resume.check("cv.pdf").is_ok());
        assert!(AttachmentKind::Resume.check("cv.png").is_err());
        assert!(AttachmentKind::Photo.check("me.jpg").is_ok());
        assert!(AttachmentKind::Logo.check("logo.svg").is_err());
    }

    #[test]
    fn test_asset_ref_pairs_uri_with_name() {
        let asset = StoredAsset::new("data:image/png;base64,AA==", "original name.png");
        assert_eq!(asset.original_filename, "original name.png");
    }
}

// Error handling tests
mod error_tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = PortalError::not_found("Job", "J1");
        let msg = err.to_string();
        assert!(msg.contains("Job"));
        assert!(msg.contains("J1"));
    }

    #[test]
    fn test_duplicate_application_error() {
        let err = PortalError::duplicate("Application", "job", "J1");
        assert!(err.to_string().contains("Application"));
    }

    #[test]
    fn test_invalid_transition_error_names_states() {
        let err = PortalError::invalid_transition("accepted", "rejected");
        let msg = err.to_string();
        assert!(msg.contains("accepted"));
        assert!(msg.contains("rejected"));
    }

    #[test]
    fn test_error_variants_display() {
        let errors = vec![
            PortalError::InvalidCredentials,
            PortalError::TokenExpired,
            PortalError::InvalidToken {
                message: "signature mismatch".to_string(),
            },
            PortalError::validation("bad input"),
            PortalError::unauthorized("no token"),
            PortalError::forbidden("not yours"),
            PortalError::ingest("empty upload"),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}

// TSID generation tests
mod tsid_tests {
    use super::*;

    #[test]
    fn test_tsid_format() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| {
            matches!(c, '0'..='9' | 'A'..='H' | 'J'..='K' | 'M'..='N' | 'P'..='T' | 'V'..='Z')
        }));
    }

    #[test]
    fn test_tsid_uniqueness() {
        let ids: HashSet<String> = (0..1000).map(|_| TsidGenerator::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_tsid_sortability() {
        let id1 = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TsidGenerator::generate();
        assert!(id2 > id1, "id2 ({}) should be greater than id1 ({})", id2, id1);
    }
}

// End-to-end lifecycle against the in-memory domain
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_apply_then_decide_flow() {
        let applicant = student();
        let owner = recruiter();
        let company = Company::new("Initech", &owner.id);
        let job = Job::new(
            "Backend Engineer",
            "desc",
            vec!["rust".to_string()],
            "70k",
            1,
            "Remote",
            JobType::FullTime,
            1,
            &company.id,
            &owner.id,
        )
        .unwrap();

        let mut application = Application::new(&job.id, &applicant.id);
        assert_eq!(application.status, ApplicationStatus::Pending);

        // The recruiter owning the job's company may decide it.
        let ctx = AuthContext {
            identity_id: owner.id.clone(),
            role: Role::Recruiter,
            email: owner.email.clone(),
            fullname: owner.fullname.clone(),
        };
        checks::require_recruiter(&ctx).unwrap();
        checks::require_owner(&ctx, &company.created_by).unwrap();

        application.transition(ApplicationStatus::Accepted).unwrap();
        assert_eq!(application.status, ApplicationStatus::Accepted);

        // A second decision is a reported error, not a silent no-op.
        let err = application
            .transition(ApplicationStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, PortalError::InvalidTransition { .. }));
    }
}
