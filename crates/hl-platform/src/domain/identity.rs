//! Identity and Profile Entities
//!
//! A registered user is either a student (applicant) or a recruiter. The
//! role is fixed at registration; the profile sub-document carries the
//! role-conditional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::asset::StoredAsset;

/// User role, immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Recruiter => "recruiter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Role::Student),
            "recruiter" => Some(Role::Recruiter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-conditional profile sub-document.
///
/// Student-only: bio, skills, resume. Recruiter-only: company_id.
/// Either role: profile_photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    /// Asset URI of the ingested resume.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,

    /// Display name of the uploaded resume file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_original_name: Option<String>,

    /// Asset URI of the ingested profile photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,

    /// Company owned by this recruiter, set when the first company is
    /// registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

impl Profile {
    /// Normalize a delimiter-separated skills string into an ordered list
    /// of trimmed, non-empty tokens.
    pub fn normalize_skills(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub fullname: String,

    /// Globally unique, stored trimmed and lowercased.
    pub email: String,

    pub phone_number: String,

    /// Argon2id PHC string; never serialized to API responses.
    pub password_hash: String,

    pub role: Role,

    #[serde(default)]
    pub profile: Profile,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        fullname: impl Into<String>,
        email: &str,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::TsidGenerator::generate(),
            fullname: fullname.into(),
            email: Self::normalize_email(email),
            phone_number: phone_number.into(),
            password_hash: password_hash.into(),
            role,
            profile: Profile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Case-normalized form used for the uniqueness check.
    pub fn normalize_email(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_recruiter(&self) -> bool {
        self.role == Role::Recruiter
    }

    /// Shallow-merge a profile update into this identity.
    ///
    /// An omitted field (None) leaves the stored value unchanged; a supplied
    /// empty value overwrites with that empty value. The update variant is
    /// selected from the caller's role at the boundary, so student-only
    /// fields supplied by a recruiter never reach this merge.
    pub fn apply_update(&mut self, update: ProfileUpdate) {
        match update {
            ProfileUpdate::Student(u) => {
                if let Some(fullname) = u.fullname {
                    self.fullname = fullname;
                }
                if let Some(email) = u.email {
                    self.email = Self::normalize_email(&email);
                }
                if let Some(phone) = u.phone_number {
                    self.phone_number = phone;
                }
                if let Some(bio) = u.bio {
                    self.profile.bio = Some(bio);
                }
                if let Some(skills) = u.skills {
                    self.profile.skills = skills;
                }
                if let Some(resume) = u.resume {
                    self.profile.resume = Some(resume.uri);
                    self.profile.resume_original_name = Some(resume.original_filename);
                }
                if let Some(photo) = u.profile_photo {
                    self.profile.profile_photo = Some(photo.uri);
                }
            }
            ProfileUpdate::Recruiter(u) => {
                if let Some(email) = u.email {
                    self.email = Self::normalize_email(&email);
                }
                if let Some(phone) = u.phone_number {
                    self.phone_number = phone;
                }
                if let Some(photo) = u.profile_photo {
                    self.profile.profile_photo = Some(photo.uri);
                }
            }
        }
        self.updated_at = Utc::now();
    }
}

/// Partial profile update, split by role at the request boundary.
///
/// The split makes the silent-drop behavior of the uniform update endpoint
/// explicit: a recruiter request simply has nowhere to put bio/skills/resume.
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    Student(StudentProfileUpdate),
    Recruiter(RecruiterProfileUpdate),
}

#[derive(Debug, Clone, Default)]
pub struct StudentProfileUpdate {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    /// Already-normalized skill tokens.
    pub skills: Option<Vec<String>>,
    pub resume: Option<StoredAsset>,
    pub profile_photo: Option<StoredAsset>,
}

#[derive(Debug, Clone, Default)]
pub struct RecruiterProfileUpdate {
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub profile_photo: Option<StoredAsset>,
}
