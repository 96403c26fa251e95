//! Job Posting Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PortalError, Result};

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[serde(rename = "Internship")]
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posting owned by a company and created by a recruiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,
    pub description: String,

    #[serde(default)]
    pub requirements: Vec<String>,

    /// Free-form so both plain figures and ranges round-trip.
    pub salary: String,

    /// Required experience, in years.
    pub experience_level: u32,

    pub location: String,
    pub job_type: JobType,

    /// Number of open positions, at least 1.
    pub positions: u32,

    /// Must resolve to a company owned by `created_by`.
    pub company_id: String,

    /// Posting recruiter.
    pub created_by: String,

    /// Denormalized cache of application ids. Rebuildable from the
    /// applications collection; never the source of truth for existence.
    #[serde(default)]
    pub applications: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        requirements: Vec<String>,
        salary: impl Into<String>,
        experience_level: u32,
        location: impl Into<String>,
        job_type: JobType,
        positions: u32,
        company_id: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Result<Self> {
        if positions == 0 {
            return Err(PortalError::validation("positions must be at least 1"));
        }
        let now = Utc::now();
        Ok(Self {
            id: crate::TsidGenerator::generate(),
            title: title.into(),
            description: description.into(),
            requirements,
            salary: salary.into(),
            experience_level,
            location: location.into(),
            job_type,
            positions,
            company_id: company_id.into(),
            created_by: created_by.into(),
            applications: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Normalize a comma-separated requirements string into an ordered list
    /// of trimmed, non-empty tokens.
    pub fn normalize_requirements(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn is_posted_by(&self, identity_id: &str) -> bool {
        self.created_by == identity_id
    }

    /// Case-insensitive substring match over title and description. The
    /// repository pushes the same predicate into the store as a regex; this
    /// form exists for in-process filtering and tests.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        if keyword.is_empty() {
            return true;
        }
        let needle = keyword.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Partial update: only supplied fields overwrite.
    pub fn apply_update(&mut self, update: JobUpdate) -> Result<()> {
        if let Some(positions) = update.positions {
            if positions == 0 {
                return Err(PortalError::validation("positions must be at least 1"));
            }
            self.positions = positions;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(requirements) = update.requirements {
            self.requirements = requirements;
        }
        if let Some(salary) = update.salary {
            self.salary = salary;
        }
        if let Some(experience_level) = update.experience_level {
            self.experience_level = experience_level;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(job_type) = update.job_type {
            self.job_type = job_type;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub salary: Option<String>,
    pub experience_level: Option<u32>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub positions: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new(
            "Backend Engineer",
            "Own the ingestion pipeline",
            vec!["rust".to_string()],
            "70k-90k",
            3,
            "Remote",
            JobType::FullTime,
            2,
            "company-1",
            "recruiter-1",
        )
        .unwrap()
    }

    #[test]
    fn test_zero_positions_rejected() {
        let err = Job::new(
            "x", "y", vec![], "0", 0, "z", JobType::Contract, 0, "c", "r",
        )
        .unwrap_err();
        assert!(matches!(err, PortalError::Validation { .. }));
    }

    #[test]
    fn test_requirements_normalization() {
        assert_eq!(
            Job::normalize_requirements("rust, axum , ,mongodb"),
            vec!["rust", "axum", "mongodb"]
        );
        assert!(Job::normalize_requirements("").is_empty());
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let job = job();
        assert!(job.matches_keyword("backend"));
        assert!(job.matches_keyword("INGESTION"));
        assert!(job.matches_keyword(""));
        assert!(!job.matches_keyword("frontend"));
    }

    #[test]
    fn test_partial_update_keeps_omitted_fields() {
        let mut job = job();
        job.apply_update(JobUpdate {
            salary: Some("95k".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(job.salary, "95k");
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.positions, 2);
    }

    #[test]
    fn test_update_rejects_zero_positions() {
        let mut job = job();
        let err = job
            .apply_update(JobUpdate {
                positions: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, PortalError::Validation { .. }));
        assert_eq!(job.positions, 2);
    }

    #[test]
    fn test_job_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&JobType::FullTime).unwrap(),
            "\"Full-time\""
        );
        let parsed: JobType = serde_json::from_str("\"Internship\"").unwrap();
        assert_eq!(parsed, JobType::Internship);
    }
}
