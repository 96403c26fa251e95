//! Company Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recruiter-owned organization. Ownership is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique company name.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Asset URI of the ingested logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Owning recruiter, immutable.
    pub created_by: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: impl Into<String>, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: crate::TsidGenerator::generate(),
            name: name.into(),
            description: None,
            website: None,
            location: None,
            logo: None,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, identity_id: &str) -> bool {
        self.created_by == identity_id
    }

    /// Partial update: only supplied fields overwrite.
    pub fn apply_update(&mut self, update: CompanyUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(website) = update.website {
            self.website = Some(website);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(logo) = update.logo {
            self.logo = Some(logo);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership() {
        let company = Company::new("Initech", "recruiter-1");
        assert!(company.is_owned_by("recruiter-1"));
        assert!(!company.is_owned_by("recruiter-2"));
    }

    #[test]
    fn test_partial_update() {
        let mut company = Company::new("Initech", "recruiter-1");
        company.apply_update(CompanyUpdate {
            location: Some("Austin, TX".to_string()),
            ..Default::default()
        });
        assert_eq!(company.name, "Initech");
        assert_eq!(company.location.as_deref(), Some("Austin, TX"));
        assert!(company.description.is_none());
    }
}
