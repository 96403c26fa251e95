//! Identity Repository

use mongodb::{bson::doc, Collection, Database};

use crate::domain::Identity;
use crate::error::{PortalError, Result};

pub struct IdentityRepository {
    collection: Collection<Identity>,
}

impl IdentityRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("identities"),
        }
    }

    /// Insert a new identity. The unique index on `email` makes the
    /// registration check-then-insert atomic; a duplicate-key violation
    /// surfaces as a conflict, never as a second success.
    pub async fn insert(&self, identity: &Identity) -> Result<()> {
        self.collection.insert_one(identity).await.map_err(|e| {
            if PortalError::is_duplicate_key(&e) {
                PortalError::duplicate("Identity", "email", &identity.email)
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Identity>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let normalized = Identity::normalize_email(email);
        Ok(self.collection.find_one(doc! { "email": normalized }).await?)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let normalized = Identity::normalize_email(email);
        let count = self
            .collection
            .count_documents(doc! { "email": normalized })
            .await?;
        Ok(count > 0)
    }

    /// Single-document atomic write of the whole identity.
    pub async fn update(&self, identity: &Identity) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &identity.id }, identity)
            .await
            .map_err(|e| {
                if PortalError::is_duplicate_key(&e) {
                    PortalError::duplicate("Identity", "email", &identity.email)
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Record the company a recruiter owns on their profile.
    pub async fn set_company(&self, identity_id: &str, company_id: &str) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": identity_id },
                doc! { "$set": { "profile.companyId": company_id } },
            )
            .await?;
        Ok(())
    }
}
