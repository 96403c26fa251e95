//! Application Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::domain::Application;
use crate::error::{PortalError, Result};

pub struct ApplicationRepository {
    collection: Collection<Application>,
}

impl ApplicationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("applications"),
        }
    }

    /// Insert a new application. The unique compound index on
    /// (jobId, applicantId) makes the duplicate check atomic under
    /// concurrent submissions: exactly one insert wins, the rest surface
    /// as a conflict.
    pub async fn insert(&self, application: &Application) -> Result<()> {
        self.collection.insert_one(application).await.map_err(|e| {
            if PortalError::is_duplicate_key(&e) {
                PortalError::duplicate("Application", "job", &application.job_id)
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// All applications for a job, newest first. This query is the source
    /// of truth; the job document's applications array is only a cache.
    pub async fn find_by_job(&self, job_id: &str) -> Result<Vec<Application>> {
        let cursor = self
            .collection
            .find(doc! { "jobId": job_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_applicant(&self, applicant_id: &str) -> Result<Vec<Application>> {
        let cursor = self
            .collection
            .find(doc! { "applicantId": applicant_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn exists_for(&self, job_id: &str, applicant_id: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "jobId": job_id, "applicantId": applicant_id })
            .await?;
        Ok(count > 0)
    }

    pub async fn update(&self, application: &Application) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &application.id }, application)
            .await?;
        Ok(())
    }
}
