//! Job Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::domain::Job;
use crate::error::Result;

pub struct JobRepository {
    collection: Collection<Job>,
}

impl JobRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("jobs"),
        }
    }

    pub async fn insert(&self, job: &Job) -> Result<()> {
        self.collection.insert_one(job).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Keyword filter over title/description, case-insensitive substring
    /// match pushed down to the store. An empty keyword returns everything.
    pub async fn search(&self, keyword: &str) -> Result<Vec<Job>> {
        let filter = if keyword.is_empty() {
            doc! {}
        } else {
            doc! {
                "$or": [
                    { "title": { "$regex": keyword, "$options": "i" } },
                    { "description": { "$regex": keyword, "$options": "i" } },
                ]
            }
        };
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_by_creator(&self, identity_id: &str) -> Result<Vec<Job>> {
        let cursor = self
            .collection
            .find(doc! { "createdBy": identity_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, job: &Job) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &job.id }, job)
            .await?;
        Ok(())
    }

    /// Append an application id to the job's denormalized applications
    /// cache. A failure here after the application insert is tolerated: the
    /// cache is rebuildable from the applications collection.
    pub async fn push_application(&self, job_id: &str, application_id: &str) -> Result<()> {
        self.collection
            .update_one(
                doc! { "_id": job_id },
                doc! { "$push": { "applications": application_id } },
            )
            .await?;
        Ok(())
    }
}
