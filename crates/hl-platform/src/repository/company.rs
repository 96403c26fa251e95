//! Company Repository

use futures::TryStreamExt;
use mongodb::{bson::doc, Collection, Database};

use crate::domain::Company;
use crate::error::{PortalError, Result};

pub struct CompanyRepository {
    collection: Collection<Company>,
}

impl CompanyRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("companies"),
        }
    }

    pub async fn insert(&self, company: &Company) -> Result<()> {
        self.collection.insert_one(company).await.map_err(|e| {
            if PortalError::is_duplicate_key(&e) {
                PortalError::duplicate("Company", "name", &company.name)
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    pub async fn find_by_owner(&self, identity_id: &str) -> Result<Vec<Company>> {
        let cursor = self
            .collection
            .find(doc! { "createdBy": identity_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_by_owner(&self, identity_id: &str) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "createdBy": identity_id })
            .await?)
    }

    pub async fn update(&self, company: &Company) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &company.id }, company)
            .await
            .map_err(|e| {
                if PortalError::is_duplicate_key(&e) {
                    PortalError::duplicate("Company", "name", &company.name)
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }
}
