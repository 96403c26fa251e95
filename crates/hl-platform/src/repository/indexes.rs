//! Index Setup
//!
//! Creates the indexes the invariants depend on. Run once at startup,
//! before the server accepts traffic.

use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};
use tracing::info;

use crate::domain::{Application, Company, Identity, Job};
use crate::error::Result;

pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique = IndexOptions::builder().unique(true).build();

    db.collection::<Identity>("identities")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique.clone())
                .build(),
        )
        .await?;

    db.collection::<Company>("companies")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(unique.clone())
                .build(),
        )
        .await?;

    // The at-most-one-application-per-(job, applicant) invariant lives here.
    db.collection::<Application>("applications")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "jobId": 1, "applicantId": 1 })
                .options(unique)
                .build(),
        )
        .await?;

    db.collection::<Application>("applications")
        .create_index(IndexModel::builder().keys(doc! { "applicantId": 1 }).build())
        .await?;

    db.collection::<Job>("jobs")
        .create_index(IndexModel::builder().keys(doc! { "createdBy": 1 }).build())
        .await?;

    db.collection::<Company>("companies")
        .create_index(IndexModel::builder().keys(doc! { "createdBy": 1 }).build())
        .await?;

    info!("Indexes ensured");
    Ok(())
}
