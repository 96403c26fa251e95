//! Dev Data Seeder
//!
//! Seeds a demo recruiter, student, company, and job for local
//! development. Skipped when the demo recruiter already exists.

use mongodb::Database;
use tracing::info;

use crate::domain::{Company, Identity, Job, JobType, Role};
use crate::error::Result;
use crate::repository::{CompanyRepository, IdentityRepository, JobRepository};
use crate::service::PasswordService;

const DEMO_RECRUITER_EMAIL: &str = "recruiter@hirelane.dev";
const DEMO_STUDENT_EMAIL: &str = "student@hirelane.dev";
const DEMO_PASSWORD: &str = "password123";

pub struct DevDataSeeder {
    db: Database,
}

impl DevDataSeeder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn seed(&self) -> Result<()> {
        let identity_repo = IdentityRepository::new(&self.db);
        let company_repo = CompanyRepository::new(&self.db);
        let job_repo = JobRepository::new(&self.db);
        let password_service = PasswordService::default();

        if identity_repo.exists_by_email(DEMO_RECRUITER_EMAIL).await? {
            info!("dev data already present, skipping seed");
            return Ok(());
        }

        let hash = password_service.hash_password(DEMO_PASSWORD)?;

        let recruiter = Identity::new(
            "Demo Recruiter",
            DEMO_RECRUITER_EMAIL,
            "555-0100",
            hash.clone(),
            Role::Recruiter,
        );
        identity_repo.insert(&recruiter).await?;

        let mut student = Identity::new(
            "Demo Student",
            DEMO_STUDENT_EMAIL,
            "555-0101",
            hash,
            Role::Student,
        );
        student.profile.bio = Some("Final-year CS student".to_string());
        student.profile.skills = vec!["rust".to_string(), "mongodb".to_string()];
        identity_repo.insert(&student).await?;

        let mut company = Company::new("HireLane Demo Co", &recruiter.id);
        company.location = Some("Remote".to_string());
        company_repo.insert(&company).await?;
        identity_repo.set_company(&recruiter.id, &company.id).await?;

        let job = Job::new(
            "Backend Engineer",
            "Build and operate the ingestion pipeline.",
            vec!["rust".to_string(), "mongodb".to_string()],
            "70k-90k",
            2,
            "Remote",
            JobType::FullTime,
            2,
            &company.id,
            &recruiter.id,
        )?;
        job_repo.insert(&job).await?;

        info!(
            recruiter = DEMO_RECRUITER_EMAIL,
            student = DEMO_STUDENT_EMAIL,
            "dev data seeded"
        );
        Ok(())
    }
}
