//! Repository Layer
//!
//! MongoDB repositories for all domain entities.

pub mod application;
pub mod company;
pub mod identity;
pub mod indexes;
pub mod job;

pub use application::ApplicationRepository;
pub use company::CompanyRepository;
pub use identity::IdentityRepository;
pub use indexes::ensure_indexes;
pub use job::JobRepository;
