//! HireLane Platform
//!
//! Core platform providing:
//! - Identity management for students and recruiters
//! - Role-scoped authorization with ownership checks
//! - Company and job posting lifecycle
//! - Job application state machine (pending → accepted/rejected)
//! - Binary attachment ingestion (resume, profile photo, company logo)

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod error;
pub mod seed;
pub mod tsid;

pub use domain::*;
pub use error::PortalError;
pub use tsid::TsidGenerator;
