//! Repository Module
//!
//! CRUD and workflow operations over the SurrealDB tables. Repositories are
//! thin: they own no state beyond a database handle and translate store
//! errors into [`RepoError`].

pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod timeoff;

// Re-exports
pub use attendance::AttendanceRepository;
pub use employee::EmployeeRepository;
pub use payroll::PayrollRepository;
pub use timeoff::TimeOffRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Capacity exhausted: {0}")]
    Capacity(String),

    #[error("Contention: {0}")]
    Contention(String),

    #[error("Business rule: {0}")]
    BusinessRule(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Capacity(msg) => AppError::Capacity(msg),
            RepoError::Contention(msg) => AppError::Conflict(msg),
            RepoError::BusinessRule(msg) => AppError::BusinessRule(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
