//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend). One connection handle is shared
//! through [`crate::core::ServerState`]; repositories borrow clones of it.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Index definitions. The store enforces the uniqueness invariants the HR
/// domain depends on; application code only retries or reports conflicts.
const SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS employee_email ON employee FIELDS email UNIQUE;
DEFINE INDEX IF NOT EXISTS attendance_emp_date ON attendance FIELDS emp_id, attendance_date UNIQUE;
DEFINE INDEX IF NOT EXISTS balance_emp_year ON timeoff_balance FIELDS emp_id, year UNIQUE;
DEFINE INDEX IF NOT EXISTS pf_emp_month_year ON pf_contribution FIELDS emp_id, month, year UNIQUE;
DEFINE INDEX IF NOT EXISTS tax_emp_month_year ON tax_deduction FIELDS emp_id, month, year UNIQUE;
"#;

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and apply the schema.
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("dayflow")
            .use_db("hrms")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!("Database ready (embedded RocksDB)");

        Ok(Self { db })
    }
}
