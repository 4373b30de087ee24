use std::sync::Arc;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::{EmployeeRegistration, Role};
use crate::db::repository::EmployeeRepository;
use crate::utils::AppError;

/// Server state - shared handles to every service
///
/// Cloning is cheap: the database handle and the JWT service are shared
/// references. One instance is built at startup and handed to axum.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize the server state:
    ///
    /// 1. ensure the data directory structure exists
    /// 2. open the database and apply the schema
    /// 3. build the JWT service
    /// 4. onboard the bootstrap admin if the employee table is empty
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)
            .map_err(|e| AppError::internal(format!("Failed to create data directory: {e}")))?;

        let db_service = DbService::new(&db_dir.join("dayflow.db")).await?;
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        let state = Self {
            config: config.clone(),
            db: db_service.db,
            jwt_service,
        };

        state.seed_bootstrap_admin().await?;

        Ok(state)
    }

    /// First boot of an empty instance creates a system admin through the
    /// normal onboarding path. The temporary password is printed to the
    /// log exactly once; there is no other way in.
    async fn seed_bootstrap_admin(&self) -> Result<(), AppError> {
        let repo = EmployeeRepository::new(self.db.clone());
        if repo.count().await? > 0 {
            return Ok(());
        }

        let registration = EmployeeRegistration {
            company_code: self.config.company_code.clone(),
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            email: self.config.admin_email.clone(),
            phone: "0000000000".to_string(),
            role: Role::Admin,
            department: Some("Administration".to_string()),
            manager_id: None,
            location: None,
            date_of_joining: Utc::now().date_naive(),
        };

        let (employee, temp_password) = repo.onboard(registration).await?;

        tracing::warn!(
            emp_id = %employee.emp_id,
            email = %employee.email,
            temporary_password = %temp_password,
            "Bootstrap admin created - log in and change this password now"
        );

        Ok(())
    }
}
