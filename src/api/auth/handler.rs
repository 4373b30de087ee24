//! Authentication Handlers
//!
//! Login, logout and current-user lookup.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentEmployee;
use crate::core::ServerState;
use crate::db::models::{Employee, Role};
use crate::db::repository::EmployeeRepository;
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
}

/// Login handler
///
/// Authenticates email/password and returns a bearer token. Failures use a
/// single uniform error so the endpoint cannot be used to probe which
/// emails exist.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.find_by_email(&req.email).await?;

    // Fixed delay before acting on the lookup result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let employee = match employee {
        Some(e) => {
            if !e.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = e
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(target: "security", email = %req.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            e
        }
        None => {
            tracing::warn!(target: "security", email = %req.email, "Login failed - unknown email");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .jwt_service
        .generate_token(&employee.emp_id, &employee.email, employee.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        emp_id = %employee.emp_id,
        role = %employee.role,
        "Employee logged in"
    );

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        role: employee.role,
    }))
}

/// Fresh profile of the calling employee
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
) -> AppResult<Json<Employee>> {
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_emp_id(&current.emp_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
    Ok(Json(employee))
}

/// Logout handler. Tokens are stateless, so this only logs the event; the
/// client discards its token.
pub async fn logout(Extension(current): Extension<CurrentEmployee>) -> AppResult<Json<()>> {
    tracing::info!(emp_id = %current.emp_id, "Employee logged out");
    Ok(Json(()))
}
