//! Attendance API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentEmployee;
use crate::core::ServerState;
use crate::db::models::Attendance;
use crate::db::repository::{AttendanceRepository, EmployeeRepository};
use crate::utils::{AppError, AppResult};

/// Check in for today (always the caller's own record)
pub async fn check_in(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
) -> AppResult<Json<Attendance>> {
    let repo = AttendanceRepository::new(state.db.clone());
    let attendance = repo.check_in(&current.emp_id).await?;

    tracing::info!(emp_id = %current.emp_id, "Checked in");
    Ok(Json(attendance))
}

/// Check out for today; worked hours are measured against the caller's
/// schedule
pub async fn check_out(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
) -> AppResult<Json<Attendance>> {
    let employees = EmployeeRepository::new(state.db.clone());
    let schedule = employees.schedule_for(&current.emp_id).await?;

    let repo = AttendanceRepository::new(state.db.clone());
    let attendance = repo.check_out(&current.emp_id, schedule.as_ref()).await?;

    tracing::info!(emp_id = %current.emp_id, "Checked out");
    Ok(Json(attendance))
}

/// Attendance history for an employee (self or hr/admin)
pub async fn list_for_employee(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Vec<Attendance>>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let employees = EmployeeRepository::new(state.db.clone());
    if employees.find_by_emp_id(&emp_id).await?.is_none() {
        return Err(AppError::not_found(format!("Employee {emp_id} not found")));
    }

    let repo = AttendanceRepository::new(state.db.clone());
    Ok(Json(repo.find_for_employee(&emp_id).await?))
}
