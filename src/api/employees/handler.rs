//! Employee API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentEmployee;
use crate::core::ServerState;
use crate::db::models::{
    Employee, EmployeeRegistration, EmployeeUpdate, PersonalInfo, PersonalInfoUpsert,
    RegisteredEmployee, StatusTracker, WorkingSchedule,
};
use crate::db::repository::{EmployeeRepository, PayrollRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_PHONE_LEN, MAX_SHORT_TEXT_LEN, validate_company_code,
    validate_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

fn validate_registration(data: &EmployeeRegistration) -> AppResult<()> {
    validate_company_code(&data.company_code)?;
    validate_required_text(&data.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&data.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&data.email)?;
    validate_required_text(&data.phone, "phone", MAX_PHONE_LEN)?;
    validate_optional_text(&data.department, "department", MAX_NAME_LEN)?;
    validate_optional_text(&data.location, "location", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}

/// Register a new employee (hr/admin only).
///
/// Returns the persisted employee plus the one-time temporary password.
pub async fn register(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Json(payload): Json<EmployeeRegistration>,
) -> AppResult<Json<RegisteredEmployee>> {
    // The route is already gated, but onboarding is destructive enough to
    // re-check rather than trust the router wiring.
    if !current.can_manage() {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    validate_registration(&payload)?;

    let repo = EmployeeRepository::new(state.db.clone());
    let (employee, temporary_password) = repo.onboard(payload).await?;

    tracing::info!(
        emp_id = %employee.emp_id,
        registered_by = %current.emp_id,
        "Employee onboarded"
    );

    Ok(Json(RegisteredEmployee {
        employee,
        temporary_password,
    }))
}

/// List employees: hr/admin see all active, everyone else sees themselves
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
) -> AppResult<Json<Vec<Employee>>> {
    let repo = EmployeeRepository::new(state.db.clone());

    if current.can_manage() {
        return Ok(Json(repo.find_all().await?));
    }

    let own = repo
        .find_by_emp_id(&current.emp_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;
    Ok(Json(vec![own]))
}

/// Get one employee (self or hr/admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Employee>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_emp_id(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {emp_id} not found")))?;
    Ok(Json(employee))
}

/// Update an employee's profile (hr/admin only)
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    validate_optional_text(&payload.phone, "phone", MAX_PHONE_LEN)?;
    validate_optional_text(&payload.department, "department", MAX_NAME_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.update(&emp_id, payload).await?;

    tracing::info!(emp_id = %emp_id, updated_by = %current.emp_id, "Employee updated");
    Ok(Json(employee))
}

/// Soft-deactivate an employee (hr/admin only)
pub async fn deactivate(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Employee>> {
    if current.emp_id == emp_id {
        return Err(AppError::validation("You cannot deactivate yourself"));
    }

    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo.deactivate(&emp_id).await?;

    tracing::info!(emp_id = %emp_id, deactivated_by = %current.emp_id, "Employee deactivated");
    Ok(Json(employee))
}

/// Get an employee's working schedule (self or hr/admin)
pub async fn get_schedule(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<WorkingSchedule>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let repo = EmployeeRepository::new(state.db.clone());
    let schedule = repo
        .schedule_for(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No schedule for {emp_id}")))?;
    Ok(Json(schedule))
}

/// Get an employee's live status tracker (self or hr/admin)
pub async fn get_status(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<StatusTracker>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let repo = EmployeeRepository::new(state.db.clone());
    let status = repo
        .status_for(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No status tracker for {emp_id}")))?;
    Ok(Json(status))
}

/// Get an employee's personal info (self or hr/admin)
pub async fn get_personal_info(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<PersonalInfo>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let repo = PayrollRepository::new(state.db.clone());
    let info = repo
        .personal_info_for(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No personal info for {emp_id}")))?;
    Ok(Json(info))
}

/// Create or replace an employee's personal info (self or hr/admin)
pub async fn put_personal_info(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
    Json(payload): Json<PersonalInfoUpsert>,
) -> AppResult<Json<PersonalInfo>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    validate_optional_text(&payload.about, "about", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.skills, "skills", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.residing_address, "residing_address", MAX_NOTE_LEN)?;

    let employees = EmployeeRepository::new(state.db.clone());
    if employees.find_by_emp_id(&emp_id).await?.is_none() {
        return Err(AppError::not_found(format!("Employee {emp_id} not found")));
    }

    let repo = PayrollRepository::new(state.db.clone());
    let info = repo.upsert_personal_info(&emp_id, payload).await?;
    Ok(Json(info))
}
