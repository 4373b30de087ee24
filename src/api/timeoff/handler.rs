//! Time Off API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{Datelike, Utc};

use crate::auth::CurrentEmployee;
use crate::core::ServerState;
use crate::db::models::{TimeOffApproval, TimeOffBalance, TimeOffRequest, TimeOffRequestCreate};
use crate::db::repository::TimeOffRepository;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// File a time-off request for the caller
pub async fn file_request(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Json(payload): Json<TimeOffRequestCreate>,
) -> AppResult<Json<TimeOffRequest>> {
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let repo = TimeOffRepository::new(state.db.clone());
    let request = repo.file_request(&current.emp_id, payload).await?;

    tracing::info!(
        emp_id = %current.emp_id,
        days = %request.total_days,
        "Time-off request filed"
    );
    Ok(Json(request))
}

/// List requests: hr/admin see all, everyone else their own
pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
) -> AppResult<Json<Vec<TimeOffRequest>>> {
    let repo = TimeOffRepository::new(state.db.clone());
    let requests = if current.can_manage() {
        repo.find_all().await?
    } else {
        repo.find_for_employee(&current.emp_id).await?
    };
    Ok(Json(requests))
}

/// Approve or reject a pending request (hr/admin only, never one's own)
pub async fn decide(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(request_id): Path<String>,
    Json(payload): Json<TimeOffApproval>,
) -> AppResult<Json<TimeOffRequest>> {
    validate_optional_text(&payload.approval_comments, "approval_comments", MAX_NOTE_LEN)?;

    let repo = TimeOffRepository::new(state.db.clone());
    let request = repo
        .find_by_id(&request_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Request {request_id} not found")))?;

    if request.emp_id == current.emp_id {
        return Err(AppError::forbidden(
            "You cannot decide your own time-off request",
        ));
    }

    let decided = repo
        .decide(
            &request_id,
            &current.emp_id,
            payload.approve,
            payload.approval_comments,
        )
        .await?;

    tracing::info!(
        request_id = %request_id,
        emp_id = %decided.emp_id,
        approved = payload.approve,
        decided_by = %current.emp_id,
        "Time-off request decided"
    );
    Ok(Json(decided))
}

/// Current-year leave balance for an employee (self or hr/admin)
pub async fn get_balance(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<TimeOffBalance>> {
    if !current.can_access(&emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }

    let year = Utc::now().year();
    let repo = TimeOffRepository::new(state.db.clone());
    let balance = repo
        .balance_for(&emp_id, year)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No leave balance for {emp_id} in {year}")))?;
    Ok(Json(balance))
}
