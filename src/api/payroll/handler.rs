//! Payroll API Handlers
//!
//! Bank details, salary structure, PF contributions and tax deductions.
//! Reads are self-or-hr/admin; writes are hr/admin (gated at the router).

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::CurrentEmployee;
use crate::core::ServerState;
use crate::db::models::{
    BankDetails, BankDetailsUpsert, PfContribution, PfContributionCreate, SalaryStructure,
    SalaryStructureCreate, TaxDeduction, TaxDeductionCreate,
};
use crate::db::repository::{EmployeeRepository, PayrollRepository};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// 404 unless the employee exists
async fn ensure_employee(state: &ServerState, emp_id: &str) -> AppResult<()> {
    let repo = EmployeeRepository::new(state.db.clone());
    if repo.find_by_emp_id(emp_id).await?.is_none() {
        return Err(AppError::not_found(format!("Employee {emp_id} not found")));
    }
    Ok(())
}

fn ensure_access(current: &CurrentEmployee, emp_id: &str) -> AppResult<()> {
    if !current.can_access(emp_id) {
        return Err(AppError::forbidden("Not enough permissions"));
    }
    Ok(())
}

// ── Bank details ────────────────────────────────────────────────────

pub async fn get_bank_details(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<BankDetails>> {
    ensure_access(&current, &emp_id)?;
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    let details = repo
        .bank_details_for(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No bank details for {emp_id}")))?;
    Ok(Json(details))
}

pub async fn put_bank_details(
    State(state): State<ServerState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<BankDetailsUpsert>,
) -> AppResult<Json<BankDetails>> {
    validate_required_text(&payload.account_number, "account_number", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.bank_name, "bank_name", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.ifsc_code, "ifsc_code", 11)?;
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    let details = repo.upsert_bank_details(&emp_id, payload).await?;
    Ok(Json(details))
}

// ── Salary structure ────────────────────────────────────────────────

pub async fn get_salary(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<SalaryStructure>> {
    ensure_access(&current, &emp_id)?;
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    let salary = repo
        .active_salary_for(&emp_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No salary structure for {emp_id}")))?;
    Ok(Json(salary))
}

pub async fn create_salary(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
    Json(payload): Json<SalaryStructureCreate>,
) -> AppResult<Json<SalaryStructure>> {
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    let salary = repo.create_salary(&emp_id, payload).await?;

    tracing::info!(emp_id = %emp_id, set_by = %current.emp_id, "Salary structure installed");
    Ok(Json(salary))
}

// ── PF contributions ────────────────────────────────────────────────

pub async fn list_pf(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Vec<PfContribution>>> {
    ensure_access(&current, &emp_id)?;
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    Ok(Json(repo.pf_contributions_for(&emp_id).await?))
}

pub async fn record_pf(
    State(state): State<ServerState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<PfContributionCreate>,
) -> AppResult<Json<PfContribution>> {
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    Ok(Json(repo.record_pf_contribution(&emp_id, payload).await?))
}

// ── Tax deductions ──────────────────────────────────────────────────

pub async fn list_tax(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentEmployee>,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Vec<TaxDeduction>>> {
    ensure_access(&current, &emp_id)?;
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    Ok(Json(repo.tax_deductions_for(&emp_id).await?))
}

pub async fn record_tax(
    State(state): State<ServerState>,
    Path(emp_id): Path<String>,
    Json(payload): Json<TaxDeductionCreate>,
) -> AppResult<Json<TaxDeduction>> {
    ensure_employee(&state, &emp_id).await?;

    let repo = PayrollRepository::new(state.db.clone());
    Ok(Json(repo.record_tax_deduction(&emp_id, payload).await?))
}
