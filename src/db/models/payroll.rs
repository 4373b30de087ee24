//! Payroll Models
//!
//! Bank details, salary structure, provident fund contributions and tax
//! deductions. All foreign-keyed to the employee ID; bank details are
//! one-per-employee (record key = employee ID).

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Bank account details, one record per employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDetails {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub account_number: String,
    pub bank_name: String,
    pub ifsc_code: String,
    #[serde(default)]
    pub pan_no: Option<String>,
    #[serde(default)]
    pub uan_no: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for bank details (hr/admin)
#[derive(Debug, Clone, Deserialize)]
pub struct BankDetailsUpsert {
    pub account_number: String,
    pub bank_name: String,
    pub ifsc_code: String,
    #[serde(default)]
    pub pan_no: Option<String>,
    #[serde(default)]
    pub uan_no: Option<String>,
    #[serde(default)]
    pub branch_name: Option<String>,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// Salary structure; at most one active row per employee at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStructure {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub monthly_wage: Decimal,
    pub no_of_working_days_in_week: u32,
    pub standard_allowance: Decimal,
    pub fixed_allowance: Decimal,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Create payload for a new salary structure (hr/admin)
#[derive(Debug, Clone, Deserialize)]
pub struct SalaryStructureCreate {
    pub monthly_wage: Decimal,
    #[serde(default = "default_working_days")]
    pub no_of_working_days_in_week: u32,
    #[serde(default = "default_standard_allowance")]
    pub standard_allowance: Decimal,
    #[serde(default)]
    pub fixed_allowance: Decimal,
    pub effective_from: NaiveDate,
}

fn default_working_days() -> u32 {
    5
}

fn default_standard_allowance() -> Decimal {
    // 4167.00
    Decimal::new(416_700, 2)
}

/// Monthly provident fund contribution, unique per (employee, month, year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PfContribution {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub month: u32,
    pub year: i32,
    pub basic_salary: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_processed: bool,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record payload for a PF contribution (hr/admin)
#[derive(Debug, Clone, Deserialize)]
pub struct PfContributionCreate {
    pub month: u32,
    pub year: i32,
    pub basic_salary: Decimal,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

/// Monthly tax deduction, unique per (employee, month, year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxDeduction {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub month: u32,
    pub year: i32,
    pub monthly_tax_deduction: Decimal,
    pub professional_tax: Decimal,
    pub tds_deduction: Decimal,
    pub other_deductions: Decimal,
    #[serde(default)]
    pub deduction_remarks: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Record payload for a tax deduction (hr/admin)
#[derive(Debug, Clone, Deserialize)]
pub struct TaxDeductionCreate {
    pub month: u32,
    pub year: i32,
    #[serde(default = "default_monthly_tax")]
    pub monthly_tax_deduction: Decimal,
    #[serde(default)]
    pub professional_tax: Decimal,
    #[serde(default)]
    pub tds_deduction: Decimal,
    #[serde(default)]
    pub other_deductions: Decimal,
    #[serde(default)]
    pub deduction_remarks: Option<String>,
}

fn default_monthly_tax() -> Decimal {
    // 200.00
    Decimal::new(20_000, 2)
}
