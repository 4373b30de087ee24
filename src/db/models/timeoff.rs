//! Time Off Models

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Kinds of leave an employee can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffType {
    PaidTimeOff,
    SickLeave,
    UnpaidLeave,
}

/// Review state of a time-off request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Yearly leave allowance, one row per (employee, year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffBalance {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub year: i32,
    pub paid_time_off_total: Decimal,
    pub paid_time_off_used: Decimal,
    pub sick_leave_total: Decimal,
    pub sick_leave_used: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeOffBalance {
    /// Default allowance granted at onboarding: 12 PTO days and 7 sick
    /// days, all available.
    pub fn default_for(emp_id: &str, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            emp_id: emp_id.to_string(),
            year,
            paid_time_off_total: Decimal::from(12),
            paid_time_off_used: Decimal::ZERO,
            sick_leave_total: Decimal::from(7),
            sick_leave_used: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn paid_time_off_available(&self) -> Decimal {
        self.paid_time_off_total - self.paid_time_off_used
    }

    pub fn sick_leave_available(&self) -> Decimal {
        self.sick_leave_total - self.sick_leave_used
    }
}

/// A filed time-off request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRequest {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub time_off_type: TimeOffType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: Decimal,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
    pub status: RequestStatus,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approval_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for filing a request
#[derive(Debug, Clone, Deserialize)]
pub struct TimeOffRequestCreate {
    pub time_off_type: TimeOffType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub attachment: Option<String>,
}

/// Payload for deciding a request (hr/admin)
#[derive(Debug, Clone, Deserialize)]
pub struct TimeOffApproval {
    pub approve: bool,
    #[serde(default)]
    pub approval_comments: Option<String>,
}
