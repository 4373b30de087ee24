//! Attendance Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Day-level attendance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    OnLeave,
}

/// One attendance row per employee per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub attendance_date: NaiveDate,
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
    pub work_hours: Decimal,
    pub extra_hours: Decimal,
    pub status: AttendanceStatus,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_paid: bool,
    #[serde(default)]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Attendance {
    /// Fresh check-in row for the given day.
    pub fn checked_in(emp_id: &str, date: NaiveDate, at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            emp_id: emp_id.to_string(),
            attendance_date: date,
            check_in_time: Some(at),
            check_out_time: None,
            work_hours: Decimal::ZERO,
            extra_hours: Decimal::ZERO,
            status: AttendanceStatus::Present,
            is_paid: true,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }
}
