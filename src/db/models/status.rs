//! Employee Status Tracker Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Where the employee currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    InOffice,
    OnLeave,
    Absent,
}

/// Dashboard indicator paired with the presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIndicator {
    Green,
    Airplane,
    Yellow,
}

/// Live presence tracker, exactly one per employee.
///
/// The record key is the employee ID, which is what enforces the
/// one-tracker-per-employee rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTracker {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub current_status: PresenceStatus,
    pub status_indicator: StatusIndicator,
    #[serde(default)]
    pub last_check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_check_out: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl StatusTracker {
    /// Initial tracker state for a new hire: absent/yellow until the
    /// first check-in.
    pub fn initial(emp_id: &str) -> Self {
        Self {
            id: None,
            emp_id: emp_id.to_string(),
            current_status: PresenceStatus::Absent,
            status_indicator: StatusIndicator::Yellow,
            last_check_in: None,
            last_check_out: None,
            updated_at: Utc::now(),
        }
    }
}
