//! Working Schedule Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Working schedule owned by one employee, created at onboarding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingSchedule {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    pub total_working_hours: Decimal,
    pub break_time_hours: Decimal,
    pub working_days_per_month: u32,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WorkingSchedule {
    /// The default schedule every new hire starts with:
    /// 8h/day with a 1h break, 22 working days a month.
    pub fn default_for(emp_id: &str, effective_from: NaiveDate) -> Self {
        Self {
            id: None,
            emp_id: emp_id.to_string(),
            total_working_hours: Decimal::from(8),
            break_time_hours: Decimal::from(1),
            working_days_per_month: 22,
            effective_from,
            effective_to: None,
            created_at: Utc::now(),
        }
    }
}
