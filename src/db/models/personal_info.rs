//! Employee Personal Info Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Self-described profile details, one record per employee
/// (record key = employee ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub emp_id: String,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub interests_and_hobbies: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub residing_address: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub personal_email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for personal info
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalInfoUpsert {
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub interests_and_hobbies: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub residing_address: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub personal_email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
}
