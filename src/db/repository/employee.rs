//! Employee Repository
//!
//! Owns the employee lifecycle: ID allocation, onboarding (the atomic
//! creation of an employee plus its dependent records), lookups, profile
//! updates and soft deactivation.

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::generate_temp_password;
use crate::db::models::{
    Employee, EmployeeRegistration, EmployeeUpdate, StatusTracker, TimeOffBalance, WorkingSchedule,
};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal, engine::local::Db};

/// Bounded retries when two registrations race for the same ID prefix.
/// The store rejects the second `CREATE employee:⟨id⟩`; we regenerate and
/// try again before giving up.
const MAX_ID_RETRIES: usize = 3;

/// Serials are four digits within a prefix; 9999 is a hard cap.
const MAX_SERIAL: u32 = 9999;

// ── Pure ID composition ─────────────────────────────────────────────

/// Two-letter name code: uppercased ASCII letters, padded with 'X' for
/// names that are too short (or contain no usable letters at all).
fn name_code(name: &str) -> String {
    let mut code: String = name
        .chars()
        .flat_map(|c| c.to_uppercase())
        .filter(|c| c.is_ascii_alphabetic())
        .take(2)
        .collect();
    while code.len() < 2 {
        code.push('X');
    }
    code
}

/// Allocation key: company code + 2-letter first/last name codes + year.
/// `"AB"/"John"/"Doe"/2024` → `"ABJODO2024"`.
pub fn id_prefix(company_code: &str, first_name: &str, last_name: &str, year: i32) -> String {
    format!(
        "{}{}{}{}",
        company_code.to_uppercase(),
        name_code(first_name),
        name_code(last_name),
        year
    )
}

/// Parse the trailing serial of the greatest existing ID and step it.
/// No existing ID starts the sequence at 1.
fn next_serial(last_emp_id: Option<&str>) -> RepoResult<u32> {
    let next = match last_emp_id {
        None => 1,
        Some(id) => {
            let tail = id
                .len()
                .checked_sub(4)
                .map(|cut| &id[cut..])
                .ok_or_else(|| RepoError::Database(format!("Malformed employee ID: {id}")))?;
            let serial: u32 = tail
                .parse()
                .map_err(|_| RepoError::Database(format!("Malformed employee ID: {id}")))?;
            serial + 1
        }
    };
    if next > MAX_SERIAL {
        return Err(RepoError::Capacity(
            "Employee ID serial space exhausted for this prefix".to_string(),
        ));
    }
    Ok(next)
}

fn compose_emp_id(prefix: &str, serial: u32) -> String {
    format!("{prefix}{serial:04}")
}

// ── Write-failure classification ────────────────────────────────────

/// What went wrong inside the onboarding transaction. The store reports
/// constraint violations as strings; the index/record names tell the two
/// races apart.
enum OnboardWriteError {
    EmailTaken,
    IdTaken,
    Other(RepoError),
}

/// Classify the statement errors of a cancelled transaction. A statement
/// that fails cancels the whole transaction and the *other* statements
/// report a generic "failed transaction" error, so every message has to be
/// scanned for the real cause.
fn classify_write_errors(messages: &[String]) -> OnboardWriteError {
    if messages.iter().any(|m| m.contains("employee_email")) {
        OnboardWriteError::EmailTaken
    } else if messages.iter().any(|m| m.contains("already exists")) {
        OnboardWriteError::IdTaken
    } else {
        OnboardWriteError::Other(RepoError::Database(messages.join("; ")))
    }
}

// ── Repository ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct EmpIdRow {
    emp_id: String,
}

#[derive(Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Serialize)]
struct EmployeeMerge {
    #[serde(flatten)]
    data: EmployeeUpdate,
    updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EmployeeRepository {
    base: BaseRepository,
}

impl EmployeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active employees
    pub async fn find_all(&self) -> RepoResult<Vec<Employee>> {
        let employees: Vec<Employee> = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE is_active = true ORDER BY emp_id")
            .await?
            .take(0)?;
        Ok(employees)
    }

    /// Find employee by employee ID
    pub async fn find_by_emp_id(&self, emp_id: &str) -> RepoResult<Option<Employee>> {
        let rid = RecordId::from_table_key("employee", emp_id);
        let employee: Option<Employee> = self.base.db().select(rid).await?;
        Ok(employee)
    }

    /// Find employee by login email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let email = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM employee WHERE email = $email")
            .bind(("email", email))
            .await?;
        let employees: Vec<Employee> = result.take(0)?;
        Ok(employees.into_iter().next())
    }

    /// Total number of employee records, active or not
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM employee GROUP ALL")
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Allocate the next employee ID for the given prefix key.
    ///
    /// Reads the greatest existing ID sharing the prefix and steps its
    /// serial. Concurrent callers can compute the same ID; the keyed
    /// `CREATE` in [`onboard`](Self::onboard) is what actually arbitrates.
    pub async fn next_employee_id(
        &self,
        company_code: &str,
        first_name: &str,
        last_name: &str,
        year: i32,
    ) -> RepoResult<String> {
        let prefix = id_prefix(company_code, first_name, last_name, year);
        let bind_prefix = prefix.clone();
        let mut result = self
            .base
            .db()
            .query("SELECT emp_id FROM employee WHERE string::startsWith(emp_id, $prefix)")
            .bind(("prefix", bind_prefix))
            .await?;
        // Max is taken client-side; prefix sets are tiny and the embedded
        // engine has mis-ordered ORDER BY ... LIMIT results before.
        let rows: Vec<EmpIdRow> = result.take(0)?;
        let last = rows.iter().map(|r| r.emp_id.as_str()).max();
        let serial = next_serial(last)?;
        Ok(compose_emp_id(&prefix, serial))
    }

    /// Onboard a new employee: allocate an ID, issue a temporary credential
    /// and create the employee row together with its working schedule,
    /// current-year leave balance and status tracker in one transaction.
    ///
    /// Returns the persisted employee and the one-time plaintext password.
    pub async fn onboard(&self, data: EmployeeRegistration) -> RepoResult<(Employee, String)> {
        // Fast-path duplicate check; the unique email index inside the
        // transaction closes the race window.
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }

        // A manager reference must point at a real employee
        if let Some(manager_id) = &data.manager_id
            && self.find_by_emp_id(manager_id).await?.is_none()
        {
            return Err(RepoError::Validation(format!(
                "Manager '{manager_id}' does not exist"
            )));
        }

        let temp_password = generate_temp_password();
        let password_hash = Employee::hash_password(&temp_password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

        let year = Utc::now().year();
        for attempt in 1..=MAX_ID_RETRIES {
            let emp_id = self
                .next_employee_id(&data.company_code, &data.first_name, &data.last_name, year)
                .await?;

            match self.write_onboarding(&data, &emp_id, &password_hash, year).await {
                Ok(employee) => return Ok((employee, temp_password)),
                Err(OnboardWriteError::EmailTaken) => {
                    return Err(RepoError::Duplicate(format!(
                        "Email '{}' is already registered",
                        data.email
                    )));
                }
                Err(OnboardWriteError::IdTaken) => {
                    tracing::warn!(
                        emp_id = %emp_id,
                        attempt,
                        "Employee ID collision, regenerating"
                    );
                    continue;
                }
                Err(OnboardWriteError::Other(e)) => return Err(e),
            }
        }

        Err(RepoError::Contention(
            "Could not allocate a unique employee ID".to_string(),
        ))
    }

    /// The five onboarding writes as a single all-or-nothing transaction.
    /// Any statement failure (duplicate ID, duplicate email, pre-existing
    /// dependent row) cancels the lot; no partial employee can exist.
    async fn write_onboarding(
        &self,
        data: &EmployeeRegistration,
        emp_id: &str,
        password_hash: &str,
        year: i32,
    ) -> Result<Employee, OnboardWriteError> {
        let now = Utc::now();
        let schedule = WorkingSchedule::default_for(emp_id, data.date_of_joining);
        let balance = TimeOffBalance::default_for(emp_id, year);
        let status = StatusTracker::initial(emp_id);

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE type::thing('employee', $emp_id) SET
                    emp_id = $emp_id,
                    company_code = $company_code,
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    phone = $phone,
                    password_hash = $password_hash,
                    role = $role,
                    department = $department,
                    manager_id = $manager_id,
                    location = $location,
                    date_of_joining = $date_of_joining,
                    profile_picture = NONE,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now;
                CREATE working_schedule CONTENT $schedule;
                CREATE timeoff_balance CONTENT $balance;
                CREATE type::thing('status_tracker', $emp_id) CONTENT $status;
                COMMIT TRANSACTION;"#,
            )
            .bind(("emp_id", emp_id.to_string()))
            .bind(("company_code", data.company_code.to_uppercase()))
            .bind(("first_name", data.first_name.clone()))
            .bind(("last_name", data.last_name.clone()))
            .bind(("email", data.email.clone()))
            .bind(("phone", data.phone.clone()))
            .bind(("password_hash", password_hash.to_string()))
            .bind(("role", data.role))
            .bind(("department", data.department.clone()))
            .bind(("manager_id", data.manager_id.clone()))
            .bind(("location", data.location.clone()))
            .bind(("date_of_joining", data.date_of_joining))
            .bind(("now", now))
            .bind(("schedule", schedule))
            .bind(("balance", balance))
            .bind(("status", status))
            .await
            .map_err(|e| OnboardWriteError::Other(RepoError::Database(e.to_string())))?;

        let errors = result.take_errors();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
            return Err(classify_write_errors(&messages));
        }

        let employee = self
            .find_by_emp_id(emp_id)
            .await
            .map_err(OnboardWriteError::Other)?
            .ok_or_else(|| {
                OnboardWriteError::Other(RepoError::Database(
                    "Employee vanished after commit".to_string(),
                ))
            })?;
        Ok(employee)
    }

    /// Update an employee's profile fields
    pub async fn update(&self, emp_id: &str, data: EmployeeUpdate) -> RepoResult<Employee> {
        let existing = self
            .find_by_emp_id(emp_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Employee {emp_id} not found")))?;

        if let Some(manager_id) = &data.manager_id {
            if manager_id == emp_id {
                return Err(RepoError::Validation(
                    "An employee cannot be their own manager".to_string(),
                ));
            }
            if self.find_by_emp_id(manager_id).await?.is_none() {
                return Err(RepoError::Validation(format!(
                    "Manager '{manager_id}' does not exist"
                )));
            }
        }

        let rid = RecordId::from_table_key("employee", emp_id);
        let updated: Option<Employee> = self
            .base
            .db()
            .update(rid)
            .merge(EmployeeMerge {
                data,
                updated_at: Utc::now(),
            })
            .await?;

        updated.ok_or_else(|| RepoError::NotFound(format!("Employee {} not found", existing.emp_id)))
    }

    /// Soft-deactivate an employee. The record stays; tokens stop
    /// resolving on the next request.
    pub async fn deactivate(&self, emp_id: &str) -> RepoResult<Employee> {
        self.update(
            emp_id,
            EmployeeUpdate {
                phone: None,
                department: None,
                manager_id: None,
                location: None,
                profile_picture: None,
                role: None,
                is_active: Some(false),
            },
        )
        .await
    }

    /// The employee's working schedule effective for today (falls back to
    /// the most recent one).
    pub async fn schedule_for(&self, emp_id: &str) -> RepoResult<Option<WorkingSchedule>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM working_schedule WHERE emp_id = $emp_id")
            .bind(("emp_id", emp_id))
            .await?;
        let mut schedules: Vec<WorkingSchedule> = result.take(0)?;
        schedules.sort_by_key(|s| s.effective_from);
        Ok(schedules.pop())
    }

    /// The employee's live status tracker
    pub async fn status_for(&self, emp_id: &str) -> RepoResult<Option<StatusTracker>> {
        let rid = RecordId::from_table_key("status_tracker", emp_id);
        let status: Option<StatusTracker> = self.base.db().select(rid).await?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_uses_two_letters_of_each_name() {
        assert_eq!(id_prefix("AB", "John", "Doe", 2024), "ABJODO2024");
        assert_eq!(id_prefix("ab", "jane", "smith", 2025), "ABJASM2025");
    }

    #[test]
    fn short_names_are_padded_with_x() {
        assert_eq!(id_prefix("AB", "J", "Doe", 2024), "ABJXDO2024");
        assert_eq!(id_prefix("AB", "J", "D", 2024), "ABJXDX2024");
        // no usable letters at all
        assert_eq!(id_prefix("AB", "98", "Doe", 2024), "ABXXDO2024");
    }

    #[test]
    fn non_letters_are_skipped() {
        assert_eq!(id_prefix("AB", "J.R.", "O'Neil", 2024), "ABJRON2024");
    }

    #[test]
    fn serial_starts_at_one_and_increments() {
        assert_eq!(next_serial(None).unwrap(), 1);
        assert_eq!(next_serial(Some("ABJODO20240001")).unwrap(), 2);
        assert_eq!(next_serial(Some("ABJODO20240042")).unwrap(), 43);
    }

    #[test]
    fn serial_space_is_capped() {
        assert_eq!(next_serial(Some("ABJODO20249998")).unwrap(), 9999);
        match next_serial(Some("ABJODO20249999")) {
            Err(RepoError::Capacity(_)) => {}
            other => panic!("expected Capacity error, got {other:?}"),
        }
    }

    #[test]
    fn composed_ids_are_zero_padded() {
        assert_eq!(compose_emp_id("ABJODO2024", 1), "ABJODO20240001");
        assert_eq!(compose_emp_id("ABJODO2024", 9999), "ABJODO20249999");
    }
}
