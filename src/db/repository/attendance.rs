//! Attendance Repository
//!
//! Daily check-in/check-out. One attendance row per employee per day,
//! enforced by the `attendance_emp_date` unique index; each check-in also
//! moves the employee's status tracker.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Attendance, PresenceStatus, StatusIndicator, WorkingSchedule};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use surrealdb::{Surreal, engine::local::Db};

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All attendance rows for an employee, newest first
    pub async fn find_for_employee(&self, emp_id: &str) -> RepoResult<Vec<Attendance>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE emp_id = $emp_id ORDER BY attendance_date DESC")
            .bind(("emp_id", emp_id))
            .await?;
        let rows: Vec<Attendance> = result.take(0)?;
        Ok(rows)
    }

    /// The attendance row for one employee on one day, if any
    pub async fn find_for_date(
        &self,
        emp_id: &str,
        date: NaiveDate,
    ) -> RepoResult<Option<Attendance>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE emp_id = $emp_id AND attendance_date = $date")
            .bind(("emp_id", emp_id))
            .bind(("date", date))
            .await?;
        let rows: Vec<Attendance> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Check in for today. Creates the attendance row and flips the status
    /// tracker to in_office/green in one transaction.
    pub async fn check_in(&self, emp_id: &str) -> RepoResult<Attendance> {
        let now = Utc::now();
        let today = now.date_naive();
        let row = Attendance::checked_in(emp_id, today, now);

        let mut result = self
            .base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                CREATE attendance CONTENT $row;
                UPDATE type::thing('status_tracker', $emp_id) SET
                    current_status = $status,
                    status_indicator = $indicator,
                    last_check_in = $now,
                    updated_at = $now;
                COMMIT TRANSACTION;"#,
            )
            .bind(("row", row))
            .bind(("emp_id", emp_id.to_string()))
            .bind(("status", PresenceStatus::InOffice))
            .bind(("indicator", StatusIndicator::Green))
            .bind(("now", now))
            .await?;

        // A cancelled transaction reports the real error on the failing
        // statement only; scan all of them
        let errors = result.take_errors();
        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_values().map(|e| e.to_string()).collect();
            if messages.iter().any(|m| m.contains("attendance_emp_date")) {
                return Err(RepoError::Duplicate(
                    "Already checked in today".to_string(),
                ));
            }
            return Err(RepoError::Database(messages.join("; ")));
        }

        self.find_for_date(emp_id, today)
            .await?
            .ok_or_else(|| RepoError::Database("Attendance row vanished after commit".to_string()))
    }

    /// Check out for today. Computes worked and extra hours against the
    /// employee's schedule and stamps the status tracker.
    pub async fn check_out(
        &self,
        emp_id: &str,
        schedule: Option<&WorkingSchedule>,
    ) -> RepoResult<Attendance> {
        let now = Utc::now();
        let today = now.date_naive();

        let row = self
            .find_for_date(emp_id, today)
            .await?
            .ok_or_else(|| RepoError::Validation("Not checked in today".to_string()))?;

        let check_in = row
            .check_in_time
            .ok_or_else(|| RepoError::Validation("Not checked in today".to_string()))?;
        if row.check_out_time.is_some() {
            return Err(RepoError::Duplicate("Already checked out today".to_string()));
        }

        let minutes = (now - check_in).num_minutes().max(0);
        let work_hours = (Decimal::from(minutes) / Decimal::from(60)).round_dp(2);
        let scheduled_hours = schedule
            .map(|s| s.total_working_hours)
            .unwrap_or_else(|| Decimal::from(8));
        let extra_hours = (work_hours - scheduled_hours).max(Decimal::ZERO);

        let rid = row
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Attendance row missing its ID".to_string()))?;

        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE $attendance SET
                    check_out_time = $now,
                    work_hours = $work_hours,
                    extra_hours = $extra_hours,
                    updated_at = $now;
                UPDATE type::thing('status_tracker', $emp_id) SET
                    last_check_out = $now,
                    updated_at = $now;
                COMMIT TRANSACTION;"#,
            )
            .bind(("attendance", rid))
            .bind(("emp_id", emp_id.to_string()))
            .bind(("work_hours", work_hours))
            .bind(("extra_hours", extra_hours))
            .bind(("now", now))
            .await?
            .check()?;

        self.find_for_date(emp_id, today)
            .await?
            .ok_or_else(|| RepoError::Database("Attendance row vanished after update".to_string()))
    }
}
