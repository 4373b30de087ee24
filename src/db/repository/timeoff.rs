//! Time Off Repository
//!
//! Filing and deciding leave requests, and the per-year balances they
//! draw from. Approval of paid/sick leave deducts the balance and flips
//! the request in one transaction.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{
    RequestStatus, TimeOffBalance, TimeOffRequest, TimeOffRequestCreate, TimeOffType,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use surrealdb::{RecordId, Surreal, engine::local::Db};

#[derive(Clone)]
pub struct TimeOffRepository {
    base: BaseRepository,
}

impl TimeOffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Leave balance for one employee and year
    pub async fn balance_for(
        &self,
        emp_id: &str,
        year: i32,
    ) -> RepoResult<Option<TimeOffBalance>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM timeoff_balance WHERE emp_id = $emp_id AND year = $year")
            .bind(("emp_id", emp_id))
            .bind(("year", year))
            .await?;
        let rows: Vec<TimeOffBalance> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All requests, newest first (hr/admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<TimeOffRequest>> {
        let rows: Vec<TimeOffRequest> = self
            .base
            .db()
            .query("SELECT * FROM timeoff_request ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// One employee's requests, newest first
    pub async fn find_for_employee(&self, emp_id: &str) -> RepoResult<Vec<TimeOffRequest>> {
        let emp_id = emp_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM timeoff_request WHERE emp_id = $emp_id ORDER BY created_at DESC",
            )
            .bind(("emp_id", emp_id))
            .await?;
        let rows: Vec<TimeOffRequest> = result.take(0)?;
        Ok(rows)
    }

    /// Request by record key
    pub async fn find_by_id(&self, request_id: &str) -> RepoResult<Option<TimeOffRequest>> {
        let rid = RecordId::from_table_key("timeoff_request", request_id);
        let request: Option<TimeOffRequest> = self.base.db().select(rid).await?;
        Ok(request)
    }

    /// File a new request. Days are counted inclusively over the range.
    pub async fn file_request(
        &self,
        emp_id: &str,
        data: TimeOffRequestCreate,
    ) -> RepoResult<TimeOffRequest> {
        if data.end_date < data.start_date {
            return Err(RepoError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }

        let total_days =
            Decimal::from((data.end_date - data.start_date).num_days() + 1);
        let now = Utc::now();
        let request = TimeOffRequest {
            id: None,
            emp_id: emp_id.to_string(),
            time_off_type: data.time_off_type,
            start_date: data.start_date,
            end_date: data.end_date,
            total_days,
            reason: data.reason,
            attachment: data.attachment,
            status: RequestStatus::Pending,
            approved_by: None,
            approval_date: None,
            approval_comments: None,
            created_at: now,
            updated_at: now,
        };

        let mut result = self
            .base
            .db()
            .query("CREATE timeoff_request CONTENT $request")
            .bind(("request", request))
            .await?;
        let created: Option<TimeOffRequest> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create request".to_string()))
    }

    /// Approve or reject a pending request.
    ///
    /// Approving paid/sick leave deducts from the balance of the year the
    /// leave starts in; the deduction and the status flip commit together.
    pub async fn decide(
        &self,
        request_id: &str,
        approver_emp_id: &str,
        approve: bool,
        comments: Option<String>,
    ) -> RepoResult<TimeOffRequest> {
        let request = self
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Request {request_id} not found")))?;

        if request.status != RequestStatus::Pending {
            return Err(RepoError::Duplicate(
                "Request has already been decided".to_string(),
            ));
        }

        let rid = RecordId::from_table_key("timeoff_request", request_id);
        let now = Utc::now();
        let status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };

        // Rejection and unpaid leave touch no balance
        let deduction = if approve {
            match request.time_off_type {
                TimeOffType::PaidTimeOff | TimeOffType::SickLeave => {
                    let year = request.start_date.year();
                    let balance = self.balance_for(&request.emp_id, year).await?.ok_or_else(
                        || {
                            RepoError::NotFound(format!(
                                "No leave balance for {} in {year}",
                                request.emp_id
                            ))
                        },
                    )?;

                    let (available, used_field) = match request.time_off_type {
                        TimeOffType::PaidTimeOff => {
                            (balance.paid_time_off_available(), "paid_time_off_used")
                        }
                        TimeOffType::SickLeave => {
                            (balance.sick_leave_available(), "sick_leave_used")
                        }
                        TimeOffType::UnpaidLeave => unreachable!(),
                    };

                    if available < request.total_days {
                        return Err(RepoError::BusinessRule(format!(
                            "Insufficient balance: {available} days available, {} requested",
                            request.total_days
                        )));
                    }

                    let balance_rid = balance.id.clone().ok_or_else(|| {
                        RepoError::Database("Balance row missing its ID".to_string())
                    })?;
                    let new_used = match request.time_off_type {
                        TimeOffType::PaidTimeOff => balance.paid_time_off_used + request.total_days,
                        TimeOffType::SickLeave => balance.sick_leave_used + request.total_days,
                        TimeOffType::UnpaidLeave => unreachable!(),
                    };
                    Some((balance_rid, used_field, new_used))
                }
                TimeOffType::UnpaidLeave => None,
            }
        } else {
            None
        };

        match deduction {
            Some((balance_rid, used_field, new_used)) => {
                // used_field is one of two fixed column names, never user input
                let query = format!(
                    r#"BEGIN TRANSACTION;
                    UPDATE $balance SET {used_field} = $new_used, updated_at = $now;
                    UPDATE $request SET
                        status = $status,
                        approved_by = $approved_by,
                        approval_date = $now,
                        approval_comments = $comments,
                        updated_at = $now;
                    COMMIT TRANSACTION;"#
                );
                self.base
                    .db()
                    .query(query)
                    .bind(("balance", balance_rid))
                    .bind(("request", rid.clone()))
                    .bind(("new_used", new_used))
                    .bind(("status", status))
                    .bind(("approved_by", approver_emp_id.to_string()))
                    .bind(("comments", comments))
                    .bind(("now", now))
                    .await?
                    .check()?;
            }
            None => {
                self.base
                    .db()
                    .query(
                        r#"UPDATE $request SET
                            status = $status,
                            approved_by = $approved_by,
                            approval_date = $now,
                            approval_comments = $comments,
                            updated_at = $now"#,
                    )
                    .bind(("request", rid.clone()))
                    .bind(("status", status))
                    .bind(("approved_by", approver_emp_id.to_string()))
                    .bind(("comments", comments))
                    .bind(("now", now))
                    .await?
                    .check()?;
            }
        }

        self.find_by_id(request_id)
            .await?
            .ok_or_else(|| RepoError::Database("Request vanished after update".to_string()))
    }
}
