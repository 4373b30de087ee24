//! Onboarding integration tests against a real embedded store.
//!
//! Run: cargo test --test onboarding

use chrono::{Datelike, NaiveDate, Utc};
use dayflow_server::db::DbService;
use dayflow_server::db::models::{EmployeeRegistration, PresenceStatus, Role, StatusIndicator};
use dayflow_server::db::repository::{EmployeeRepository, RepoError, TimeOffRepository};
use rust_decimal::Decimal;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("dayflow.db"))
        .await
        .expect("failed to open test database");
    (service.db, tmp)
}

fn registration(first: &str, last: &str, email: &str) -> EmployeeRegistration {
    EmployeeRegistration {
        company_code: "AB".to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        phone: "5551234567".to_string(),
        role: Role::Employee,
        department: Some("Engineering".to_string()),
        manager_id: None,
        location: Some("Lisbon".to_string()),
        date_of_joining: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    }
}

#[tokio::test]
async fn onboarding_assigns_sequential_ids() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db);
    let year = Utc::now().year();

    let (first, _) = repo
        .onboard(registration("John", "Doe", "john.doe@example.com"))
        .await
        .unwrap();
    assert_eq!(first.emp_id, format!("ABJODO{year}0001"));

    let (second, _) = repo
        .onboard(registration("Joan", "Dolan", "joan.dolan@example.com"))
        .await
        .unwrap();
    assert_eq!(second.emp_id, format!("ABJODO{year}0002"));

    // A different prefix starts its own sequence
    let (third, _) = repo
        .onboard(registration("Mary", "Poppins", "mary.p@example.com"))
        .await
        .unwrap();
    assert_eq!(third.emp_id, format!("ABMAPO{year}0001"));
}

#[tokio::test]
async fn onboarding_creates_all_dependent_records() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db.clone());
    let timeoff = TimeOffRepository::new(db);
    let year = Utc::now().year();

    let (employee, temp_password) = repo
        .onboard(registration("John", "Doe", "john.doe@example.com"))
        .await
        .unwrap();

    // Temporary password: returned once, never persisted
    assert!(temp_password.len() >= 10);
    assert!(employee.verify_password(&temp_password).unwrap());

    let schedule = repo.schedule_for(&employee.emp_id).await.unwrap().unwrap();
    assert_eq!(schedule.total_working_hours, Decimal::from(8));
    assert_eq!(schedule.break_time_hours, Decimal::from(1));
    assert_eq!(schedule.working_days_per_month, 22);
    assert_eq!(schedule.effective_from, employee.date_of_joining);

    let balance = timeoff
        .balance_for(&employee.emp_id, year)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.paid_time_off_total, Decimal::from(12));
    assert_eq!(balance.sick_leave_total, Decimal::from(7));
    assert_eq!(balance.paid_time_off_available(), Decimal::from(12));
    assert_eq!(balance.sick_leave_available(), Decimal::from(7));

    let status = repo.status_for(&employee.emp_id).await.unwrap().unwrap();
    assert_eq!(status.current_status, PresenceStatus::Absent);
    assert_eq!(status.status_indicator, StatusIndicator::Yellow);
}

#[tokio::test]
async fn duplicate_email_leaves_exactly_one_employee() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db);

    repo.onboard(registration("John", "Doe", "shared@example.com"))
        .await
        .unwrap();

    let err = repo
        .onboard(registration("Jane", "Smith", "shared@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].email, "shared@example.com");
}

#[derive(Deserialize)]
struct EmpIdRow {
    emp_id: String,
}

#[tokio::test]
async fn failed_onboarding_leaves_no_rows_behind() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db.clone());
    let year = Utc::now().year();
    let doomed_id = format!("ABJODO{year}0001");

    // Pre-seed a conflicting status tracker so the last write of the
    // onboarding transaction must fail
    db.query("CREATE type::thing('status_tracker', $emp_id) SET emp_id = $emp_id")
        .bind(("emp_id", doomed_id.clone()))
        .await
        .unwrap()
        .check()
        .unwrap();

    let err = repo
        .onboard(registration("John", "Doe", "john.doe@example.com"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RepoError::Contention(_)),
        "expected contention after bounded retries, got {err:?}"
    );

    // The whole transaction rolled back every time: no employee, no
    // schedule, no balance
    assert!(repo.find_by_emp_id(&doomed_id).await.unwrap().is_none());

    let mut result = db
        .query("SELECT emp_id FROM working_schedule WHERE emp_id = $emp_id")
        .bind(("emp_id", doomed_id.clone()))
        .await
        .unwrap();
    let schedules: Vec<EmpIdRow> = result.take(0).unwrap();
    assert!(schedules.is_empty());

    let mut result = db
        .query("SELECT emp_id FROM timeoff_balance WHERE emp_id = $emp_id")
        .bind(("emp_id", doomed_id))
        .await
        .unwrap();
    let balances: Vec<EmpIdRow> = result.take(0).unwrap();
    assert!(balances.is_empty());
}

#[tokio::test]
async fn unknown_manager_is_rejected() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db);

    let mut data = registration("John", "Doe", "john.doe@example.com");
    data.manager_id = Some("ABNOPE20240001".to_string());

    let err = repo.onboard(data).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");
    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn deactivation_is_soft() {
    let (db, _tmp) = test_db().await;
    let repo = EmployeeRepository::new(db);

    let (employee, _) = repo
        .onboard(registration("John", "Doe", "john.doe@example.com"))
        .await
        .unwrap();

    let deactivated = repo.deactivate(&employee.emp_id).await.unwrap();
    assert!(!deactivated.is_active);

    // Gone from the active listing, still addressable by ID
    assert!(repo.find_all().await.unwrap().is_empty());
    let found = repo.find_by_emp_id(&employee.emp_id).await.unwrap().unwrap();
    assert!(!found.is_active);
    assert_eq!(found.email, "john.doe@example.com");
}
