//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check (public)
//! - [`auth`] - login and current-user endpoints
//! - [`employees`] - registration, profiles, schedules, status
//! - [`attendance`] - daily check-in/check-out
//! - [`timeoff`] - leave requests, approvals and balances
//! - [`payroll`] - bank details, salary, PF and tax records

pub mod attendance;
pub mod auth;
pub mod employees;
pub mod health;
pub mod payroll;
pub mod timeoff;

use axum::Router;

use crate::core::ServerState;

/// Build the complete application router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(employees::router())
        .merge(attendance::router())
        .merge(timeoff::router())
        .merge(payroll::router())
}
