//! Payroll API Module

mod handler;

use axum::{Router, middleware, routing::{get, post, put}};

use crate::auth::require_hr_admin;
use crate::core::ServerState;

/// Payroll router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/payroll", routes())
}

fn routes() -> Router<ServerState> {
    // Reads: self or hr/admin, checked in the handlers
    let read_routes = Router::new()
        .route("/{emp_id}/bank-details", get(handler::get_bank_details))
        .route("/{emp_id}/salary", get(handler::get_salary))
        .route("/{emp_id}/pf", get(handler::list_pf))
        .route("/{emp_id}/tax", get(handler::list_tax));

    // Writes: hr/admin only
    let write_routes = Router::new()
        .route("/{emp_id}/bank-details", put(handler::put_bank_details))
        .route("/{emp_id}/salary", post(handler::create_salary))
        .route("/{emp_id}/pf", post(handler::record_pf))
        .route("/{emp_id}/tax", post(handler::record_tax))
        .layer(middleware::from_fn(require_hr_admin));

    read_routes.merge(write_routes)
}
