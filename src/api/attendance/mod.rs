//! Attendance API Module

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

/// Attendance router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/check-in", post(handler::check_in))
        .route("/check-out", post(handler::check_out))
        .route("/{emp_id}", get(handler::list_for_employee))
}
