//! Time Off API Module

mod handler;

use axum::{Router, middleware, routing::{get, post, put}};

use crate::auth::require_hr_admin;
use crate::core::ServerState;

/// Time-off router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/timeoff", routes())
}

fn routes() -> Router<ServerState> {
    let member_routes = Router::new()
        .route("/requests", post(handler::file_request).get(handler::list))
        .route("/balance/{emp_id}", get(handler::get_balance));

    // Approval is an hr/admin act
    let approval_routes = Router::new()
        .route("/requests/{request_id}/approval", put(handler::decide))
        .layer(middleware::from_fn(require_hr_admin));

    member_routes.merge(approval_routes)
}
