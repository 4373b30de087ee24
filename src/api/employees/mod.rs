//! Employee API Module

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::require_hr_admin;
use crate::core::ServerState;

/// Employee router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/employees", routes())
}

fn routes() -> Router<ServerState> {
    // Read routes: row-level ownership is checked inside the handlers
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{emp_id}", get(handler::get_by_id))
        .route("/{emp_id}/schedule", get(handler::get_schedule))
        .route("/{emp_id}/status", get(handler::get_status))
        .route(
            "/{emp_id}/personal-info",
            get(handler::get_personal_info).put(handler::put_personal_info),
        );

    // Management routes: hr/admin only
    let manage_routes = Router::new()
        .route("/register", post(handler::register))
        .route(
            "/{emp_id}",
            axum::routing::put(handler::update).delete(handler::deactivate),
        )
        .layer(middleware::from_fn(require_hr_admin));

    read_routes.merge(manage_routes)
}
