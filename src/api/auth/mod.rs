//! Authentication API Module

mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

/// Auth router. `/login` is public (the auth middleware skips it);
/// `/me` and `/logout` require a valid token.
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
}
