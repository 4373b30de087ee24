//! Dayflow Server - HRMS backend
//!
//! # Architecture overview
//!
//! - **Authentication** (`auth`): JWT + Argon2; every request re-resolves
//!   its caller against the employee table
//! - **Database** (`db`): embedded SurrealDB store, models and repositories
//! - **HTTP API** (`api`): RESTful routes, one module per resource
//! - **Core** (`core`): configuration, shared state, server loop
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, ServerState, Server
//! ├── auth/          # JWT, temporary credentials, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Models and repositories
//! └── utils/         # Errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export public types
pub use auth::{CurrentEmployee, JwtService};
pub use crate::core::{Config, Server, ServerState, build_router};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ____              ______
  / __ \____ ___  __/ / __/___  _      __
 / / / / __ `/ / / / / /_/ __ \| | /| / /
/ /_/ / /_/ / /_/ / / __/ /_/ /| |/ |/ /
\____/\__,_/\__, /_/_/  \____/ |__/|__/
           /____/
    "#
    );
}
