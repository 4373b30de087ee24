//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role-scoped authorization.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::JwtService;
use crate::core::ServerState;
use crate::db::models::Role;
use crate::db::repository::EmployeeRepository;
use crate::utils::AppError;

/// Identity of the caller, resolved fresh from the store on every request.
///
/// Injected into request extensions by [`require_auth`]; handlers take it
/// via `Extension<CurrentEmployee>`.
#[derive(Debug, Clone)]
pub struct CurrentEmployee {
    pub emp_id: String,
    pub email: String,
    pub role: Role,
}

impl CurrentEmployee {
    /// HR and admin manage other people's records
    pub fn can_manage(&self) -> bool {
        matches!(self.role, Role::Hr | Role::Admin)
    }

    /// Row-level ownership rule: a caller may always touch their own
    /// record; anyone else's requires hr/admin.
    pub fn can_access(&self, emp_id: &str) -> bool {
        self.emp_id == emp_id || self.can_manage()
    }
}

/// Authentication middleware - requires a valid bearer token.
///
/// Extracts the JWT from `Authorization: Bearer <token>`, validates it, then
/// resolves the subject against the employee table. A token whose subject no
/// longer exists or has been deactivated is rejected, so deactivation cuts
/// access without any session bookkeeping.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/` (health, static 404s)
/// - `/api/v1/auth/login`
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if path == "/api/v1/auth/login" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Request without credentials");
            return Err(AppError::unauthorized());
        }
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token rejected");
            return match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            };
        }
    };

    // The token subject must still be an active employee
    let repo = EmployeeRepository::new(state.db.clone());
    let employee = repo
        .find_by_emp_id(&claims.sub)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    match employee {
        Some(emp) if emp.is_active => {
            let current = CurrentEmployee {
                emp_id: emp.emp_id,
                email: emp.email,
                role: emp.role,
            };
            req.extensions_mut().insert(current);
            Ok(next.run(req).await)
        }
        Some(_) => {
            tracing::warn!(target: "security", emp_id = %claims.sub, "Deactivated account presented a valid token");
            Err(AppError::unauthorized())
        }
        None => {
            tracing::warn!(target: "security", emp_id = %claims.sub, "Token subject no longer exists");
            Err(AppError::unauthorized())
        }
    }
}

/// Authorization middleware - requires hr or admin role.
///
/// Returns 403 for everyone else. Must run after [`require_auth`].
pub async fn require_hr_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let current = req
        .extensions()
        .get::<CurrentEmployee>()
        .ok_or(AppError::unauthorized())?;

    if !current.can_manage() {
        tracing::warn!(
            target: "security",
            emp_id = %current.emp_id,
            role = %current.role,
            "hr/admin route denied"
        );
        return Err(AppError::forbidden("Not enough permissions"));
    }

    Ok(next.run(req).await)
}
