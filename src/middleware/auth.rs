use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;
use crate::auth::jwt::{verify_token, ADMIN_ROLE};
use crate::error::AppError;
use crate::state::AppState;

/// Identity of the caller, inserted as a request extension by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: String,
    pub username: String,
}

impl AuthContext {
    pub fn require_admin(&self, action: &str) -> Result<(), AppError> {
        if self.role != ADMIN_ROLE {
            return Err(AppError::forbidden(format!("Only admins can {action}")));
        }
        Ok(())
    }
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth_header = match req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return AppError::unauthorized("Missing Authorization header").into_response(),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return AppError::unauthorized("Invalid Authorization format").into_response(),
    };

    let claims = match verify_token(token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer token");
            return AppError::unauthorized("Invalid or expired token").into_response();
        }
    };

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        role: claims.role,
        username: claims.username,
    });

    next.run(req).await
}
