//! Role-parameterized authentication guard.
//!
//! One middleware covers every protected route: no or invalid token → 401
//! (clients redirect to login), valid token with the wrong role → 403
//! (clients redirect to their dashboard router), otherwise the
//! authenticated user row is exposed to handlers as a [`CurrentUser`]
//! extension.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::token::verify_token;
use crate::errors::AppError;
use crate::models::user::{Role, User, UserRow};
use crate::state::AppState;

/// Role a route requires. `None` means any authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    None,
    Admin,
    Talent,
}

impl RequiredRole {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RequiredRole::None => true,
            RequiredRole::Admin => role == Role::Admin,
            RequiredRole::Talent => role == Role::Talent,
        }
    }
}

/// The authenticated user, inserted into request extensions by the guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, RequiredRole::None, request, next).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, RequiredRole::Admin, request, next).await
}

pub async fn require_talent(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&state, RequiredRole::Talent, request, next).await
}

async fn authorize(
    state: &AppState,
    required: RequiredRole,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or_else(|| {
        AppError::Unauthorized("You are not logged in, please provide a token".to_string())
    })?;

    let claims = verify_token(&token, state.config.jwt_secret.as_bytes())?;

    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| {
        AppError::Unauthorized("User belonging to this token no longer exists".to_string())
    })?;

    if !required.allows(user.role) {
        tracing::warn!(
            user_id = %user.id,
            role = user.role.as_str(),
            "role check failed, access denied"
        );
        return Err(AppError::Forbidden(
            "You are not allowed to perform this action".to_string(),
        ));
    }

    request.extensions_mut().insert(CurrentUser(user.into()));
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
