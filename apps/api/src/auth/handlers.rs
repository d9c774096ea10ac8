use axum::{extract::State, http::StatusCode, Extension};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::auth::guard::CurrentUser;
use crate::auth::password;
use crate::auth::token::create_token;
use crate::errors::AppError;
use crate::extract::Json;
use crate::jobs::skills::{normalize_skills, SkillsInput};
use crate::models::user::{Role, User, UserRow, USER_COLUMNS};
use crate::state::AppState;

const OTP_TTL_MINUTES: i64 = 10;
const RESET_TTL_MINUTES: i64 = 30;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub skills: Option<SkillsInput>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, sqlx::FromRow)]
struct PasswordResetRow {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    let email = req.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    validate_password(&req.password)?;

    let role = req.role.unwrap_or(Role::Talent);
    let skills = normalize_skills(req.skills);
    let location = req.location.unwrap_or_default().trim().to_string();
    let now = Utc::now();
    let id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, skills, location, is_email_verified, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(&email)
    .bind(password::hash(&req.password))
    .bind(role)
    .bind(SqlJson(&skills))
    .bind(&location)
    .bind(false)
    .bind(now)
    .bind(now)
    .execute(&state.db)
    .await
    .map_err(|e| AppError::from_unique_violation(e, "A user with this email already exists"))?;

    let user = fetch_user(&state, id).await?;
    let token = create_token(user.id, user.role, state.config.jwt_secret.as_bytes())?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful! Please verify your email to continue.".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    // Same message for unknown email and wrong password.
    let row = row.ok_or_else(invalid_credentials)?;
    if !password::verify(&req.password, &row.password_hash) {
        return Err(invalid_credentials());
    }

    let user: User = row.into();
    let token = create_token(user.id, user.role, state.config.jwt_secret.as_bytes())?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse { user: current.0 })
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub skills: Option<SkillsInput>,
}

/// PUT /api/auth/me
///
/// Updates name, location, and skills only. Email and role are immutable
/// in-app.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = current.0;

    let name = match req.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Name is required".to_string()));
            }
            name
        }
        None => user.name,
    };
    let location = match req.location {
        Some(location) => location.trim().to_string(),
        None => user.location,
    };
    let skills = match req.skills {
        Some(input) => normalize_skills(Some(input)),
        None => user.skills.0,
    };

    sqlx::query("UPDATE users SET name = ?, location = ?, skills = ?, updated_at = ? WHERE id = ?")
        .bind(&name)
        .bind(&location)
        .bind(SqlJson(&skills))
        .bind(Utc::now())
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let user = fetch_user(&state, user.id).await?;
    Ok(Json(ProfileResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// POST /api/auth/change-password-otp
///
/// Generates a 6-digit OTP and stores its hash with a short expiry. Email
/// delivery is an external collaborator; the code is logged at debug level
/// in its place.
pub async fn request_password_otp(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MessageResponse>, AppError> {
    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
    store_code(&state, current.0.id, "otp", &code, OTP_TTL_MINUTES).await?;

    tracing::debug!(user_id = %current.0.id, otp = %code, "password change OTP issued");

    Ok(Json(MessageResponse {
        message: "An OTP has been sent to your email".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub otp: String,
    pub new_password: String,
}

/// POST /api/auth/verify-otp-change-password
pub async fn verify_otp_change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&req.new_password)?;

    let row: Option<PasswordResetRow> = sqlx::query_as(
        "SELECT user_id, expires_at FROM password_resets \
         WHERE user_id = ? AND purpose = 'otp' AND code_hash = ?",
    )
    .bind(current.0.id)
    .bind(password::code_hash(req.otp.trim()))
    .fetch_optional(&state.db)
    .await?;

    let row = row
        .filter(|r| r.expires_at > Utc::now())
        .ok_or_else(|| AppError::Validation("Invalid or expired OTP".to_string()))?;

    set_password(&state, row.user_id, &req.new_password, "otp").await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/forgot-password
///
/// Always answers the same way so the endpoint cannot be used to probe which
/// emails have accounts.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = req.email.trim().to_lowercase();

    let user_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    if let Some(user_id) = user_id {
        let code = Uuid::new_v4().simple().to_string();
        store_code(&state, user_id, "reset", &code, RESET_TTL_MINUTES).await?;
        tracing::debug!(%user_id, reset_token = %code, "password reset token issued");
    }

    Ok(Json(MessageResponse {
        message: "If an account exists for that email, a reset link has been sent".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&req.new_password)?;

    let row: Option<PasswordResetRow> = sqlx::query_as(
        "SELECT user_id, expires_at FROM password_resets \
         WHERE purpose = 'reset' AND code_hash = ?",
    )
    .bind(password::code_hash(req.token.trim()))
    .fetch_optional(&state.db)
    .await?;

    let row = row
        .filter(|r| r.expires_at > Utc::now())
        .ok_or_else(|| AppError::Validation("Invalid or expired reset token".to_string()))?;

    set_password(&state, row.user_id, &req.new_password, "reset").await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Email or password is wrong".to_string())
}

fn validate_password(candidate: &str) -> Result<(), AppError> {
    if candidate.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

async fn fetch_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    let user: Option<User> =
        sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    user.ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

async fn store_code(
    state: &AppState,
    user_id: Uuid,
    purpose: &str,
    code: &str,
    ttl_minutes: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO password_resets (user_id, purpose, code_hash, expires_at) VALUES (?, ?, ?, ?) \
         ON CONFLICT (user_id, purpose) DO UPDATE SET code_hash = excluded.code_hash, expires_at = excluded.expires_at",
    )
    .bind(user_id)
    .bind(purpose)
    .bind(password::code_hash(code))
    .bind(Utc::now() + Duration::minutes(ttl_minutes))
    .execute(&state.db)
    .await?;
    Ok(())
}

/// Rehashes the password and consumes the one-time code in one go.
async fn set_password(
    state: &AppState,
    user_id: Uuid,
    new_password: &str,
    purpose: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password::hash(new_password))
        .bind(Utc::now())
        .bind(user_id)
        .execute(&state.db)
        .await?;

    sqlx::query("DELETE FROM password_resets WHERE user_id = ? AND purpose = ?")
        .bind(user_id)
        .bind(purpose)
        .execute(&state.db)
        .await?;

    Ok(())
}
