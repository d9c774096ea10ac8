use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::user::{User, USER_COLUMNS};
use crate::state::AppState;

/// GET /api/users
///
/// All roles; clients narrow to talents where they need to.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users: Vec<User> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(users))
}
