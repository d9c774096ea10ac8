use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::state::AppState;

/// Aggregate counts for the admin dashboard. `completedMatches` counts
/// Inactive matchings — a closed match is a completed one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub total_users: i64,
    pub total_talents: i64,
    pub total_admins: i64,
    pub total_matches: i64,
    pub active_matches: i64,
    pub completed_matches: i64,
    pub verified_users: i64,
    pub unverified_users: i64,
}

/// GET /api/admin/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let db = &state.db;

    let total_users = count(db, "SELECT COUNT(*) FROM users").await?;
    let verified_users = count(db, "SELECT COUNT(*) FROM users WHERE is_email_verified = 1").await?;
    let total_matches = count(db, "SELECT COUNT(*) FROM matchings").await?;
    let active_matches = count(db, "SELECT COUNT(*) FROM matchings WHERE status = 'Active'").await?;

    Ok(Json(DashboardStats {
        total_jobs: count(db, "SELECT COUNT(*) FROM jobs").await?,
        total_users,
        total_talents: count(db, "SELECT COUNT(*) FROM users WHERE role = 'Talent'").await?,
        total_admins: count(db, "SELECT COUNT(*) FROM users WHERE role = 'Admin'").await?,
        total_matches,
        active_matches,
        completed_matches: total_matches - active_matches,
        verified_users,
        unverified_users: total_users - verified_users,
    }))
}

async fn count(db: &SqlitePool, sql: &str) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar(sql).fetch_one(db).await?)
}
