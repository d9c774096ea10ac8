use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::guard::CurrentUser;
use crate::errors::AppError;
use crate::extract::Json;
use crate::matching::eligibility::{eligible_talents, is_already_matched};
use crate::models::matching::{MatchStatus, Matching, MatchingDetailRow, MatchingRow};
use crate::models::user::{Role, User, UserRow, USER_COLUMNS};
use crate::state::AppState;

/// matchings ⋈ jobs ⋈ users (talent) ⋈ users (admin) join producing the
/// populated-reference shape clients consume.
const MATCHING_SELECT: &str = "SELECT m.id, m.status, m.created_at, m.updated_at, \
     j.id AS job_id, j.title AS job_title, j.description AS job_description, \
     j.required_skills AS job_required_skills, j.location AS job_location, \
     t.id AS user_id, t.name AS user_name, t.email AS user_email, \
     t.skills AS user_skills, t.location AS user_location, \
     a.id AS matched_by_id, a.name AS matched_by_name, a.email AS matched_by_email \
     FROM matchings m \
     JOIN jobs j ON j.id = m.job_id \
     JOIN users t ON t.id = m.user_id \
     JOIN users a ON a.id = m.matched_by";

const DUPLICATE_MATCH_MESSAGE: &str = "This talent is already matched to this job";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchingRequest {
    pub job_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<MatchStatus>,
}

#[derive(Serialize)]
pub struct MatchingResponse {
    pub message: String,
    pub matching: Matching,
}

/// GET /api/matching
pub async fn list_matchings(State(state): State<AppState>) -> Result<Json<Vec<Matching>>, AppError> {
    let rows: Vec<MatchingDetailRow> =
        sqlx::query_as(&format!("{MATCHING_SELECT} ORDER BY m.created_at DESC"))
            .fetch_all(&state.db)
            .await?;

    Ok(Json(rows.into_iter().map(Matching::from).collect()))
}

/// POST /api/matching
///
/// Both ids are required; nothing is written when either is missing. The
/// duplicate-pair check mirrors the eligibility filter, with the UNIQUE
/// constraint as the final authority under concurrent submissions.
pub async fn create_matching(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateMatchingRequest>,
) -> Result<(StatusCode, Json<MatchingResponse>), AppError> {
    let job_id = req
        .job_id
        .ok_or_else(|| AppError::Validation("jobId is required".to_string()))?;
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))?;

    let job_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM jobs WHERE id = ?")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    if job_exists.is_none() {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let talent: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?;
    let talent = talent.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if talent.role != Role::Talent {
        return Err(AppError::Validation(
            "Only talents can be matched to jobs".to_string(),
        ));
    }

    let existing: Vec<MatchingRow> = sqlx::query_as("SELECT * FROM matchings WHERE job_id = ?")
        .bind(job_id)
        .fetch_all(&state.db)
        .await?;
    if is_already_matched(job_id, user_id, &existing) {
        return Err(AppError::Conflict(DUPLICATE_MATCH_MESSAGE.to_string()));
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO matchings (id, job_id, user_id, matched_by, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(job_id)
    .bind(user_id)
    .bind(current.0.id)
    .bind(req.status.unwrap_or(MatchStatus::Active))
    .bind(now)
    .bind(now)
    .execute(&state.db)
    .await
    .map_err(|e| AppError::from_unique_violation(e, DUPLICATE_MATCH_MESSAGE))?;

    tracing::info!(matching_id = %id, %job_id, %user_id, matched_by = %current.0.id, "matching created");

    let row: MatchingDetailRow = sqlx::query_as(&format!("{MATCHING_SELECT} WHERE m.id = ?"))
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MatchingResponse {
            message: "Match created successfully!".to_string(),
            matching: row.into(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleQuery {
    pub job_id: Option<String>,
}

/// GET /api/matching/eligible?jobId=
///
/// An empty or absent jobId yields an empty list — clients must make an
/// explicit job selection before talents are offered.
pub async fn eligible_talents_for_job(
    State(state): State<AppState>,
    Query(query): Query<EligibleQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let job_id = query
        .job_id
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            Uuid::parse_str(&raw)
                .map_err(|_| AppError::Validation("jobId must be a valid id".to_string()))
        })
        .transpose()?;

    let matchings: Vec<MatchingRow> = sqlx::query_as("SELECT * FROM matchings")
        .fetch_all(&state.db)
        .await?;

    let talents: Vec<User> = sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role = 'Talent' ORDER BY created_at ASC"
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(eligible_talents(job_id, &matchings, &talents)))
}

/// GET /api/talent/matches
pub async fn talent_matches(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<Matching>>, AppError> {
    let rows: Vec<MatchingDetailRow> = sqlx::query_as(&format!(
        "{MATCHING_SELECT} WHERE m.user_id = ? ORDER BY m.created_at DESC"
    ))
    .bind(current.0.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(Matching::from).collect()))
}
