use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::auth::guard::CurrentUser;
use crate::errors::AppError;
use crate::extract::Json;
use crate::jobs::skills::{normalize_skills, SkillsInput};
use crate::models::job::{Job, JobDetailRow};
use crate::state::AppState;

/// jobs ⋈ users join selecting the creator summary alongside the job.
const JOB_SELECT: &str = "SELECT j.id, j.title, j.description, j.required_skills, j.location, \
     j.created_at, j.updated_at, \
     u.id AS created_by_id, u.name AS created_by_name, u.email AS created_by_email \
     FROM jobs j JOIN users u ON u.id = j.created_by";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub title: String,
    pub description: String,
    pub location: String,
    pub required_skills: Option<SkillsInput>,
}

#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    let rows: Vec<JobDetailRow> =
        sqlx::query_as(&format!("{JOB_SELECT} ORDER BY j.created_at DESC"))
            .fetch_all(&state.db)
            .await?;

    Ok(Json(rows.into_iter().map(Job::from).collect()))
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = fetch_job(&state, id).await?;
    Ok(Json(job))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<JobPayload>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let (title, description, location) = validate_payload(&req)?;
    let skills = normalize_skills(req.required_skills);
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO jobs (id, title, description, required_skills, location, created_by, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&title)
    .bind(&description)
    .bind(SqlJson(&skills))
    .bind(&location)
    .bind(current.0.id)
    .bind(now)
    .bind(now)
    .execute(&state.db)
    .await?;

    tracing::info!(job_id = %id, created_by = %current.0.id, "job created");

    let job = fetch_job(&state, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            message: "Job created successfully".to_string(),
            job,
        }),
    ))
}

/// PUT /api/jobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<JobPayload>,
) -> Result<Json<JobResponse>, AppError> {
    let (title, description, location) = validate_payload(&req)?;
    let skills = normalize_skills(req.required_skills);

    let result = sqlx::query(
        "UPDATE jobs SET title = ?, description = ?, required_skills = ?, location = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(SqlJson(&skills))
    .bind(&location)
    .bind(Utc::now())
    .bind(id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let job = fetch_job(&state, id).await?;
    Ok(Json(JobResponse {
        message: "Job updated successfully".to_string(),
        job,
    }))
}

/// DELETE /api/jobs/:id
///
/// Deleting a job removes its matchings with it. The delete is explicit
/// rather than left to the FK cascade so the behavior holds even on
/// connections without foreign-key enforcement.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM matchings WHERE job_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    tx.commit().await?;
    tracing::info!(job_id = %id, "job deleted");

    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

/// Required-field validation: nothing is written when any of these fail.
fn validate_payload(req: &JobPayload) -> Result<(String, String, String), AppError> {
    let title = req.title.trim();
    let description = req.description.trim();
    let location = req.location.trim();

    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if description.is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if location.is_empty() {
        return Err(AppError::Validation("Location is required".to_string()));
    }

    Ok((
        title.to_string(),
        description.to_string(),
        location.to_string(),
    ))
}

async fn fetch_job(state: &AppState, id: Uuid) -> Result<Job, AppError> {
    let row: Option<JobDetailRow> = sqlx::query_as(&format!("{JOB_SELECT} WHERE j.id = ?"))
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    row.map(Job::from)
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}
