use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserRef;

/// Flat row produced by the jobs ⋈ users (creator) join.
#[derive(Debug, Clone, FromRow)]
pub struct JobDetailRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Json<Vec<String>>,
    pub location: String,
    pub created_by_id: Uuid,
    pub created_by_name: String,
    pub created_by_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job as served to clients: `createdBy` is a populated user summary,
/// read-only after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    pub created_by: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<JobDetailRow> for Job {
    fn from(row: JobDetailRow) -> Self {
        Job {
            id: row.id,
            title: row.title,
            description: row.description,
            required_skills: row.required_skills.0,
            location: row.location,
            created_by: UserRef {
                id: row.created_by_id,
                name: row.created_by_name,
                email: row.created_by_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
