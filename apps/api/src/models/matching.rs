use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::user::UserRef;

/// Lifecycle status of a matching. A match is Active while the engagement is
/// running and Inactive once closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum MatchStatus {
    Active,
    Inactive,
}

/// Bare matching row: the (job_id, user_id) pair the eligibility filter
/// operates on. The pair is unique among stored rows.
#[derive(Debug, Clone, FromRow)]
pub struct MatchingRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub matched_by: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row from the matchings ⋈ jobs ⋈ users joins.
#[derive(Debug, Clone, FromRow)]
pub struct MatchingDetailRow {
    pub id: Uuid,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub job_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub job_required_skills: Json<Vec<String>>,
    pub job_location: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_skills: Json<Vec<String>>,
    pub user_location: String,
    pub matched_by_id: Uuid,
    pub matched_by_name: String,
    pub matched_by_email: String,
}

/// Job summary embedded in a matching's `jobId` reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedJob {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
}

/// Talent summary embedded in a matching's `userId` reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedTalent {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub location: String,
}

/// Matching as served to clients. Field names follow the wire contract the
/// front end consumes: `jobId` and `userId` carry populated references, not
/// bare ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Matching {
    pub id: Uuid,
    #[serde(rename = "jobId")]
    pub job: MatchedJob,
    #[serde(rename = "userId")]
    pub user: MatchedTalent,
    pub matched_by: UserRef,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MatchingDetailRow> for Matching {
    fn from(row: MatchingDetailRow) -> Self {
        Matching {
            id: row.id,
            job: MatchedJob {
                id: row.job_id,
                title: row.job_title,
                description: row.job_description,
                required_skills: row.job_required_skills.0,
                location: row.job_location,
            },
            user: MatchedTalent {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                skills: row.user_skills.0,
                location: row.user_location,
            },
            matched_by: UserRef {
                id: row.matched_by_id,
                name: row.matched_by_name,
                email: row.matched_by_email,
            },
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
