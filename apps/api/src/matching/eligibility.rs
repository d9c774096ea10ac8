//! Matching eligibility filter.
//!
//! Upholds the one invariant of the data model: for a given job, no talent
//! appears in more than one matching. Everything offered for selection must
//! come out of this filter.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::matching::MatchingRow;
use crate::models::user::User;

/// Talents that may legally be proposed as a new match for a job:
/// `talents` minus everyone already matched to it.
///
/// No selected job means no eligible talents — clients must pick a job
/// first. Input order is preserved; no sort is imposed. Runs in
/// O(|matchings| + |talents|) via a set of matched user ids.
pub fn eligible_talents(
    job_id: Option<Uuid>,
    matchings: &[MatchingRow],
    talents: &[User],
) -> Vec<User> {
    let Some(job_id) = job_id else {
        return Vec::new();
    };

    let matched: HashSet<Uuid> = matchings
        .iter()
        .filter(|m| m.job_id == job_id)
        .map(|m| m.user_id)
        .collect();

    talents
        .iter()
        .filter(|talent| !matched.contains(&talent.id))
        .cloned()
        .collect()
}

/// True when the pair is already matched, used as the pre-insert check so
/// duplicate submissions get a clean conflict message.
pub fn is_already_matched(job_id: Uuid, user_id: Uuid, matchings: &[MatchingRow]) -> bool {
    matchings
        .iter()
        .any(|m| m.job_id == job_id && m.user_id == user_id)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;
    use crate::models::matching::MatchStatus;
    use crate::models::user::Role;

    fn talent(name: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Talent,
            skills: Json(vec![]),
            location: "Lagos".to_string(),
            is_email_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn matching(job_id: Uuid, user_id: Uuid) -> MatchingRow {
        let now = Utc::now();
        MatchingRow {
            id: Uuid::new_v4(),
            job_id,
            user_id,
            matched_by: Uuid::new_v4(),
            status: MatchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_job_selected_yields_nothing() {
        let talents = vec![talent("u1"), talent("u2")];
        assert!(eligible_talents(None, &[], &talents).is_empty());
    }

    #[test]
    fn test_no_matchings_yields_all_talents() {
        let job = Uuid::new_v4();
        let talents = vec![talent("u1"), talent("u2"), talent("u3")];
        let eligible = eligible_talents(Some(job), &[], &talents);
        let ids: Vec<Uuid> = eligible.iter().map(|t| t.id).collect();
        let expected: Vec<Uuid> = talents.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_no_talents_yields_nothing() {
        let job = Uuid::new_v4();
        let matchings = vec![matching(job, Uuid::new_v4())];
        assert!(eligible_talents(Some(job), &matchings, &[]).is_empty());
    }

    #[test]
    fn test_matched_talent_excluded() {
        // T = [u1, u2, u3], M = [(j1, u2)] → [u1, u3]
        let job = Uuid::new_v4();
        let talents = vec![talent("u1"), talent("u2"), talent("u3")];
        let matchings = vec![matching(job, talents[1].id)];

        let eligible = eligible_talents(Some(job), &matchings, &talents);
        let names: Vec<&str> = eligible.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["u1", "u3"]);
    }

    #[test]
    fn test_matchings_for_other_jobs_ignored() {
        let job = Uuid::new_v4();
        let other_job = Uuid::new_v4();
        let talents = vec![talent("u1"), talent("u2")];
        let matchings = vec![matching(other_job, talents[0].id)];

        let eligible = eligible_talents(Some(job), &matchings, &talents);
        assert_eq!(eligible.len(), 2);
    }

    #[test]
    fn test_pure_and_idempotent() {
        let job = Uuid::new_v4();
        let talents = vec![talent("u1"), talent("u2")];
        let matchings = vec![matching(job, talents[0].id)];

        let first = eligible_talents(Some(job), &matchings, &talents);
        let second = eligible_talents(Some(job), &matchings, &talents);
        assert_eq!(
            first.iter().map(|t| t.id).collect::<Vec<_>>(),
            second.iter().map(|t| t.id).collect::<Vec<_>>()
        );
        // Inputs are untouched.
        assert_eq!(talents.len(), 2);
        assert_eq!(matchings.len(), 1);
    }

    #[test]
    fn test_already_matched_pair_detected() {
        let job = Uuid::new_v4();
        let user = Uuid::new_v4();
        let matchings = vec![matching(job, user)];

        assert!(is_already_matched(job, user, &matchings));
        assert!(!is_already_matched(job, Uuid::new_v4(), &matchings));
        assert!(!is_already_matched(Uuid::new_v4(), user, &matchings));
    }
}
