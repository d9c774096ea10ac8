pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::auth::{guard, handlers as auth};
use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::stats::handlers as stats;
use crate::users::handlers as users;

/// Assembles the full API surface. Routes are grouped by the role they
/// require and each group carries one guard layer parameterized with that
/// role.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job));

    let authenticated = Router::new()
        .route("/api/users", get(users::list_users))
        .route("/api/matching", get(matching::list_matchings))
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route(
            "/api/auth/change-password-otp",
            post(auth::request_password_otp),
        )
        .route(
            "/api/auth/verify-otp-change-password",
            post(auth::verify_otp_change_password),
        )
        .route_layer(from_fn_with_state(state.clone(), guard::require_auth));

    let admin = Router::new()
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/:id", put(jobs::update_job).delete(jobs::delete_job))
        .route("/api/matching", post(matching::create_matching))
        .route(
            "/api/matching/eligible",
            get(matching::eligible_talents_for_job),
        )
        .route("/api/admin/stats", get(stats::dashboard_stats))
        .route_layer(from_fn_with_state(state.clone(), guard::require_admin));

    let talent = Router::new()
        .route("/api/talent/matches", get(matching::talent_matches))
        .route_layer(from_fn_with_state(state.clone(), guard::require_talent));

    public
        .merge(authenticated)
        .merge(admin)
        .merge(talent)
        .with_state(state)
}
