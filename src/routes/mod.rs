pub mod auth_routes;
pub mod candidate_routes;
pub mod dictionary_routes;
pub mod employee_routes;
pub mod health;
pub mod metrics_routes;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::middleware::auth;
use crate::middleware::rate_limit::{rps_middleware, RateLimiter};
use crate::AppState;

/// Assembles the full API surface. The candidate side is open to any valid
/// session; the roster and metrics side is restricted to hr/head. Each of
/// the three surfaces gets its own rate-limit window.
pub fn api_router(state: AppState, api_rps: u32) -> Router {
    let open = Router::new()
        .route("/health", get(health::health))
        .route("/auth/login", post(auth_routes::login))
        .route("/auth/logout", post(auth_routes::logout))
        .layer(from_fn_with_state(
            RateLimiter::new("open", api_rps),
            rps_middleware,
        ));

    let session_api = Router::new()
        .route("/auth/me", get(auth_routes::me))
        .route(
            "/candidates",
            get(candidate_routes::list_candidates).post(candidate_routes::create_candidate),
        )
        .route("/candidates/checklist", get(metrics_routes::checklist))
        .route(
            "/candidates/:id",
            get(candidate_routes::get_candidate)
                .patch(candidate_routes::update_candidate)
                .delete(candidate_routes::delete_candidate),
        )
        .route(
            "/candidates/:id/meet",
            post(candidate_routes::create_meet).patch(candidate_routes::edit_meet),
        )
        .route("/dictionaries/statuses", get(dictionary_routes::list_statuses))
        .route(
            "/dictionaries/departments",
            get(dictionary_routes::list_departments),
        )
        .layer(from_fn(auth::require_auth))
        .layer(from_fn_with_state(
            RateLimiter::new("session", api_rps),
            rps_middleware,
        ));

    let management_api = Router::new()
        .route("/candidates/metrics", get(metrics_routes::candidate_metrics))
        .route(
            "/candidates/snapshots",
            get(metrics_routes::pipeline_snapshots),
        )
        .route(
            "/candidates/snapshots/freeze",
            post(metrics_routes::freeze_snapshot),
        )
        .route(
            "/employees",
            get(employee_routes::list_employees).post(employee_routes::create_employee),
        )
        .route("/employees/metrics", get(metrics_routes::employee_metrics))
        .route(
            "/employees/:id",
            get(employee_routes::get_employee)
                .patch(employee_routes::update_employee)
                .delete(employee_routes::delete_employee),
        )
        .layer(from_fn(auth::require_hr_or_head))
        .layer(from_fn_with_state(
            RateLimiter::new("management", api_rps),
            rps_middleware,
        ));

    open.merge(session_api)
        .merge(management_api)
        .with_state(state)
}
