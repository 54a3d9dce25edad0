pub mod catalog;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use sqlx::PgPool;

use crate::services::{
    candidate_service::CandidateService, employee_service::EmployeeService,
    meet_service::MeetService, metrics_service::MetricsService,
    snapshot_service::SnapshotService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub candidate_service: CandidateService,
    pub employee_service: EmployeeService,
    pub metrics_service: MetricsService,
    pub meet_service: MeetService,
    pub snapshot_service: SnapshotService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        Self {
            candidate_service: CandidateService::new(pool.clone()),
            employee_service: EmployeeService::new(pool.clone()),
            metrics_service: MetricsService::new(pool.clone()),
            meet_service: MeetService::new(config.meet_webhook_url.clone()),
            snapshot_service: SnapshotService::new(pool.clone()),
            pool,
        }
    }
}
