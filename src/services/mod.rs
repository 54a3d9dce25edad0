pub mod candidate_service;
pub mod employee_service;
pub mod meet_service;
pub mod metrics_service;
pub mod snapshot_service;
