use axum::Json;
use serde::Serialize;

use crate::catalog::{positions_for, CatalogEntry, DEPARTMENTS};
use crate::models::candidate::PipelineStatus;

#[derive(Debug, Serialize)]
pub struct StatusEntry {
    pub value: &'static str,
    pub label: &'static str,
}

pub async fn list_statuses() -> Json<Vec<StatusEntry>> {
    let entries = PipelineStatus::ALL
        .iter()
        .map(|s| StatusEntry {
            value: s.as_str(),
            label: s.label(),
        })
        .collect();
    Json(entries)
}

#[derive(Debug, Serialize)]
pub struct DepartmentEntry {
    pub value: &'static str,
    pub positions: &'static [CatalogEntry],
}

pub async fn list_departments() -> Json<Vec<DepartmentEntry>> {
    let entries = DEPARTMENTS
        .iter()
        .map(|dep| DepartmentEntry {
            value: dep,
            positions: positions_for(dep),
        })
        .collect();
    Json(entries)
}
