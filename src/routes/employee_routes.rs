use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::catalog;
use crate::dto::candidate_dto::PageQuery;
use crate::dto::employee_dto::{CreateEmployeeRequest, UpdateEmployeeRequest};
use crate::error::{Error, Result};
use crate::models::candidate::Paginated;
use crate::models::employee::Employee;
use crate::AppState;

pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Paginated<Employee>>> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(50);
    let result = state.employee_service.list(page, page_size).await?;
    Ok(Json(result))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>> {
    let employee = state
        .employee_service
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Employee not found".to_string()))?;
    Ok(Json(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>)> {
    req.validate()?;
    if !catalog::is_department(&req.department) {
        return Err(Error::BadRequest(format!(
            "Unknown department: {}",
            req.department
        )));
    }
    if let Some(pos) = &req.position {
        if !catalog::is_position_for(&req.department, pos) {
            return Err(Error::BadRequest(format!(
                "Position {} is not available for this department",
                pos
            )));
        }
    }
    let employee = state.employee_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>> {
    req.validate()?;
    if let Some(dep) = &req.department {
        if !catalog::is_department(dep) {
            return Err(Error::BadRequest(format!("Unknown department: {}", dep)));
        }
    }
    let employee = state
        .employee_service
        .update(id, req)
        .await?
        .ok_or_else(|| Error::NotFound("Employee not found".to_string()))?;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.employee_service.delete(id).await? {
        return Err(Error::NotFound("Employee not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
