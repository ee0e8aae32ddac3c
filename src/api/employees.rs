//! Employee CRUD endpoints.
//!
//! Handlers only decode the request, call [`EmployeeService`] and pick the
//! response; validation and persistence live below them.
//!
//! [`EmployeeService`]: crate::services::EmployeeService

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::collections::HashMap;
use std::sync::Arc;

use super::{
    ApiError, AppState, EmployeeEnvelope, EmployeeInput, EmployeeListResponse, MessageResponse,
};
use crate::domain::{EmployeeId, PageRequest};

const FAILED_CREATE: &str = "Failed to create employee";
const FAILED_LIST: &str = "Failed to retrieve employees";
const FAILED_GET: &str = "Failed to retrieve employee";
const FAILED_UPDATE: &str = "Failed to update employee";
const FAILED_DELETE: &str = "Failed to delete employee";

/// Ids that are not integers name no employee.
fn parse_id(raw: &str) -> Result<EmployeeId, ApiError> {
    raw.parse::<i32>()
        .map(EmployeeId::new)
        .map_err(|_| ApiError::not_found("Employee", raw))
}

/// Reads `page`/`per_page`, falling back to the defaults for anything that is
/// not an integer.
fn page_request(params: &HashMap<String, String>) -> PageRequest {
    let read = |key: &str, default: i64| {
        params
            .get(key)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(default)
    };

    PageRequest::new(
        read("page", PageRequest::DEFAULT_PAGE),
        read("per_page", PageRequest::DEFAULT_PER_PAGE),
    )
}

/// `POST /api/v1/employees`
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<EmployeeEnvelope>), ApiError> {
    let input = EmployeeInput::from_json(&body)?;

    let employee = state
        .employee_service()
        .create(&input)
        .await
        .map_err(|e| ApiError::employee(e, FAILED_CREATE))?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeEnvelope::with_message(
            "Employee created successfully",
            employee,
        )),
    ))
}

/// `GET /api/v1/employees?page=&per_page=`
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<EmployeeListResponse>, ApiError> {
    let page = state
        .employee_service()
        .list(page_request(&params))
        .await
        .map_err(|e| ApiError::employee(e, FAILED_LIST))?;

    Ok(Json(page.into()))
}

/// `GET /api/v1/employees/{id}`
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeEnvelope>, ApiError> {
    let id = parse_id(&id)?;

    let employee = state
        .employee_service()
        .get(id)
        .await
        .map_err(|e| ApiError::employee(e, FAILED_GET))?;

    Ok(Json(EmployeeEnvelope::found(employee)))
}

/// `GET /api/v1/employees/by-number/{number}`
pub async fn get_employee_by_number(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<EmployeeEnvelope>, ApiError> {
    let employee = state
        .employee_service()
        .get_by_number(&number)
        .await
        .map_err(|e| ApiError::employee(e, FAILED_GET))?;

    Ok(Json(EmployeeEnvelope::found(employee)))
}

/// `PUT /api/v1/employees/{id}`
///
/// Only the fields present in the body change.
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<EmployeeEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    let input = EmployeeInput::from_json(&body)?;

    let employee = state
        .employee_service()
        .update(id, &input)
        .await
        .map_err(|e| ApiError::employee(e, FAILED_UPDATE))?;

    Ok(Json(EmployeeEnvelope::with_message(
        "Employee updated successfully",
        employee,
    )))
}

/// `DELETE /api/v1/employees/{id}`
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    state
        .employee_service()
        .delete(id)
        .await
        .map_err(|e| ApiError::employee(e, FAILED_DELETE))?;

    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}
