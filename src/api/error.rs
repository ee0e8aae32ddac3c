use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::types::{ErrorBody, InputError};
use super::validation::ValidationErrors;
use crate::services::EmployeeError;

#[derive(Debug)]
pub enum ApiError {
    /// Body missing, unparseable, not an object, or empty.
    InvalidInput(String),

    ValidationError(ValidationErrors),

    Conflict(String),

    NotFound(String),

    /// `operation` is what the client sees; `detail` is only logged.
    DatabaseError { operation: String, detail: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError { operation, detail } => {
                write!(f, "Database error: {}: {}", operation, detail)
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::InvalidInput(msg) => {
                tracing::debug!("Rejected request body: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("No input data provided"),
                )
            }
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Validation error").with_messages(errors),
            ),
            ApiError::Conflict(number) => {
                tracing::debug!("Duplicate employee number: {}", number);
                (
                    StatusCode::CONFLICT,
                    ErrorBody::new("Employee number already exists")
                        .with_message("Employee number must be unique"),
                )
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorBody::new("Employee not found")),
            ApiError::DatabaseError { operation, detail } => {
                tracing::error!("Database error: {}: {}", operation, detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Database error").with_message(operation),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub(crate) fn internal_error_body() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new("Internal server error"),
    )
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl ApiError {
    /// Maps a service failure, naming `operation` in store-failure responses.
    pub fn employee(err: EmployeeError, operation: &str) -> Self {
        match err {
            EmployeeError::Validation(errors) => ApiError::ValidationError(errors),
            EmployeeError::Conflict(number) => ApiError::Conflict(number),
            EmployeeError::NotFound(key) => ApiError::NotFound(key),
            EmployeeError::Database(detail) => ApiError::DatabaseError {
                operation: operation.to_string(),
                detail,
            },
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn database_errors_hide_detail() {
        let err = ApiError::employee(
            EmployeeError::Database("disk I/O error".to_string()),
            "Failed to update employee",
        );
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Database error", "message": "Failed to update employee" })
        );
    }

    #[tokio::test]
    async fn outcome_status_codes() {
        let (status, body) = render(ApiError::InvalidInput("empty".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No input data provided" }));

        let (status, body) =
            render(ApiError::employee(EmployeeError::Conflict("E-1".to_string()), "x")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Employee number already exists");

        let (status, body) = render(ApiError::not_found("Employee", 4)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Employee not found" }));
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let mut errors = ValidationErrors::default();
        errors.add("employee_firstname", "First name must be at least 2 characters long");
        let (status, body) = render(ApiError::ValidationError(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["messages"]["employee_firstname"][0],
            "First name must be at least 2 characters long"
        );
    }
}
