//! Domain service for employee records.
//!
//! Runs the validate → persist pipeline for every operation and reports the
//! outcome as a tagged [`EmployeeError`] for the HTTP layer to map.

use crate::api::types::EmployeeInput;
use crate::api::validation::ValidationErrors;
use crate::db::StoreError;
use crate::domain::{EmployeeId, PageRequest};
use crate::models::{Employee, Page};
use thiserror::Error;

/// Errors specific to employee operations.
#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Employee number already exists: {0}")]
    Conflict(String),

    #[error("Employee not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<ValidationErrors> for EmployeeError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<StoreError> for EmployeeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(number) => Self::Conflict(number),
            StoreError::NotFound(key) => Self::NotFound(key),
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Domain service trait for employees.
#[async_trait::async_trait]
pub trait EmployeeService: Send + Sync {
    /// Validates a complete field set and stores it as a new record.
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, EmployeeError>;

    /// Lists one page of records in id order.
    async fn list(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError>;

    async fn get(&self, id: EmployeeId) -> Result<Employee, EmployeeError>;

    async fn get_by_number(&self, number: &str) -> Result<Employee, EmployeeError>;

    /// Validates the supplied fields and applies them to an existing record.
    async fn update(&self, id: EmployeeId, input: &EmployeeInput)
    -> Result<Employee, EmployeeError>;

    async fn delete(&self, id: EmployeeId) -> Result<(), EmployeeError>;
}
