use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::validation::ValidationErrors;
use crate::models::{Employee, Page};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Input
// ============================================================================

/// Why a request body could not be turned into an [`EmployeeInput`].
#[derive(Debug, Error)]
pub enum InputError {
    #[error("request body is empty")]
    Empty,

    #[error("request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("request body is not a JSON object")]
    NotAnObject,
}

/// The writable fields of an employee exactly as they arrived.
///
/// `None` means the key was absent; `Some(Value::Null)` means it was sent as
/// `null`. Unknown keys (including `id` and the timestamps) are dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmployeeInput {
    #[serde(default, deserialize_with = "present")]
    pub employee_number: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub employee_name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub employee_firstname: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub employee_lastname: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub employee_dob: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub employee_city: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl EmployeeInput {
    /// Decodes a raw request body. An empty object counts as no input.
    pub fn from_json(body: &[u8]) -> Result<Self, InputError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(InputError::Empty);
        }

        let value: Value = serde_json::from_slice(body)?;
        let is_empty = match &value {
            Value::Object(map) => map.is_empty(),
            _ => return Err(InputError::NotAnObject),
        };
        if is_empty {
            return Err(InputError::Empty);
        }

        Ok(serde_json::from_value(value)?)
    }
}

// ============================================================================
// Output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub id: i32,
    pub employee_number: String,
    pub employee_name: String,
    pub employee_firstname: String,
    pub employee_lastname: String,
    pub employee_dob: String,
    pub employee_city: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn format_timestamp(ts: Option<DateTime<Utc>>) -> Option<String> {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id.value(),
            employee_dob: e.employee_dob.format(DATE_FORMAT).to_string(),
            created_at: format_timestamp(e.created_at),
            updated_at: format_timestamp(e.updated_at),
            employee_number: e.employee_number,
            employee_name: e.employee_name,
            employee_firstname: e.employee_firstname,
            employee_lastname: e.employee_lastname,
            employee_city: e.employee_city,
        }
    }
}

/// `{"message": ..., "employee": ...}`; the message is omitted on reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub employee: EmployeeDto,
}

impl EmployeeEnvelope {
    pub fn found(employee: Employee) -> Self {
        Self {
            message: None,
            employee: employee.into(),
        }
    }

    pub fn with_message(message: impl Into<String>, employee: Employee) -> Self {
        Self {
            message: Some(message.into()),
            employee: employee.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationDto {
    pub page: u64,
    pub pages: u64,
    pub per_page: u64,
    pub total: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmployeeListResponse {
    pub employees: Vec<EmployeeDto>,
    pub pagination: PaginationDto,
}

impl From<Page<Employee>> for EmployeeListResponse {
    fn from(page: Page<Employee>) -> Self {
        let pagination = PaginationDto {
            page: page.page,
            pages: page.pages,
            per_page: page.per_page,
            total: page.total,
            has_prev: page.has_prev(),
            has_next: page.has_next(),
        };
        Self {
            employees: page.items.into_iter().map(EmployeeDto::from).collect(),
            pagination,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<ValidationErrors>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            messages: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: ValidationErrors) -> Self {
        self.messages = Some(messages);
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub database: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}
