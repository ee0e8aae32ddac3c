//! Field rules for employee input.
//!
//! Validation is a pure function of the decoded input and the current date.
//! Every field is checked independently; each failing field contributes its
//! first failure to a [`ValidationErrors`] map.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::types::EmployeeInput;
use crate::models::{EmployeeChanges, NewEmployee};

pub const MIN_AGE_YEARS: f64 = 16.0;
pub const MAX_AGE_YEARS: f64 = 100.0;
const DAYS_PER_YEAR: f64 = 365.25;

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_A_DATE: &str = "Not a valid date.";

/// Field name → messages, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

struct TextRule {
    field: &'static str,
    label: &'static str,
    min_len: usize,
    max_len: usize,
    number_pattern: bool,
}

const NUMBER: TextRule = TextRule {
    field: "employee_number",
    label: "Employee number",
    min_len: 1,
    max_len: 20,
    number_pattern: true,
};

const NAME: TextRule = TextRule {
    field: "employee_name",
    label: "Employee name",
    min_len: 1,
    max_len: 100,
    number_pattern: false,
};

const FIRSTNAME: TextRule = TextRule {
    field: "employee_firstname",
    label: "First name",
    min_len: 2,
    max_len: 50,
    number_pattern: false,
};

const LASTNAME: TextRule = TextRule {
    field: "employee_lastname",
    label: "Last name",
    min_len: 2,
    max_len: 50,
    number_pattern: false,
};

const CITY: TextRule = TextRule {
    field: "employee_city",
    label: "City",
    min_len: 1,
    max_len: 50,
    number_pattern: false,
};

const DOB_FIELD: &str = "employee_dob";

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("Invalid regex"))
}

/// Validates a complete field set for a new record.
pub fn validate_new(
    input: &EmployeeInput,
    today: NaiveDate,
) -> Result<NewEmployee, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let number = collect(
        check_text(input.employee_number.as_ref(), &NUMBER, true),
        NUMBER.field,
        &mut errors,
    );
    let name = collect(
        check_text(input.employee_name.as_ref(), &NAME, true),
        NAME.field,
        &mut errors,
    );
    let firstname = collect(
        check_text(input.employee_firstname.as_ref(), &FIRSTNAME, true),
        FIRSTNAME.field,
        &mut errors,
    );
    let lastname = collect(
        check_text(input.employee_lastname.as_ref(), &LASTNAME, true),
        LASTNAME.field,
        &mut errors,
    );
    let dob = collect(
        check_dob(input.employee_dob.as_ref(), today, true),
        DOB_FIELD,
        &mut errors,
    );
    let city = collect(
        check_text(input.employee_city.as_ref(), &CITY, true),
        CITY.field,
        &mut errors,
    );

    match (number, name, firstname, lastname, dob, city) {
        (Some(number), Some(name), Some(firstname), Some(lastname), Some(dob), Some(city))
            if errors.is_empty() =>
        {
            Ok(NewEmployee {
                employee_number: number,
                employee_name: name,
                employee_firstname: firstname,
                employee_lastname: lastname,
                employee_dob: dob,
                employee_city: city,
            })
        }
        _ => Err(errors),
    }
}

/// Validates only the fields present in `input`; absent fields stay `None`.
pub fn validate_changes(
    input: &EmployeeInput,
    today: NaiveDate,
) -> Result<EmployeeChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let changes = EmployeeChanges {
        employee_number: collect(
            check_text(input.employee_number.as_ref(), &NUMBER, false),
            NUMBER.field,
            &mut errors,
        ),
        employee_name: collect(
            check_text(input.employee_name.as_ref(), &NAME, false),
            NAME.field,
            &mut errors,
        ),
        employee_firstname: collect(
            check_text(input.employee_firstname.as_ref(), &FIRSTNAME, false),
            FIRSTNAME.field,
            &mut errors,
        ),
        employee_lastname: collect(
            check_text(input.employee_lastname.as_ref(), &LASTNAME, false),
            LASTNAME.field,
            &mut errors,
        ),
        employee_dob: collect(
            check_dob(input.employee_dob.as_ref(), today, false),
            DOB_FIELD,
            &mut errors,
        ),
        employee_city: collect(
            check_text(input.employee_city.as_ref(), &CITY, false),
            CITY.field,
            &mut errors,
        ),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(errors)
    }
}

fn collect<T>(
    result: Result<Option<T>, String>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(message) => {
            errors.add(field, message);
            None
        }
    }
}

/// `Ok(None)` only when the field is absent and not required.
fn raw_string(value: Option<&Value>, required: bool) -> Result<Option<&str>, String> {
    match value {
        None if required => Err(MISSING.to_string()),
        None => Ok(None),
        Some(Value::Null) => Err(NULL.to_string()),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(NOT_A_STRING.to_string()),
    }
}

fn check_text(
    value: Option<&Value>,
    rule: &TextRule,
    required: bool,
) -> Result<Option<String>, String> {
    let Some(raw) = raw_string(value, required)? else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", rule.label));
    }

    if rule.number_pattern && !number_regex().is_match(trimmed) {
        return Err(format!(
            "{} can only contain letters, numbers, and hyphens",
            rule.label
        ));
    }

    let len = trimmed.chars().count();
    if len < rule.min_len {
        return Err(format!(
            "{} must be at least {} characters long",
            rule.label, rule.min_len
        ));
    }
    if len > rule.max_len {
        return Err(format!(
            "{} must be at most {} characters long",
            rule.label, rule.max_len
        ));
    }

    Ok(Some(trimmed.to_string()))
}

fn check_dob(
    value: Option<&Value>,
    today: NaiveDate,
    required: bool,
) -> Result<Option<NaiveDate>, String> {
    let raw = match raw_string(value, required) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ok(None),
        Err(message) if message == NOT_A_STRING => return Err(NOT_A_DATE.to_string()),
        Err(message) => return Err(message),
    };

    let dob = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| NOT_A_DATE.to_string())?;

    if dob > today {
        return Err("Date of birth cannot be in the future".to_string());
    }

    let age = age_in_years(dob, today);
    if age < MIN_AGE_YEARS {
        return Err("Employee must be at least 16 years old".to_string());
    }
    if age > MAX_AGE_YEARS {
        return Err("Employee age cannot exceed 100 years".to_string());
    }

    Ok(Some(dob))
}

/// Age as elapsed days over 365.25.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn age_in_years(dob: NaiveDate, today: NaiveDate) -> f64 {
    (today - dob).num_days() as f64 / DAYS_PER_YEAR
}
