//! Domain primitives for employee records.
//!
//! Newtypes keep surrogate ids and paging parameters from being mixed up with
//! arbitrary integers as they travel between the HTTP layer and the store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate key of a stored employee, assigned by the database.
///
/// Clients can name an existing id in a path but never choose one.
///
/// # Examples
///
/// ```rust
/// use employee_api::domain::EmployeeId;
///
/// let id = EmployeeId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EmployeeId(i32);

impl EmployeeId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the underlying i32 value.
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EmployeeId> for i32 {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl From<i32> for EmployeeId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for EmployeeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// A normalized page window. Pages run `1..=MAX_PAGE`; `per_page` is kept
/// within `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PER_PAGE: i64 = 10;
    pub const MAX_PER_PAGE: u64 = 100;
    pub const MAX_PAGE: u64 = i32::MAX as u64;

    /// Clamps raw query values into a valid window. Never fails.
    #[must_use]
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = u64::try_from(page)
            .unwrap_or(0)
            .clamp(1, Self::MAX_PAGE);
        let per_page = u64::try_from(per_page)
            .unwrap_or(0)
            .clamp(1, Self::MAX_PER_PAGE);

        Self { page, per_page }
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Zero-based index of this page.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.page - 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_PER_PAGE)
    }
}
