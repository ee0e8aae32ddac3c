use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::{EmployeeId, PageRequest};

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_number: String,
    pub employee_name: String,
    pub employee_firstname: String,
    pub employee_lastname: String,
    pub employee_dob: NaiveDate,
    pub employee_city: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A fully validated field set for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub employee_number: String,
    pub employee_name: String,
    pub employee_firstname: String,
    pub employee_lastname: String,
    pub employee_dob: NaiveDate,
    pub employee_city: String,
}

/// A validated, sparse set of field replacements. `None` leaves the stored
/// value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub employee_number: Option<String>,
    pub employee_name: Option<String>,
    pub employee_firstname: Option<String>,
    pub employee_lastname: Option<String>,
    pub employee_dob: Option<NaiveDate>,
    pub employee_city: Option<String>,
}

impl EmployeeChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.employee_number.is_none()
            && self.employee_name.is_none()
            && self.employee_firstname.is_none()
            && self.employee_lastname.is_none()
            && self.employee_dob.is_none()
            && self.employee_city.is_none()
    }

    /// Returns `current` with every supplied field replaced and `updated_at`
    /// advanced. `id` and `created_at` are carried over untouched.
    #[must_use]
    pub fn apply_to(&self, current: &Employee, now: DateTime<Utc>) -> Employee {
        Employee {
            id: current.id,
            employee_number: pick(&self.employee_number, &current.employee_number),
            employee_name: pick(&self.employee_name, &current.employee_name),
            employee_firstname: pick(&self.employee_firstname, &current.employee_firstname),
            employee_lastname: pick(&self.employee_lastname, &current.employee_lastname),
            employee_dob: self.employee_dob.unwrap_or(current.employee_dob),
            employee_city: pick(&self.employee_city, &current.employee_city),
            created_at: current.created_at,
            updated_at: Some(next_updated_at(current.updated_at, now)),
        }
    }
}

fn pick(change: &Option<String>, current: &str) -> String {
    change.as_deref().unwrap_or(current).to_string()
}

/// `updated_at` must strictly increase across updates even when the clock
/// reads the same (or an earlier) instant.
#[must_use]
pub fn next_updated_at(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

/// One window of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total: u64, pages: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total,
            pages,
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Employee {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Employee {
            id: EmployeeId::new(3),
            employee_number: "E-001".to_string(),
            employee_name: "Jane Doe".to_string(),
            employee_firstname: "Jane".to_string(),
            employee_lastname: "Doe".to_string(),
            employee_dob: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            employee_city: "Austin".to_string(),
            created_at: Some(created),
            updated_at: Some(created),
        }
    }

    #[test]
    fn apply_replaces_only_supplied_fields() {
        let current = sample();
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let changes = EmployeeChanges {
            employee_city: Some("Denver".to_string()),
            ..Default::default()
        };

        let merged = changes.apply_to(&current, now);

        assert_eq!(merged.employee_city, "Denver");
        assert_eq!(merged.id, current.id);
        assert_eq!(merged.employee_number, current.employee_number);
        assert_eq!(merged.employee_name, current.employee_name);
        assert_eq!(merged.employee_firstname, current.employee_firstname);
        assert_eq!(merged.employee_lastname, current.employee_lastname);
        assert_eq!(merged.employee_dob, current.employee_dob);
        assert_eq!(merged.created_at, current.created_at);
        assert_eq!(merged.updated_at, Some(now));
    }

    #[test]
    fn empty_changes_still_refresh_updated_at() {
        let current = sample();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let changes = EmployeeChanges::default();
        assert!(changes.is_empty());

        let merged = changes.apply_to(&current, now);
        assert_eq!(merged.updated_at, Some(now));
        assert_eq!(merged.employee_city, current.employee_city);
    }

    #[test]
    fn updated_at_strictly_increases_on_clock_tie() {
        let prev = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let next = next_updated_at(Some(prev), prev);
        assert!(next > prev);

        let earlier = prev - Duration::seconds(5);
        assert!(next_updated_at(Some(prev), earlier) > prev);

        let later = prev + Duration::seconds(5);
        assert_eq!(next_updated_at(Some(prev), later), later);
        assert_eq!(next_updated_at(None, later), later);
    }

    #[test]
    fn page_flags() {
        let page: Page<()> = Page::new(vec![], PageRequest::new(999, 10), 5, 1);
        assert!(page.has_prev());
        assert!(!page.has_next());

        let page: Page<()> = Page::new(vec![(); 10], PageRequest::new(1, 10), 25, 3);
        assert!(!page.has_prev());
        assert!(page.has_next());

        let empty: Page<()> = Page::new(vec![], PageRequest::default(), 0, 0);
        assert!(!empty.has_prev());
        assert!(!empty.has_next());
    }
}
