use crate::domain::{EmployeeId, PageRequest};
use crate::entities::{employees, prelude::*};
use crate::models::{Employee, EmployeeChanges, NewEmployee, Page};
use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, Unchanged,
};
use thiserror::Error;
use tracing::info;

/// Outcome of a failed store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Employee number already exists: {0}")]
    Conflict(String),

    #[error("Employee not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::Database(err),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for employee records
pub struct EmployeeRepository {
    conn: DatabaseConnection,
}

impl EmployeeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: employees::Model) -> Employee {
        Employee {
            id: EmployeeId::new(m.id),
            employee_number: m.employee_number,
            employee_name: m.employee_name,
            employee_firstname: m.employee_firstname,
            employee_lastname: m.employee_lastname,
            employee_dob: m.employee_dob,
            employee_city: m.employee_city,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }

    /// Builds an update touching only the columns whose value differs, plus
    /// `updated_at`.
    fn changed_columns(current: employees::Model, merged: &Employee) -> employees::ActiveModel {
        let mut active = employees::ActiveModel {
            id: Unchanged(current.id),
            ..Default::default()
        };

        if merged.employee_number != current.employee_number {
            active.employee_number = Set(merged.employee_number.clone());
        }
        if merged.employee_name != current.employee_name {
            active.employee_name = Set(merged.employee_name.clone());
        }
        if merged.employee_firstname != current.employee_firstname {
            active.employee_firstname = Set(merged.employee_firstname.clone());
        }
        if merged.employee_lastname != current.employee_lastname {
            active.employee_lastname = Set(merged.employee_lastname.clone());
        }
        if merged.employee_dob != current.employee_dob {
            active.employee_dob = Set(merged.employee_dob);
        }
        if merged.employee_city != current.employee_city {
            active.employee_city = Set(merged.employee_city.clone());
        }
        active.updated_at = Set(merged.updated_at);

        active
    }

    /// Stored timestamps keep microsecond precision so they survive a trip
    /// through their JSON form unchanged.
    fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }

    // ========================================================================
    // Employee Operations
    // ========================================================================

    async fn number_taken(&self, number: &str, excluding: Option<EmployeeId>) -> StoreResult<bool> {
        let mut query = Employees::find().filter(employees::Column::EmployeeNumber.eq(number));

        if let Some(id) = excluding {
            query = query.filter(employees::Column::Id.ne(id.value()));
        }

        Ok(query.count(&self.conn).await? > 0)
    }

    pub async fn insert(&self, new: NewEmployee) -> StoreResult<Employee> {
        if self.number_taken(&new.employee_number, None).await? {
            return Err(StoreError::Conflict(new.employee_number));
        }

        let now = Self::now();
        let model = employees::ActiveModel {
            employee_number: Set(new.employee_number),
            employee_name: Set(new.employee_name),
            employee_dob: Set(new.employee_dob),
            employee_firstname: Set(new.employee_firstname),
            employee_lastname: Set(new.employee_lastname),
            employee_city: Set(new.employee_city),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Created employee {}: {}", model.id, model.employee_number);
        Ok(Self::map_model(model))
    }

    pub async fn get(&self, id: EmployeeId) -> StoreResult<Employee> {
        Employees::find_by_id(id.value())
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn get_by_number(&self, number: &str) -> StoreResult<Employee> {
        Employees::find()
            .filter(employees::Column::EmployeeNumber.eq(number))
            .one(&self.conn)
            .await?
            .map(Self::map_model)
            .ok_or_else(|| StoreError::NotFound(number.to_string()))
    }

    pub async fn list(&self, request: PageRequest) -> StoreResult<Page<Employee>> {
        let paginator = Employees::find()
            .order_by_asc(employees::Column::Id)
            .paginate(&self.conn, request.per_page());

        let counts = paginator.num_items_and_pages().await?;
        let items = if request.page() > counts.number_of_pages {
            Vec::new()
        } else {
            paginator.fetch_page(request.index()).await?
        };

        Ok(Page::new(
            items.into_iter().map(Self::map_model).collect(),
            request,
            counts.number_of_items,
            counts.number_of_pages,
        ))
    }

    pub async fn update(&self, id: EmployeeId, changes: &EmployeeChanges) -> StoreResult<Employee> {
        let current = Employees::find_by_id(id.value())
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(number) = &changes.employee_number
            && *number != current.employee_number
            && self.number_taken(number, Some(id)).await?
        {
            return Err(StoreError::Conflict(number.clone()));
        }

        let merged = changes.apply_to(&Self::map_model(current.clone()), Self::now());

        let model = Self::changed_columns(current, &merged)
            .update(&self.conn)
            .await
            .map_err(|e| match e {
                // Row vanished between the read and the write.
                DbErr::RecordNotUpdated => StoreError::NotFound(id.to_string()),
                other => StoreError::from(other),
            })?;

        info!("Updated employee {}: {}", model.id, model.employee_number);
        Ok(Self::map_model(model))
    }

    /// Hard-deletes the record and returns what was removed.
    pub async fn delete(&self, id: EmployeeId) -> StoreResult<Employee> {
        let existing = self.get(id).await?;

        let result = Employees::delete_by_id(id.value())
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        info!("Deleted employee {}: {}", id, existing.employee_number);
        Ok(existing)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        Ok(Employees::find().count(&self.conn).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use chrono::NaiveDate;

    async fn repo() -> EmployeeRepository {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("in-memory store");
        EmployeeRepository::new(store.conn)
    }

    fn new_employee(number: &str) -> NewEmployee {
        NewEmployee {
            employee_number: number.to_string(),
            employee_name: "Jane Doe".to_string(),
            employee_firstname: "Jane".to_string(),
            employee_lastname: "Doe".to_string(),
            employee_dob: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
            employee_city: "Austin".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_then_get_returns_same_fields() {
        let repo = repo().await;
        let created = repo.insert(new_employee("E-001")).await.unwrap();

        assert!(created.id.value() > 0);
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let by_number = repo.get_by_number("E-001").await.unwrap();
        assert_eq!(by_number.id, created.id);
    }

    #[tokio::test]
    async fn ids_increase() {
        let repo = repo().await;
        let a = repo.insert(new_employee("E-001")).await.unwrap();
        let b = repo.insert(new_employee("E-002")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn duplicate_number_is_conflict() {
        let repo = repo().await;
        repo.insert(new_employee("E-001")).await.unwrap();

        let err = repo.insert(new_employee("E-001")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicates_without_precheck() {
        let repo = repo().await;
        repo.insert(new_employee("E-001")).await.unwrap();

        let now = Utc::now();
        let raw = employees::ActiveModel {
            employee_number: Set("E-001".to_string()),
            employee_name: Set("Other".to_string()),
            employee_dob: Set(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()),
            employee_firstname: Set("Ot".to_string()),
            employee_lastname: Set("Her".to_string()),
            employee_city: Set("Reno".to_string()),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&repo.conn)
        .await
        .unwrap_err();

        assert!(matches!(StoreError::from(raw), StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let repo = repo().await;
        assert!(matches!(
            repo.get(EmployeeId::new(99)).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.get_by_number("NOPE").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.update(EmployeeId::new(99), &EmployeeChanges::default())
                .await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete(EmployeeId::new(99)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_fields() {
        let repo = repo().await;
        let before = repo.insert(new_employee("E-001")).await.unwrap();

        let changes = EmployeeChanges {
            employee_city: Some("Denver".to_string()),
            ..Default::default()
        };
        let after = repo.update(before.id, &changes).await.unwrap();

        assert_eq!(after.employee_city, "Denver");
        assert_eq!(after.employee_number, before.employee_number);
        assert_eq!(after.employee_name, before.employee_name);
        assert_eq!(after.employee_firstname, before.employee_firstname);
        assert_eq!(after.employee_lastname, before.employee_lastname);
        assert_eq!(after.employee_dob, before.employee_dob);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);

        let stored = repo.get(before.id).await.unwrap();
        assert_eq!(stored, after);
    }

    #[tokio::test]
    async fn update_to_taken_number_is_conflict() {
        let repo = repo().await;
        repo.insert(new_employee("E-001")).await.unwrap();
        let second = repo.insert(new_employee("E-002")).await.unwrap();

        let changes = EmployeeChanges {
            employee_number: Some("E-001".to_string()),
            ..Default::default()
        };
        let err = repo.update(second.id, &changes).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let unchanged = repo.get(second.id).await.unwrap();
        assert_eq!(unchanged, second);
    }

    #[tokio::test]
    async fn update_keeping_own_number_is_allowed() {
        let repo = repo().await;
        let employee = repo.insert(new_employee("E-001")).await.unwrap();

        let changes = EmployeeChanges {
            employee_number: Some("E-001".to_string()),
            employee_name: Some("Jane Q. Doe".to_string()),
            ..Default::default()
        };
        let updated = repo.update(employee.id, &changes).await.unwrap();
        assert_eq!(updated.employee_number, "E-001");
        assert_eq!(updated.employee_name, "Jane Q. Doe");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let repo = repo().await;
        let employee = repo.insert(new_employee("E-001")).await.unwrap();

        let removed = repo.delete(employee.id).await.unwrap();
        assert_eq!(removed.employee_number, "E-001");
        assert!(matches!(
            repo.get(employee.id).await,
            Err(StoreError::NotFound(_))
        ));

        // Number is free again once the record is gone.
        repo.insert(new_employee("E-001")).await.unwrap();
    }

    #[tokio::test]
    async fn list_paginates_in_id_order() {
        let repo = repo().await;
        for i in 1..=5 {
            repo.insert(new_employee(&format!("E-{i:03}"))).await.unwrap();
        }

        let first = repo.list(PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.pages, 3);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].employee_number, "E-001");
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = repo.list(PageRequest::new(3, 2)).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].employee_number, "E-005");
        assert!(last.has_prev());
        assert!(!last.has_next());
    }

    #[tokio::test]
    async fn list_beyond_range_is_empty() {
        let repo = repo().await;
        for i in 1..=5 {
            repo.insert(new_employee(&format!("E-{i:03}"))).await.unwrap();
        }

        let page = repo.list(PageRequest::new(999, 10)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 999);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn list_far_past_the_end_is_empty() {
        let repo = repo().await;
        repo.insert(new_employee("E-001")).await.unwrap();

        let page = repo.list(PageRequest::new(i64::MAX, 100)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
        assert_eq!(page.page, PageRequest::MAX_PAGE);
        assert!(!page.has_next());
    }

    #[tokio::test]
    async fn list_clamps_per_page() {
        let repo = repo().await;
        repo.insert(new_employee("E-001")).await.unwrap();

        let page = repo.list(PageRequest::new(1, 150)).await.unwrap();
        assert_eq!(page.per_page, 100);
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn empty_table_has_zero_pages() {
        let repo = repo().await;
        let page = repo.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }
}
