//! `SeaORM` implementation of the `EmployeeService` trait.

use crate::api::types::EmployeeInput;
use crate::api::validation::{validate_changes, validate_new};
use crate::db::Store;
use crate::domain::{EmployeeId, PageRequest};
use crate::models::{Employee, Page};
use crate::services::employee_service::{EmployeeError, EmployeeService};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

pub struct SeaOrmEmployeeService {
    store: Store,
}

impl SeaOrmEmployeeService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[async_trait]
impl EmployeeService for SeaOrmEmployeeService {
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, EmployeeError> {
        let new = validate_new(input, Self::today())?;
        Ok(self.store.insert_employee(new).await?)
    }

    async fn list(&self, request: PageRequest) -> Result<Page<Employee>, EmployeeError> {
        Ok(self.store.list_employees(request).await?)
    }

    async fn get(&self, id: EmployeeId) -> Result<Employee, EmployeeError> {
        Ok(self.store.get_employee(id).await?)
    }

    async fn get_by_number(&self, number: &str) -> Result<Employee, EmployeeError> {
        Ok(self.store.get_employee_by_number(number).await?)
    }

    async fn update(
        &self,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<Employee, EmployeeError> {
        let changes = validate_changes(input, Self::today())?;
        Ok(self.store.update_employee(id, &changes).await?)
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), EmployeeError> {
        self.store.delete_employee(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn service() -> SeaOrmEmployeeService {
        let store = Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .unwrap();
        SeaOrmEmployeeService::new(store)
    }

    fn input(value: serde_json::Value) -> EmployeeInput {
        EmployeeInput::from_json(value.to_string().as_bytes()).unwrap()
    }

    fn jane() -> EmployeeInput {
        input(json!({
            "employee_number": "E-001",
            "employee_name": "Jane Doe",
            "employee_firstname": "Jane",
            "employee_lastname": "Doe",
            "employee_dob": "1990-05-01",
            "employee_city": "Austin"
        }))
    }

    #[tokio::test]
    async fn create_then_get() {
        let service = service().await;
        let created = service.create(&jane()).await.unwrap();
        assert!(created.id.value() > 0);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(service.get_by_number("E-001").await.unwrap(), created);
    }

    #[tokio::test]
    async fn invalid_input_is_never_stored() {
        let service = service().await;
        let err = service
            .create(&input(json!({ "employee_number": "AB 12" })))
            .await
            .unwrap_err();

        match err {
            EmployeeError::Validation(errors) => {
                assert!(errors.contains("employee_number"));
                assert!(errors.contains("employee_city"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(service.store.count_employees().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_number_conflicts() {
        let service = service().await;
        service.create(&jane()).await.unwrap();
        let err = service.create(&jane()).await.unwrap_err();
        assert!(matches!(err, EmployeeError::Conflict(_)));
        assert_eq!(service.store.count_employees().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_validates_before_lookup() {
        let service = service().await;
        let err = service
            .update(EmployeeId::new(99), &input(json!({ "employee_city": "" })))
            .await
            .unwrap_err();
        assert!(matches!(err, EmployeeError::Validation(_)));

        let err = service
            .update(EmployeeId::new(99), &input(json!({ "employee_city": "Denver" })))
            .await
            .unwrap_err();
        assert!(matches!(err, EmployeeError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service().await;
        let created = service.create(&jane()).await.unwrap();
        service.delete(created.id).await.unwrap();

        assert!(matches!(
            service.get(created.id).await,
            Err(EmployeeError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(created.id).await,
            Err(EmployeeError::NotFound(_))
        ));
    }
}
