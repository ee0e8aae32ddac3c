use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{EmployeeService, SeaOrmEmployeeService};

/// Process-wide handles, built once at startup and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub employee_service: Arc<dyn EmployeeService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    /// Wires the services over an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let employee_service =
            Arc::new(SeaOrmEmployeeService::new(store.clone())) as Arc<dyn EmployeeService>;

        Self {
            config: Arc::new(config),
            store,
            employee_service,
        }
    }
}
