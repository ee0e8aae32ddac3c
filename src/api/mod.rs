use axum::{
    Json, Router,
    http::HeaderValue,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use sha2::{Digest, Sha512};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod assets;
mod employees;
mod error;
mod observability;
mod system;
pub mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::EmployeeService;
use metrics_exporter_prometheus::PrometheusHandle;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn employee_service(&self) -> &Arc<dyn EmployeeService> {
        &self.shared.employee_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Derives the 64-byte cookie signing key from the configured secret.
fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!("Handler panicked: {}", detail);

    let (status, body) = error::internal_error_body();
    (status, Json(body)).into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_signed(session_key(&server.session_secret))
        .with_secure(server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(60)));

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(cors::Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest(API_PREFIX, api_router())
        .route("/metrics", get(observability::get_metrics))
        .fallback(assets::serve_asset)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(session_layer)
        .layer(cors_layer.allow_methods(cors::Any).allow_headers(cors::Any))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/{id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route(
            "/employees/by-number/{number}",
            get(employees::get_employee_by_number),
        )
        .route("/health", get(system::health))
        .route("/health/ready", get(system::health_ready))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_is_stable_per_secret() {
        let a = session_key("dev-secret-key");
        let b = session_key("dev-secret-key");
        let c = session_key("another-secret");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }

    #[tokio::test]
    async fn panics_become_internal_server_error() {
        use http_body_util::BodyExt;

        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Internal server error" }));
    }
}
