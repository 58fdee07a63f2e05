//! # REST API Interface Layer
//!
//! HTTP endpoints of the demo: an index listing and one CSV download per
//! model. Handlers only translate between HTTP and the domain layer; export
//! failures are logged and reported as `500 Internal Server Error`.

pub mod export_apis;
pub mod index_apis;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::BankService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub bank_service: BankService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(bank_service: BankService, config: AppConfig) -> Self {
        Self {
            bank_service,
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_apis::index))
        .route("/customer/csv/", get(export_apis::customer_csv))
        .route("/account/csv/", get(export_apis::account_csv))
        .route("/transaction/csv/", get(export_apis::transaction_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
