//! HTTP JSON API over the ledger
//!
//! Routes are organized into modules:
//! - routes::accounts: Account CRUD
//! - routes::transactions: Transaction CRUD and period listing
//! - routes::recurrences: Recurring templates and their application
//! - routes::reports: Report history, recalculation, dashboard and budget

pub mod error;
pub mod routes;

use arthik_config::Config;
use arthik_core::SharedLedger;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{create_account, delete_account, list_accounts, update_account};
    use routes::recurrences::{apply_recurrence, delete_recurrence, list_recurrences, save_recurrence};
    use routes::reports::{budget, dashboard, list_reports, recalculate};
    use routes::transactions::{create_transaction, delete_transaction, list_transactions, update_transaction};

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/:name", put(update_account).delete(delete_account))
        .route("/api/transactions", get(list_transactions).post(create_transaction))
        .route("/api/transactions/:id", put(update_transaction).delete(delete_transaction))
        .route("/api/recurrences", get(list_recurrences).post(save_recurrence))
        .route("/api/recurrences/:id", axum::routing::delete(delete_recurrence))
        .route("/api/recurrences/:id/apply", post(apply_recurrence))
        .route("/api/reports", get(list_reports))
        .route("/api/reports/recalculate", post(recalculate))
        .route("/api/dashboard", get(dashboard))
        .route("/api/budget", get(budget))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Bind the configured address and serve until `shutdown` resolves
pub async fn start_server(
    config: Config,
    ledger: SharedLedger,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let router = create_router(AppState { ledger, config });

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting arthik server on http://{}", addr);

    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
