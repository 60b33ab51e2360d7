//! HTTP API server for the storefront order core.
//!
//! Provides JSON endpoints for browsing the catalog, managing a cart,
//! checking out and confirming payment, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod sessions;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use checkout::{CheckoutCoordinator, InMemoryPaymentService, PaymentService};
use domain::DomainError;
use metrics_exporter_prometheus::PrometheusHandle;
use store::InMemoryStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use sessions::{InMemorySessions, SessionLookup};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub coordinator: CheckoutCoordinator<Arc<dyn PaymentService>>,
    pub sessions: Arc<dyn SessionLookup>,
}

impl AppState {
    pub fn new(
        store: InMemoryStore,
        payment: Arc<dyn PaymentService>,
        sessions: Arc<dyn SessionLookup>,
        config: &Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            coordinator: CheckoutCoordinator::with_config(store, payment, config.checkout()),
            sessions,
        })
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/items", get(routes::items::list))
        .route("/items/{sku}", get(routes::items::get))
        .route("/cart", get(routes::cart::get))
        .route("/cart/add", post(routes::cart::add))
        .route("/cart/remove", post(routes::cart::remove))
        .route("/cart/total", get(routes::cart::total))
        .route("/checkout", post(routes::orders::checkout))
        .route("/orders", get(routes::orders::history))
        .route("/orders/confirm", post(routes::orders::confirm))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: an in-memory store (seeded with
/// the demo catalog unless disabled), the in-memory payment processor and
/// the demo sessions.
pub async fn create_default_state(config: &Config) -> Result<Arc<AppState>, DomainError> {
    let store = InMemoryStore::new();
    if config.seed_catalog {
        store::seed::seed_demo_catalog(&store).await?;
    }

    Ok(AppState::new(
        store,
        Arc::new(InMemoryPaymentService::new()),
        Arc::new(InMemorySessions::with_demo_users()),
        config,
    ))
}
