//! API Routes
//!
//! - `/` - Single-page UI
//! - `/api/health` - Health check
//! - `/api/recommendations` - Budget optimizer
//! - `/api/reviews` - Review sentiment
//! - `/api/buying-guide` - Buying guide
//! - `/api/compare` - Cross-retailer comparison
//! - `/api/trending` - Trending products

pub mod assistant;
pub mod health;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(assistant::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
