//! ceazy-web library - storefront HTTP service
//!
//! Exposes the album catalog and purchase-intent endpoints consumed by
//! the site frontend. The frontend is the only intended caller; its
//! whole contract with this service is the JSON API built here.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ceazy_common::config::Config;
use ceazy_common::CatalogStore;

use crate::payment::CheckoutGateway;

pub mod api;
pub mod error;
pub mod payment;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one album store; handlers never re-declare catalog data
    pub store: Arc<CatalogStore>,
    /// Payment processor seam (trait object so tests can stub it)
    pub checkout: Arc<dyn CheckoutGateway>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<CatalogStore>, checkout: Arc<dyn CheckoutGateway>, config: Config) -> Self {
        Self {
            store,
            checkout,
            config: Arc::new(config),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/albums", get(api::list_albums))
        .route("/api/albums/:id", get(api::get_album))
        .route("/api/purchase/:id", post(api::purchase_album))
        .route("/api/create-payment-intent", post(api::create_payment_intent))
        .merge(api::health_routes())
        .with_state(state)
        // The frontend may be served from another origin during development
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// CORS policy of the public API: any origin, the usual methods, and the
/// Content-Type/Authorization headers. Preflight OPTIONS requests are
/// answered by the layer with 200 and no body.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
