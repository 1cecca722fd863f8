//! # ventas-api: REST Server for Ventas
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer (tower-http) ── span per request, status + latency         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::* handler                                                     │
//! │  ├── extract Path / Json (rejections → 400 ApiError)                   │
//! │  ├── Ledger call (ventas-db)                                           │
//! │  └── dto::* view + links::* hypermedia                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  JSON response  or  { code, error } with 400 / 404 / 409 / 500         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`build_app`] is what `main` serves and what the black-box tests spawn.

use axum::Router;
use tower_http::trace::TraceLayer;
use ventas_db::Ledger;

pub mod config;
pub mod dto;
pub mod error;
pub mod links;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router over `ledger`.
pub fn build_app(ledger: Ledger) -> Router {
    routes::router()
        .with_state(AppState::new(ledger))
        .layer(TraceLayer::new_for_http())
}
