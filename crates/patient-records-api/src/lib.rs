//! HTTP surface for the patient record store.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/` | 200 | |
//! | GET | `/view` | 200 | |
//! | GET | `/patient/:id` | 200 | 404 |
//! | GET | `/sort?sort_by=&order=` | 200 | 400 |
//! | POST | `/create` | 201 | 400 duplicate id, 422 invalid |
//! | PUT | `/put/:id` | 202 | 404, 422 |
//! | DELETE | `/delete/:id` | 200 | 404 |
//!
//! Handlers run store calls on the blocking pool; every error is turned into a
//! `{"detail": ...}` body by [`ApiError`].

pub mod config;
pub mod error;
mod routes;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use patient_records_core::PatientStore;
use tower_http::trace::TraceLayer;

pub use crate::config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<PatientStore>,
}

impl AppState {
    pub fn new(store: PatientStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the router over `store`.
pub fn app(store: PatientStore) -> Router {
    Router::new()
        .route("/", get(routes::home))
        .route("/view", get(routes::view_patients))
        .route("/patient/:patient_id", get(routes::view_patient))
        .route("/sort", get(routes::sort_patients))
        .route("/create", post(routes::create_patient))
        .route("/put/:patient_id", put(routes::update_patient))
        .route("/delete/:patient_id", delete(routes::delete_patient))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(store))
}
