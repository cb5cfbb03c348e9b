// src/routes.rs

use axum::{Router, routing::post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{handlers::database, state::AppState};

/// Assembles the application router.
///
/// * `POST /database` is the only route.
/// * Every request is traced.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/database", post(database::submit_question))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
