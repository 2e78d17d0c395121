pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screenings", post(handlers::handle_analyze))
        .route(
            "/api/v1/screenings/:id",
            get(handlers::handle_get_screening),
        )
        .route(
            "/api/v1/screenings/:id/weaknesses",
            get(handlers::handle_get_weaknesses),
        )
        .route("/api/v1/screenings/:id/qa", post(handlers::handle_qa))
        .route(
            "/api/v1/screenings/:id/questions",
            post(handlers::handle_questions),
        )
        .route(
            "/api/v1/screenings/:id/rewrite",
            post(handlers::handle_rewrite),
        )
        .with_state(state)
}
