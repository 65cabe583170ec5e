use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/availability",
            get(handlers::availability::get_availability)
                .post(handlers::availability::create_availability)
                .put(handlers::availability::replace_availability),
        )
        .route(
            "/api/availability/:id/slots",
            get(handlers::availability::query_slots),
        )
}
