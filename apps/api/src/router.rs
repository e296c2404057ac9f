use std::sync::Arc;

use axum::{routing::get, Router};

use scheduling_cell::router::appointment_routes;
use scheduling_cell::store::AppointmentStore;

pub fn create_router(store: Arc<AppointmentStore>) -> Router {
    Router::new()
        .route("/", get(|| async { "Agenda API is running!" }))
        .nest("/appointments", appointment_routes(store))
}
