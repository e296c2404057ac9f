// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::store::AppointmentStore;

pub fn appointment_routes(store: Arc<AppointmentStore>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/{appointment_id}",
            put(handlers::update_appointment).delete(handlers::delete_appointment),
        )
        .route("/shift/{appointment_id}", post(handlers::shift_appointment))
        .with_state(store)
}
