use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers::reference, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/areas", get(reference::list_areas).post(reference::create_area))
        .route(
            "/api/areas/:id",
            put(reference::update_area).delete(reference::delete_area),
        )
        .route(
            "/api/districts",
            get(reference::list_districts).post(reference::create_district),
        )
        .route(
            "/api/districts/:id",
            put(reference::update_district).delete(reference::delete_district),
        )
        .route(
            "/api/properties",
            get(reference::list_properties).post(reference::create_property),
        )
        .route(
            "/api/properties/:id",
            put(reference::update_property).delete(reference::delete_property),
        )
        .route(
            "/api/residence-types",
            get(reference::list_residence_types).post(reference::create_residence_type),
        )
        .route(
            "/api/residence-types/:id",
            put(reference::update_residence_type).delete(reference::delete_residence_type),
        )
        .route(
            "/api/services",
            get(reference::list_services).post(reference::create_service),
        )
        .route(
            "/api/services/:id",
            put(reference::update_service).delete(reference::delete_service),
        )
}
