use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::customer, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/customers",
            get(customer::search_customers).post(customer::create_customer),
        )
        .route("/api/customers/:id", get(customer::get_customer))
}
