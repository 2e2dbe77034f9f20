use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers::wizard, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/wizard", post(wizard::create_session))
        .route(
            "/api/wizard/:id",
            get(wizard::get_session).delete(wizard::delete_session),
        )
        .route("/api/wizard/:id/intents", post(wizard::apply_intent))
        .route("/api/wizard/:id/advance", post(wizard::advance))
        .route("/api/wizard/:id/retreat", post(wizard::retreat))
        .route("/api/wizard/:id/cancel", post(wizard::cancel))
        .route("/api/wizard/:id/cancel/dismiss", post(wizard::dismiss_cancel))
        .route("/api/wizard/:id/cancel/confirm", post(wizard::confirm_cancel))
        .route("/api/wizard/:id/submit", post(wizard::submit))
        .route("/api/wizard/:id/confirm", post(wizard::confirm))
}
