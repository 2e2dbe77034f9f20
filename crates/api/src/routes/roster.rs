use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers::roster, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/roster", get(roster::get_week))
        .route("/api/teams", get(roster::list_teams))
}
