use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{build_state, test_server, Fixture};

#[tokio::test]
async fn test_health_reports_open_sessions() {
    let server = test_server(build_state(Fixture::new().backend()));

    let body = server.get("/health").await.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_sessions"], 0);

    server.post("/api/wizard").await.assert_status_ok();
    server.post("/api/wizard").await.assert_status_ok();

    let body = server.get("/health").await.json::<Value>();
    assert_eq!(body["active_sessions"], 2);
}

#[tokio::test]
async fn test_version() {
    let server = test_server(build_state(Fixture::new().backend()));

    let body = server.get("/version").await.json::<Value>();

    assert_eq!(body["name"], "brightbook-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
