use std::collections::HashMap;

use brightbook_api::config::ApiConfig;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/brightbook")])).unwrap();

    assert_eq!(config.server_addr(), "0.0.0.0:3000");
    assert_eq!(config.database_url, "postgres://localhost/brightbook");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.cors_origins, None);
    assert_eq!(config.request_timeout, 30);
    assert_eq!(config.hold_seconds, 600);
    assert_eq!(config.expiry_sweep_interval, 15);
    assert_eq!(config.session_idle_ttl, 3600);
}

#[test]
fn test_database_url_is_required() {
    let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();

    assert!(err.to_string().contains("DATABASE_URL"));
}

#[test]
fn test_overrides() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/brightbook"),
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("LOG_LEVEL", "debug"),
        ("API_CORS_ORIGINS", "http://localhost:5173, https://admin.example.com,"),
        ("BOOKING_HOLD_SECONDS", "300"),
        ("EXPIRY_SWEEP_INTERVAL_SECONDS", "5"),
        ("SESSION_IDLE_TTL_SECONDS", "900"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(
        config.cors_origins,
        Some(vec![
            "http://localhost:5173".to_string(),
            "https://admin.example.com".to_string()
        ])
    );
    assert_eq!(config.hold_seconds, 300);
    assert_eq!(config.expiry_sweep_interval, 5);
    assert_eq!(config.session_idle_ttl, 900);
}

#[rstest]
#[case("0")]
#[case("-5")]
#[case("ten minutes")]
fn test_invalid_hold_seconds(#[case] value: &str) {
    let result = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/brightbook"),
        ("BOOKING_HOLD_SECONDS", value),
    ]));

    assert!(result.unwrap_err().to_string().contains("BOOKING_HOLD_SECONDS"));
}

#[test]
fn test_invalid_port() {
    let result = ApiConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://db/brightbook"),
        ("API_PORT", "eighty"),
    ]));

    assert!(result.is_err());
}
