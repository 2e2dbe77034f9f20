use axum::http::StatusCode;
use brightbook_api::sessions::{evict_idle, lock_session, sweep_expired, SessionStore};
use brightbook_core::{errors::BookingError, models::booking::BlockedBooking};
use brightbook_db::mock::MockBookingBackend;
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{
    build_state, open_session, test_server, walk_regular_to_confirmation, Fixture, HOLD_SECONDS,
};

#[tokio::test]
async fn test_store_create_get_remove() {
    let store = SessionStore::new();
    assert!(store.is_empty().await);

    let (id, _) = store.create(HOLD_SECONDS).await;
    assert_eq!(store.len().await, 1);
    assert!(store.get(id).await.is_ok());

    assert!(store.remove(id).await.is_some());
    assert!(matches!(store.get(id).await, Err(BookingError::NotFound(_))));
}

#[tokio::test]
async fn test_busy_session_rejects_second_action() {
    let state = build_state(Fixture::new().backend());
    let server = test_server(state.clone());
    let id = open_session(&server).await;

    let session = state.sessions.get(id).await.unwrap();
    let _held = lock_session(&session).unwrap();
    assert!(matches!(lock_session(&session), Err(BookingError::Conflict(_))));

    server
        .get(&format!("/api/wizard/{id}"))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[test_log::test(tokio::test)]
async fn test_sweep_releases_lapsed_hold_once() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend.expect_block_booking().returning(move |_| {
        Ok(BlockedBooking {
            booking_id,
            expires_at: Some(Utc::now() + Duration::seconds(30)),
        })
    });
    backend
        .expect_release_booking()
        .with(predicate::eq(booking_id))
        .times(1)
        .returning(|_| Ok(()));
    let state = build_state(backend);
    let server = test_server(state.clone());
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;
    server.post(&format!("/api/wizard/{id}/submit")).await.assert_status_ok();

    // Still inside the window.
    assert!(sweep_expired(&state.sessions, state.backend.as_ref(), Utc::now()).await.is_empty());

    let later = Utc::now() + Duration::seconds(60);
    assert_eq!(
        sweep_expired(&state.sessions, state.backend.as_ref(), later).await,
        vec![booking_id]
    );
    assert!(sweep_expired(&state.sessions, state.backend.as_ref(), later).await.is_empty());

    let body = server.get(&format!("/api/wizard/{id}")).await.json::<Value>();
    assert_eq!(body["hold"]["state"], "expired");
    assert_eq!(body["countdown"], "0:00");
}

#[tokio::test]
async fn test_sweep_skips_busy_sessions() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend.expect_block_booking().returning(move |_| {
        Ok(BlockedBooking {
            booking_id,
            expires_at: None,
        })
    });
    backend.expect_release_booking().never();
    let state = build_state(backend);
    let server = test_server(state.clone());
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;
    server.post(&format!("/api/wizard/{id}/submit")).await.assert_status_ok();

    let session = state.sessions.get(id).await.unwrap();
    let held = lock_session(&session).unwrap();
    let later = Utc::now() + Duration::seconds(i64::from(HOLD_SECONDS) + 1);

    assert!(sweep_expired(&state.sessions, state.backend.as_ref(), later).await.is_empty());
    assert!(held.hold().is_blocked());
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let store = SessionStore::new();
    let backend = MockBookingBackend::new();
    let idle_ttl = Duration::seconds(60);
    let (id, _) = store.create(HOLD_SECONDS).await;

    assert!(evict_idle(&store, &backend, Utc::now(), idle_ttl).await.is_empty());
    assert_eq!(store.len().await, 1);

    let later = Utc::now() + Duration::seconds(120);
    assert_eq!(evict_idle(&store, &backend, later, idle_ttl).await, vec![id]);
    assert!(store.is_empty().await);
}

#[test_log::test(tokio::test)]
async fn test_idle_eviction_releases_blocked_booking() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend.expect_block_booking().returning(move |_| {
        Ok(BlockedBooking {
            booking_id,
            expires_at: None,
        })
    });
    backend
        .expect_release_booking()
        .with(predicate::eq(booking_id))
        .times(1)
        .returning(|_| Ok(()));
    let state = build_state(backend);
    let server = test_server(state.clone());
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;
    server.post(&format!("/api/wizard/{id}/submit")).await.assert_status_ok();

    let later = Utc::now() + Duration::hours(2);
    let evicted = evict_idle(&state.sessions, state.backend.as_ref(), later, Duration::hours(1)).await;

    assert_eq!(evicted, vec![id]);
    server
        .get(&format!("/api/wizard/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_idle_eviction_skips_busy_sessions() {
    let store = SessionStore::new();
    let backend = MockBookingBackend::new();
    let (id, wizard) = store.create(HOLD_SECONDS).await;
    let _held = lock_session(&wizard).unwrap();

    let later = Utc::now() + Duration::hours(2);
    assert!(evict_idle(&store, &backend, later, Duration::hours(1)).await.is_empty());
    assert!(store.get(id).await.is_ok());
}
