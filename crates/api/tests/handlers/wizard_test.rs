use axum::http::StatusCode;
use brightbook_core::{errors::BookingError, models::booking::BlockedBooking};
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{
    advance, build_state, intent, open_session, test_server, walk_regular_to_confirmation, walk_to_schedule,
    Fixture,
};

#[tokio::test]
async fn test_create_session_starts_on_customer_step() {
    let state = build_state(Fixture::new().backend());
    let server = test_server(state.clone());

    let id = open_session(&server).await;

    let body = server.get(&format!("/api/wizard/{id}")).await.json::<Value>();
    assert_eq!(body["total_steps"], 7);
    assert_eq!(body["next_disabled"], true);
    assert_eq!(body["countdown"], "0:00");
    assert_eq!(state.sessions.len().await, 1);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = test_server(build_state(Fixture::new().backend()));

    let response = server.get(&format!("/api/wizard/{}", Uuid::new_v4())).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("Wizard session"));
}

#[tokio::test]
async fn test_advance_without_customer_is_rejected() {
    let server = test_server(build_state(Fixture::new().backend()));
    let id = open_session(&server).await;

    let response = advance(&server, id).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = server.get(&format!("/api/wizard/{id}")).await.json::<Value>();
    assert_eq!(body["current_step"], 1);
}

#[tokio::test]
async fn test_malformed_intent_is_rejected() {
    let server = test_server(build_state(Fixture::new().backend()));
    let id = open_session(&server).await;

    let response = intent(&server, id, json!({ "type": "paint_the_house" })).await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_cancel_on_first_step_opens_prompt() {
    let server = test_server(build_state(Fixture::new().backend()));
    let id = open_session(&server).await;

    let body = server.post(&format!("/api/wizard/{id}/cancel")).await.json::<Value>();
    assert_eq!(body["cancel"], "prompt_opened");
    assert_eq!(body["cancel_prompt_open"], true);

    let body = server
        .post(&format!("/api/wizard/{id}/cancel/dismiss"))
        .await
        .json::<Value>();
    assert_eq!(body["cancel_prompt_open"], false);
    assert_eq!(body["current_step"], 1);
}

#[tokio::test]
async fn test_cancel_past_first_step_goes_back() {
    let fixture = Fixture::new();
    let server = test_server(build_state(fixture.backend()));
    let id = open_session(&server).await;
    intent(&server, id, json!({ "type": "select_customer", "customer_id": fixture.customer.id }))
        .await
        .assert_status_ok();
    advance(&server, id).await.assert_status_ok();

    let body = server.post(&format!("/api/wizard/{id}/cancel")).await.json::<Value>();

    assert_eq!(body["cancel"], json!({ "retreated": "customer" }));
    assert_eq!(body["current_step"], 1);
    assert_eq!(body["cancel_prompt_open"], false);
}

#[test_log::test(tokio::test)]
async fn test_deep_clean_is_booked_on_submit() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend
        .expect_create_deep_booking()
        .times(1)
        .returning(move |_| Ok(booking_id));
    let server = test_server(build_state(backend));
    let id = open_session(&server).await;

    walk_to_schedule(&server, id, &fixture, fixture.deep.id).await;
    intent(&server, id, json!({ "type": "set_start_date", "start_date": "2026-11-02" }))
        .await
        .assert_status_ok();
    let body = advance(&server, id).await.json::<Value>();
    assert_eq!(body["current_step"], 7);
    assert_eq!(body["visible_steps"], json!([1, 2, 3, 4, 7]));

    let response = server.post(&format!("/api/wizard/{id}/submit")).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["submission"]["outcome"], "created");
    assert_eq!(body["submission"]["booking_id"], booking_id.to_string());
    assert_eq!(body["current_step"], 1);
}

#[test_log::test(tokio::test)]
async fn test_regular_booking_blocks_then_confirms() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend
        .expect_block_booking()
        .withf(|payload| payload.timeslots.len() == 2 && payload.team_id.is_some())
        .times(1)
        .returning(move |_| {
            Ok(BlockedBooking {
                booking_id,
                expires_at: None,
            })
        });
    backend
        .expect_confirm_booking()
        .with(predicate::eq(booking_id))
        .times(1)
        .returning(|_| Ok(()));
    let server = test_server(build_state(backend));
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;

    let body = server.post(&format!("/api/wizard/{id}/submit")).await.json::<Value>();
    assert_eq!(body["submission"]["outcome"], "blocked");
    assert_eq!(body["hold"]["state"], "blocked");
    assert!(body["time_left"].as_u64().unwrap() > 590);

    // The slots are held, so the form can be neither walked back nor edited.
    server
        .post(&format!("/api/wizard/{id}/retreat"))
        .await
        .assert_status(StatusCode::CONFLICT);
    intent(&server, id, json!({ "type": "set_start_date", "start_date": "2027-01-04" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = server.post(&format!("/api/wizard/{id}/confirm")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["confirmed_booking_id"], booking_id.to_string());
    assert_eq!(body["current_step"], 1);
}

#[tokio::test]
async fn test_confirm_after_hold_lapsed_is_gone() {
    let fixture = Fixture::new();
    let booking_id = fixture.booking_id;
    let mut backend = fixture.backend();
    backend.expect_block_booking().returning(move |_| {
        Ok(BlockedBooking {
            booking_id,
            expires_at: Some(Utc::now() - Duration::seconds(1)),
        })
    });
    backend
        .expect_release_booking()
        .with(predicate::eq(booking_id))
        .times(1)
        .returning(|_| Ok(()));
    backend.expect_confirm_booking().never();
    let server = test_server(build_state(backend));
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;
    server.post(&format!("/api/wizard/{id}/submit")).await.assert_status_ok();

    let response = server.post(&format!("/api/wizard/{id}/confirm")).await;

    response.assert_status(StatusCode::GONE);
    let body = server.get(&format!("/api/wizard/{id}")).await.json::<Value>();
    assert_eq!(body["hold"]["state"], "expired");
}

#[tokio::test]
async fn test_rejected_block_keeps_the_draft() {
    let fixture = Fixture::new();
    let mut backend = fixture.backend();
    backend
        .expect_block_booking()
        .returning(|_| Err(BookingError::Conflict("slot already taken".to_string())));
    let server = test_server(build_state(backend));
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;

    let response = server.post(&format!("/api/wizard/{id}/submit")).await;

    response.assert_status(StatusCode::CONFLICT);
    let body = server.get(&format!("/api/wizard/{id}")).await.json::<Value>();
    assert_eq!(body["current_step"], 7);
    assert_eq!(body["hold"]["state"], "draft");
    assert_eq!(body["draft"]["bundle_id"], "mon-wed");
}

#[tokio::test]
async fn test_confirmed_cancel_releases_blocked_booking() {
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
    let server = test_server(build_state(backend));
    let id = open_session(&server).await;
    walk_regular_to_confirmation(&server, id, &fixture).await;
    server.post(&format!("/api/wizard/{id}/submit")).await.assert_status_ok();

    let body = server.post(&format!("/api/wizard/{id}/cancel")).await.json::<Value>();
    assert_eq!(body["cancel"], "prompt_opened");

    let body = server
        .post(&format!("/api/wizard/{id}/cancel/confirm"))
        .await
        .json::<Value>();
    assert_eq!(body["current_step"], 1);
    assert_eq!(body["hold"]["state"], "draft");
}

#[tokio::test]
async fn test_delete_session_releases_blocked_booking() {
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

    let body = server.delete(&format!("/api/wizard/{id}")).await.json::<Value>();

    assert_eq!(body["deleted"], true);
    assert!(state.sessions.is_empty().await);
    server
        .get(&format!("/api/wizard/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
