use brightbook_core::{
    errors::BookingError,
    hold::{BookingHold, Countdown, DEFAULT_HOLD_SECONDS},
    models::booking::BlockedBooking,
};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

fn blocked(expires_in: Option<i64>) -> (BookingHold, Uuid, chrono::DateTime<Utc>) {
    let now = Utc::now();
    let booking_id = Uuid::new_v4();
    let mut hold = BookingHold::default();
    hold.block(
        &BlockedBooking {
            booking_id,
            expires_at: expires_in.map(|seconds| now + Duration::seconds(seconds)),
        },
        now,
        DEFAULT_HOLD_SECONDS,
    );
    (hold, booking_id, now)
}

#[test]
fn test_countdown_reaches_zero_and_stays_there() {
    let mut countdown = Countdown::default();
    assert_eq!(countdown.remaining(), 600);

    for _ in 0..600 {
        countdown.tick();
    }
    assert_eq!(countdown.remaining(), 0);
    assert!(countdown.is_finished());

    assert_eq!(countdown.tick(), 0);
    assert_eq!(countdown.remaining(), 0);
}

#[rstest]
#[case(600, "10:00")]
#[case(599, "9:59")]
#[case(65, "1:05")]
#[case(9, "0:09")]
#[case(0, "0:00")]
fn test_countdown_display(#[case] seconds: u32, #[case] expected: &str) {
    assert_eq!(Countdown::new(seconds).display(), expected);
}

#[test]
fn test_block_uses_local_window_without_backend_deadline() {
    let (hold, booking_id, now) = blocked(None);
    assert_eq!(
        hold,
        BookingHold::Blocked {
            booking_id,
            expires_at: now + Duration::seconds(600),
        }
    );
    assert_eq!(hold.time_left(now), 600);
    assert_eq!(hold.time_left(now + Duration::seconds(1000)), 0);
}

#[test]
fn test_backend_deadline_is_authoritative() {
    let (hold, _, now) = blocked(Some(120));
    assert_eq!(hold.time_left(now), 120);
    assert_eq!(Countdown::from_hold(&hold, now + Duration::seconds(60)).display(), "1:00");
}

#[test]
fn test_expire_if_due() {
    let (mut hold, booking_id, now) = blocked(None);
    assert_eq!(hold.expire_if_due(now + Duration::seconds(599)), None);
    assert!(hold.is_blocked());

    assert_eq!(hold.expire_if_due(now + Duration::seconds(600)), Some(booking_id));
    assert_eq!(hold, BookingHold::Expired { booking_id });
    assert_eq!(hold.expire_if_due(now + Duration::seconds(700)), None);
}

#[test]
fn test_confirmable_states() {
    let (mut hold, booking_id, now) = blocked(None);
    assert_eq!(hold.confirmable(now).unwrap(), booking_id);

    hold.mark_confirmed();
    assert_eq!(hold, BookingHold::Confirmed { booking_id });
    assert!(matches!(hold.confirmable(now), Err(BookingError::Conflict(_))));

    let mut draft = BookingHold::Draft;
    assert!(matches!(draft.confirmable(now), Err(BookingError::Validation(_))));

    let (mut late, _, now) = blocked(None);
    assert!(matches!(
        late.confirmable(now + Duration::seconds(601)),
        Err(BookingError::Expired(_))
    ));
}

#[test]
fn test_cancel_returns_blocked_booking() {
    let (mut hold, booking_id, _) = blocked(None);
    assert_eq!(hold.cancel(), Some(booking_id));
    assert_eq!(hold, BookingHold::Cancelled);
    assert_eq!(hold.booking_id(), None);
    assert_eq!(hold.cancel(), None);
}

#[test]
fn test_hold_serializes_with_state_tag() {
    let (hold, booking_id, _) = blocked(None);
    let json = serde_json::to_value(&hold).unwrap();
    assert_eq!(json["state"], "blocked");
    assert_eq!(json["booking_id"], booking_id.to_string());

    let draft = serde_json::to_value(BookingHold::Draft).unwrap();
    assert_eq!(draft, serde_json::json!({ "state": "draft" }));
}
