//! Two-phase booking: a regular booking is first blocked (slots reserved)
//! and has to be confirmed before its hold window runs out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::booking::BlockedBooking;

pub const DEFAULT_HOLD_SECONDS: u32 = 600;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BookingHold {
    #[default]
    Draft,
    Blocked {
        booking_id: Uuid,
        expires_at: DateTime<Utc>,
    },
    Confirmed {
        booking_id: Uuid,
    },
    Expired {
        booking_id: Uuid,
    },
    Cancelled,
}

impl BookingHold {
    /// Enters `Blocked`. The backend's deadline is used when it reports one,
    /// otherwise the hold runs `window_seconds` from `now`.
    pub fn block(&mut self, blocked: &BlockedBooking, now: DateTime<Utc>, window_seconds: u32) {
        let expires_at = blocked
            .expires_at
            .unwrap_or_else(|| now + Duration::seconds(i64::from(window_seconds)));
        *self = BookingHold::Blocked {
            booking_id: blocked.booking_id,
            expires_at,
        };
    }

    pub fn booking_id(&self) -> Option<Uuid> {
        match self {
            BookingHold::Blocked { booking_id, .. }
            | BookingHold::Confirmed { booking_id }
            | BookingHold::Expired { booking_id } => Some(*booking_id),
            BookingHold::Draft | BookingHold::Cancelled => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, BookingHold::Blocked { .. })
    }

    /// Whole seconds left on the hold, never negative.
    pub fn time_left(&self, now: DateTime<Utc>) -> u32 {
        match self {
            BookingHold::Blocked { expires_at, .. } => {
                let left = (*expires_at - now).num_seconds();
                u32::try_from(left.max(0)).unwrap_or(u32::MAX)
            }
            _ => 0,
        }
    }

    /// Moves a lapsed `Blocked` hold to `Expired` and returns the booking id
    /// whose slots need releasing.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> Option<Uuid> {
        match *self {
            BookingHold::Blocked {
                booking_id,
                expires_at,
            } if now >= expires_at => {
                *self = BookingHold::Expired { booking_id };
                Some(booking_id)
            }
            _ => None,
        }
    }

    /// Checks that the hold can still be confirmed and returns its booking id.
    pub fn confirmable(&mut self, now: DateTime<Utc>) -> BookingResult<Uuid> {
        if let Some(booking_id) = self.expire_if_due(now) {
            return Err(BookingError::Expired(format!(
                "hold on booking {booking_id} ran out before confirmation"
            )));
        }
        match self {
            BookingHold::Blocked { booking_id, .. } => Ok(*booking_id),
            BookingHold::Expired { booking_id } => Err(BookingError::Expired(format!(
                "hold on booking {booking_id} ran out before confirmation"
            ))),
            BookingHold::Confirmed { booking_id } => Err(BookingError::Conflict(format!(
                "booking {booking_id} is already confirmed"
            ))),
            BookingHold::Draft | BookingHold::Cancelled => Err(BookingError::Validation(
                "no blocked booking to confirm".to_string(),
            )),
        }
    }

    pub fn mark_confirmed(&mut self) {
        if let Some(booking_id) = self.booking_id() {
            *self = BookingHold::Confirmed { booking_id };
        }
    }

    /// Drops a blocked hold, returning the booking id to release.
    pub fn cancel(&mut self) -> Option<Uuid> {
        let released = match self {
            BookingHold::Blocked { booking_id, .. } => Some(*booking_id),
            _ => None,
        };
        *self = BookingHold::Cancelled;
        released
    }
}

/// A one-second countdown as shown next to the confirm button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    pub fn from_hold(hold: &BookingHold, now: DateTime<Utc>) -> Self {
        Self::new(hold.time_left(now))
    }

    /// Advances one second; stays pinned at zero.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// `m:ss`, minutes unpadded and seconds zero-padded.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_SECONDS)
    }
}
