use crate::errors::{BookingError, BookingResult};
use crate::models::booking::Quote;
use crate::models::service::Frequency;

const WEEKS_PER_MONTH: u32 = 4;

/// Longest contract the dashboard can book, in months.
pub const MAX_DURATION_MONTHS: u32 = 60;

/// Visits covered by a booking: one for one-time, otherwise the weekly
/// visit count over the contract length. `None` when the count overflows.
pub fn visit_count(frequency: Option<Frequency>, duration_months: Option<u32>) -> Option<u32> {
    match frequency {
        None | Some(Frequency::OneTime) => Some(1),
        Some(frequency) => {
            let per_week = u32::try_from(frequency.required_slots()).ok()?;
            per_week
                .checked_mul(WEEKS_PER_MONTH)?
                .checked_mul(duration_months.unwrap_or(1))
                .map(|visits| visits.max(1))
        }
    }
}

pub fn quote(
    unit_price: i64,
    currency: &str,
    cleaner_count: u32,
    frequency: Option<Frequency>,
    duration_months: Option<u32>,
) -> BookingResult<Quote> {
    let overflow = || {
        BookingError::Validation(format!(
            "booking of {} month(s) is too large to price",
            duration_months.unwrap_or(1)
        ))
    };
    let visits = visit_count(frequency, duration_months).ok_or_else(overflow)?;
    let cleaner_count = cleaner_count.max(1);
    let total_amount = unit_price
        .checked_mul(i64::from(visits))
        .and_then(|amount| amount.checked_mul(i64::from(cleaner_count)))
        .ok_or_else(overflow)?;
    Ok(Quote {
        unit_price,
        visits,
        cleaner_count,
        total_amount,
        currency: currency.to_string(),
    })
}
