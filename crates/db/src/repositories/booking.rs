use crate::models::{parse_time, DbBooking, BOOKING_BLOCKED, BOOKING_CONFIRMED, BOOKING_RELEASED};
use brightbook_core::models::{
    booking::FinalBookingPayload, bundle::SelectedTimeSlot, service::SelectedItem,
};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, customer_id, team_id, total_amount, currency, start_date, end_date, \
     status, payment_status, expires_at, created_at";

async fn insert_booking(
    tx: &mut Transaction<'_, Postgres>,
    payload: &FinalBookingPayload,
    status: &str,
    expires_at: Option<DateTime<Utc>>,
) -> Result<DbBooking> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        INSERT INTO bookings (id, customer_id, team_id, service_id, sub_service_id, area_id,
                              district_id, property_id, residence_type_id, apartment_number,
                              presence, special_instructions, cleaner_count, total_amount,
                              currency, start_date, end_date, frequency, status, payment_status,
                              expires_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(payload.user_id)
    .bind(payload.team_id)
    .bind(payload.service_id)
    .bind(payload.sub_service_id)
    .bind(payload.area_id)
    .bind(payload.district_id)
    .bind(payload.property_id)
    .bind(payload.residence_type_id)
    .bind(&payload.apartment_number)
    .bind(payload.presence)
    .bind(&payload.special_instructions)
    .bind(i32::try_from(payload.cleaner_count)?)
    .bind(payload.total_amount)
    .bind(&payload.currency)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.frequency.map(|frequency| frequency.as_str()))
    .bind(status)
    .bind(&payload.payment_status)
    .bind(expires_at)
    .bind(Utc::now())
    .fetch_one(&mut **tx)
    .await?;

    Ok(booking)
}

async fn insert_slots(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
    slots: &[SelectedTimeSlot],
    renewal: bool,
) -> Result<()> {
    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO booking_slots (booking_id, schedule_id, date, start_time, end_time, renewal)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (booking_id, schedule_id) DO NOTHING
            "#,
        )
        .bind(booking_id)
        .bind(slot.schedule_id)
        .bind(slot.date)
        .bind(parse_time(&slot.start_time)?)
        .bind(parse_time(&slot.end_time)?)
        .bind(renewal)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Creates a `blocked` booking and reserves its schedules until
/// `expires_at`. Returns `None`, writing nothing, when any of the requested
/// schedules is no longer free.
pub async fn block_booking(
    pool: &Pool<Postgres>,
    payload: &FinalBookingPayload,
    expires_at: DateTime<Utc>,
) -> Result<Option<DbBooking>> {
    let mut tx = pool.begin().await?;

    let booking = insert_booking(&mut tx, payload, BOOKING_BLOCKED, Some(expires_at)).await?;

    for slot in &payload.timeslots {
        let reserved = sqlx::query(
            r#"
            UPDATE team_schedules
            SET is_booked = TRUE, booking_id = $1
            WHERE id = $2 AND is_available AND NOT is_booked AND NOT is_blocked
            "#,
        )
        .bind(booking.id)
        .bind(slot.schedule_id)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            tracing::debug!(
                "Schedule {} is no longer free, rolling back booking {}",
                slot.schedule_id, booking.id
            );
            tx.rollback().await?;
            return Ok(None);
        }
    }

    insert_slots(&mut tx, booking.id, &payload.timeslots, false).await?;
    insert_slots(&mut tx, booking.id, &payload.renewal_slots, true).await?;
    tx.commit().await?;

    tracing::debug!("Booking blocked: id={}, expires_at={}", booking.id, expires_at);
    Ok(Some(booking))
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Confirms a blocked booking whose hold has not run out. Returns `None`
/// when no such booking exists.
pub async fn confirm_booking(pool: &Pool<Postgres>, id: Uuid, now: DateTime<Utc>) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, expires_at = NULL
        WHERE id = $1 AND status = $3 AND (expires_at IS NULL OR expires_at > $4)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(BOOKING_CONFIRMED)
    .bind(BOOKING_BLOCKED)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

/// Frees the schedules held by a blocked booking and marks it released.
/// Returns whether a blocked booking was found.
pub async fn release_booking(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let released = sqlx::query(
        r#"
        UPDATE bookings
        SET status = $2, expires_at = NULL
        WHERE id = $1 AND status = $3
        "#,
    )
    .bind(id)
    .bind(BOOKING_RELEASED)
    .bind(BOOKING_BLOCKED)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE team_schedules
        SET is_booked = FALSE, booking_id = NULL
        WHERE booking_id = $1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Booking released: id={}, found={}", id, released.rows_affected() > 0);
    Ok(released.rows_affected() > 0)
}

/// Ids of blocked bookings whose hold ran out before `now`.
pub async fn expired_booking_ids(pool: &Pool<Postgres>, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM bookings
        WHERE status = $1 AND expires_at IS NOT NULL AND expires_at <= $2
        "#,
    )
    .bind(BOOKING_BLOCKED)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Stores a booking that needs no slot hold, with its optional line items.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    payload: &FinalBookingPayload,
    items: &[SelectedItem],
) -> Result<DbBooking> {
    let mut tx = pool.begin().await?;

    let booking = insert_booking(&mut tx, payload, &payload.status, None).await?;
    insert_slots(&mut tx, booking.id, &payload.timeslots, false).await?;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO booking_items (booking_id, item_id, name, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(booking.id)
        .bind(item.id)
        .bind(&item.name)
        .bind(i32::try_from(item.quantity)?)
        .bind(item.unit_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!("Booking created: id={}, status={}", booking.id, booking.status);
    Ok(booking)
}
