use crate::models::{DbTeam, DbTeamMember, DbTeamSchedule};
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn list_teams(pool: &Pool<Postgres>) -> Result<Vec<DbTeam>> {
    let teams = sqlx::query_as::<_, DbTeam>(
        r#"
        SELECT id, name
        FROM teams
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(teams)
}

pub async fn list_team_members(pool: &Pool<Postgres>) -> Result<Vec<DbTeamMember>> {
    let members = sqlx::query_as::<_, DbTeamMember>(
        r#"
        SELECT id, team_id, name, role
        FROM team_members
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(members)
}

/// Schedules with `start <= date <= end`, ordered for display.
pub async fn list_schedules(pool: &Pool<Postgres>, start: NaiveDate, end: NaiveDate) -> Result<Vec<DbTeamSchedule>> {
    tracing::debug!("Listing team schedules: start={}, end={}", start, end);

    let schedules = sqlx::query_as::<_, DbTeamSchedule>(
        r#"
        SELECT id, team_id, date, start_time, end_time, is_blocked, is_available, is_booked,
               booking_id, status, area_id, district_id, property_id
        FROM team_schedules
        WHERE date >= $1 AND date <= $2
        ORDER BY date ASC, start_time ASC, end_time ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(schedules)
}
