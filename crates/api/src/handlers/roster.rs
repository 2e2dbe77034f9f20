//! Roster calendar endpoints.
//!
//! Each request loads one week and cuts it to the requested team filter
//! exactly as the dashboard grid shows it.

use axum::{
    extract::{Query, State},
    Json,
};
use brightbook_core::{
    errors::BookingError,
    models::roster::Team,
    roster::{filter_by_teams, in_week, week_grid, week_range, WeekGrid},
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Deserialize;
use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

const DEFAULT_FIRST_HOUR: u32 = 6;
const DEFAULT_LAST_HOUR: u32 = 22;

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    /// First day of the week to show; defaults to this week's Monday.
    pub week_start: Option<NaiveDate>,
    /// Comma-separated team ids; empty or missing shows every team.
    pub team_ids: Option<String>,
    pub first_hour: Option<u32>,
    pub last_hour: Option<u32>,
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

pub fn parse_team_ids(raw: Option<&str>) -> Result<HashSet<Uuid>, AppError> {
    let Some(raw) = raw else {
        return Ok(HashSet::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            Uuid::parse_str(id)
                .map_err(|_| AppError(BookingError::Validation(format!("Invalid team id: {}", id))))
        })
        .collect()
}

#[axum::debug_handler]
pub async fn get_week(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<WeekGrid>, AppError> {
    let first_hour = query.first_hour.unwrap_or(DEFAULT_FIRST_HOUR);
    let last_hour = query.last_hour.unwrap_or(DEFAULT_LAST_HOUR);
    if first_hour >= last_hour || last_hour > 24 {
        return Err(AppError(BookingError::Validation(format!(
            "invalid hour range {}..{}",
            first_hour, last_hour
        ))));
    }
    let team_ids = parse_team_ids(query.team_ids.as_deref())?;
    let week_start = query.week_start.unwrap_or_else(|| monday_of(Utc::now().date_naive()));

    let (start, end) = week_range(week_start);
    let schedules: Vec<_> = state
        .backend
        .list_schedules(start, end)
        .await?
        .into_iter()
        .filter(|schedule| in_week(schedule, week_start))
        .collect();
    let visible = filter_by_teams(schedules, &team_ids);

    Ok(Json(week_grid(week_start, &visible, first_hour..last_hour)))
}

#[axum::debug_handler]
pub async fn list_teams(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Team>>, AppError> {
    let teams = state.backend.list_teams().await?;
    Ok(Json(teams))
}
