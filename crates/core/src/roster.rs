//! Weekly roster calendar.
//!
//! Schedules of a week are grouped per day by their `(start, end)` window
//! and placed in the hour cell where the window starts, so an event that
//! spans several hours is drawn once with a row-span hint.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::roster::{RosterStatus, TeamSchedule};

/// First and last date (inclusive) of the week starting at `week_start`.
pub fn week_range(week_start: NaiveDate) -> (NaiveDate, NaiveDate) {
    (week_start, week_start + Duration::days(6))
}

pub fn in_week(schedule: &TeamSchedule, week_start: NaiveDate) -> bool {
    let (start, end) = week_range(week_start);
    schedule.date >= start && schedule.date <= end
}

/// Keeps schedules of the given teams. An empty filter keeps everything.
pub fn filter_by_teams(schedules: Vec<TeamSchedule>, team_ids: &HashSet<Uuid>) -> Vec<TeamSchedule> {
    if team_ids.is_empty() {
        return schedules;
    }
    schedules
        .into_iter()
        .filter(|schedule| team_ids.contains(&schedule.team_id))
        .collect()
}

fn hour_of(time: &str) -> Option<u32> {
    time.split(':').next()?.trim().parse().ok()
}

fn minutes_of(time: &str) -> Option<u32> {
    let mut parts = time.split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next().unwrap_or("0").trim().parse().ok()?;
    Some(hours * 60 + minutes)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleCard {
    #[serde(flatten)]
    pub schedule: TeamSchedule,
    pub roster_status: RosterStatus,
    pub color: String,
}

impl From<TeamSchedule> for ScheduleCard {
    fn from(schedule: TeamSchedule) -> Self {
        let roster_status = schedule.roster_status();
        Self {
            schedule,
            roster_status,
            color: roster_status.color().to_string(),
        }
    }
}

/// Schedules of one day sharing the same time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotGroup {
    pub start_time: String,
    pub end_time: String,
    pub start_hour: Option<u32>,
    /// Number of hour rows the group covers, at least 1.
    pub row_span: u32,
    pub schedules: Vec<ScheduleCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourCell {
    pub hour: u32,
    pub groups: Vec<SlotGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub cells: Vec<HourCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekGrid {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub days: Vec<DayColumn>,
}

fn row_span(start_time: &str, end_time: &str) -> u32 {
    match (minutes_of(start_time), minutes_of(end_time)) {
        (Some(start), Some(end)) if end > start => (end - start).div_ceil(60).max(1),
        _ => 1,
    }
}

/// Groups one day's schedules by `(start_time, end_time)`, ordered by window.
pub fn group_day(schedules: &[TeamSchedule]) -> Vec<SlotGroup> {
    let mut groups: BTreeMap<(String, String), Vec<ScheduleCard>> = BTreeMap::new();
    for schedule in schedules {
        groups
            .entry((schedule.start_time.clone(), schedule.end_time.clone()))
            .or_default()
            .push(ScheduleCard::from(schedule.clone()));
    }

    groups
        .into_iter()
        .map(|((start_time, end_time), schedules)| SlotGroup {
            start_hour: hour_of(&start_time),
            row_span: row_span(&start_time, &end_time),
            start_time,
            end_time,
            schedules,
        })
        .collect()
}

/// Builds the grid for `week_start`, one cell per hour in `hours`. A group is
/// shown only in the cell of its start hour.
pub fn week_grid(week_start: NaiveDate, schedules: &[TeamSchedule], hours: Range<u32>) -> WeekGrid {
    let (_, week_end) = week_range(week_start);
    let days = (0..7)
        .map(|offset| {
            let date = week_start + Duration::days(offset);
            let of_day: Vec<TeamSchedule> = schedules
                .iter()
                .filter(|schedule| schedule.date == date)
                .cloned()
                .collect();
            let groups = group_day(&of_day);
            let cells = hours
                .clone()
                .map(|hour| HourCell {
                    hour,
                    groups: groups
                        .iter()
                        .filter(|group| group.start_hour == Some(hour))
                        .cloned()
                        .collect(),
                })
                .collect();
            DayColumn { date, cells }
        })
        .collect();

    WeekGrid {
        week_start,
        week_end,
        days,
    }
}

/// Identifies one week fetch; only the newest ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub week_start: NaiveDate,
}

/// Calendar view state: visible week, team filter and the last loaded data.
///
/// Meant for long-lived clients that page between weeks while earlier
/// fetches are still in flight. A one-shot request has no stale responses
/// to drop and builds its grid with [`week_grid`] directly.
#[derive(Debug, Clone)]
pub struct RosterCalendar {
    week_start: NaiveDate,
    team_filter: HashSet<Uuid>,
    schedules: Vec<TeamSchedule>,
    generation: u64,
}

impl RosterCalendar {
    pub fn new(week_start: NaiveDate) -> Self {
        Self {
            week_start,
            team_filter: HashSet::new(),
            schedules: Vec::new(),
            generation: 0,
        }
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    /// Switches to another week and hands out a ticket for its fetch.
    /// Earlier tickets become stale.
    pub fn begin_fetch(&mut self, week_start: NaiveDate) -> FetchTicket {
        self.generation += 1;
        self.week_start = week_start;
        FetchTicket {
            generation: self.generation,
            week_start,
        }
    }

    pub fn next_week(&mut self) -> FetchTicket {
        self.begin_fetch(self.week_start + Duration::days(7))
    }

    pub fn previous_week(&mut self) -> FetchTicket {
        self.begin_fetch(self.week_start - Duration::days(7))
    }

    /// Stores a fetched week. Responses for stale tickets are dropped and
    /// `false` is returned.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, schedules: Vec<TeamSchedule>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale roster response"
            );
            return false;
        }
        self.schedules = schedules
            .into_iter()
            .filter(|schedule| in_week(schedule, ticket.week_start))
            .collect();
        true
    }

    pub fn set_team_filter(&mut self, team_ids: HashSet<Uuid>) {
        self.team_filter = team_ids;
    }

    pub fn visible_schedules(&self) -> Vec<TeamSchedule> {
        filter_by_teams(self.schedules.clone(), &self.team_filter)
    }

    pub fn grid(&self, hours: Range<u32>) -> WeekGrid {
        week_grid(self.week_start, &self.visible_schedules(), hours)
    }
}
