//! Assembly of bundles from the free schedules of a service week.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use uuid::Uuid;

use crate::models::bundle::{Bundle, BundleQuery, CandidateSlot, DayBooking};
use crate::models::roster::TeamSchedule;

pub const MAX_BUNDLES: usize = 12;

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Dates searched for a query: the service week and the renewal week after it.
pub fn search_window(start_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (start_date, start_date + Duration::days(13))
}

fn candidate(schedule: &TeamSchedule) -> CandidateSlot {
    CandidateSlot {
        start_time: schedule.start_time.clone(),
        end_time: schedule.end_time.clone(),
        schedule_id: schedule.id,
        date: schedule.date,
    }
}

fn combinations(days: &[String], size: usize) -> Vec<Vec<String>> {
    if size == 0 {
        return vec![Vec::new()];
    }
    if days.len() < size {
        return Vec::new();
    }
    let mut result = Vec::new();
    for (index, day) in days.iter().enumerate() {
        for mut rest in combinations(&days[index + 1..], size - 1) {
            rest.insert(0, day.clone());
            result.push(rest);
        }
    }
    result
}

/// Per-team weekday slots: `(first week, renewal week)`, with weekdays in
/// the order they occur from the start date.
type TeamDays = (BTreeMap<i64, (String, Vec<CandidateSlot>)>, BTreeMap<String, Vec<CandidateSlot>>);

/// Builds bundles for `query` from free schedules. Each bundle belongs to a
/// single team and combines as many distinct weekdays as the frequency needs.
pub fn assemble_bundles(query: &BundleQuery, schedules: &[TeamSchedule]) -> Vec<Bundle> {
    let required = query.frequency.required_slots();
    let first_week_end = query.start_date + Duration::days(6);
    let (_, renewal_end) = search_window(query.start_date);

    let mut teams: BTreeMap<Uuid, TeamDays> = BTreeMap::new();
    for schedule in schedules.iter().filter(|schedule| schedule.is_free()) {
        if schedule.district_id.is_some_and(|district| district != query.location.district_id) {
            continue;
        }
        let name = day_name(schedule.date.weekday()).to_string();
        let (first, renewal) = teams.entry(schedule.team_id).or_default();
        if schedule.date >= query.start_date && schedule.date <= first_week_end {
            let offset = (schedule.date - query.start_date).num_days();
            first
                .entry(offset)
                .or_insert_with(|| (name, Vec::new()))
                .1
                .push(candidate(schedule));
        } else if schedule.date > first_week_end && schedule.date <= renewal_end {
            renewal.entry(name).or_default().push(candidate(schedule));
        }
    }

    let mut bundles = Vec::new();
    for (team_id, (first, renewal)) in teams {
        let days: Vec<String> = first.values().map(|(name, _)| name.clone()).collect();
        for combination in combinations(&days, required) {
            if bundles.len() >= MAX_BUNDLES {
                return bundles;
            }
            let booking = combination
                .iter()
                .filter_map(|day| {
                    first.values().find(|(name, _)| name == day).map(|(name, slots)| DayBooking {
                        day: name.clone(),
                        time_slots: slots.clone(),
                    })
                })
                .collect();
            let renewable_slots = combination
                .iter()
                .map(|day| DayBooking {
                    day: day.clone(),
                    time_slots: renewal.get(day).cloned().unwrap_or_default(),
                })
                .collect();
            bundles.push(Bundle {
                id: format!("{}-{}", team_id, combination.join("-").to_lowercase()),
                team_id: Some(team_id),
                day_combination: combination,
                booking,
                renewable_slots,
            });
        }
    }

    tracing::debug!(
        start_date = %query.start_date,
        required,
        bundles = bundles.len(),
        "assembled bundles"
    );
    bundles
}
