//! Bundle/slot selection.
//!
//! A customer picks one time window per service day of the chosen bundle.
//! Selections are keyed by calendar date: picking again for a date replaces
//! the earlier pick in place. Every pick is mirrored into a parallel list of
//! renewal slots taken from the bundle's `renewable_slots`.

use serde::{Deserialize, Serialize};

use crate::models::bundle::{Bundle, CandidateSlot, DayBooking, SelectedTimeSlot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelection {
    pub selected: Vec<SelectedTimeSlot>,
    pub renewal: Vec<SelectedTimeSlot>,
}

/// What the slot picker shows for one day of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySlots<'a> {
    NoSlots,
    Slots(Vec<&'a CandidateSlot>),
}

/// Display order of a day's candidate slots: by start time, then end time.
pub fn display_slots(entry: &DayBooking) -> Vec<&CandidateSlot> {
    let mut slots: Vec<&CandidateSlot> = entry.time_slots.iter().collect();
    slots.sort_by(|a, b| {
        normalize_time(&a.start_time)
            .cmp(&normalize_time(&b.start_time))
            .then_with(|| normalize_time(&a.end_time).cmp(&normalize_time(&b.end_time)))
    });
    slots
}

pub fn day_slots<'a>(bundle: &'a Bundle, day: &str) -> DaySlots<'a> {
    match bundle.day(day) {
        Some(entry) if !entry.time_slots.is_empty() => DaySlots::Slots(display_slots(entry)),
        _ => DaySlots::NoSlots,
    }
}

/// `HH:MM` becomes `HH:MM:SS`; values that already carry seconds are kept.
pub fn normalize_time(value: &str) -> String {
    let value = value.trim();
    if value.matches(':').count() >= 2 {
        value.to_string()
    } else {
        format!("{value}:00")
    }
}

fn same_window(a: &CandidateSlot, b: &CandidateSlot) -> bool {
    normalize_time(&a.start_time) == normalize_time(&b.start_time)
        && normalize_time(&a.end_time) == normalize_time(&b.end_time)
}

fn to_selected(slot: &CandidateSlot) -> SelectedTimeSlot {
    SelectedTimeSlot {
        date: slot.date,
        start_time: normalize_time(&slot.start_time),
        end_time: normalize_time(&slot.end_time),
        schedule_id: slot.schedule_id,
    }
}

fn upsert_by_date(list: &mut Vec<SelectedTimeSlot>, slot: SelectedTimeSlot) {
    match list.iter().position(|existing| existing.date == slot.date) {
        Some(index) => list[index] = slot,
        None => list.push(slot),
    }
    list.sort_by_key(|entry| entry.date);
}

impl SlotSelection {
    /// Selects the slot shown at `slot_index` for `day`.
    ///
    /// The index addresses the display order; the slot itself is re-derived
    /// by its time window from the bundle's own list. Returns `false` when
    /// the day or index does not exist in the bundle.
    pub fn select_slot(&mut self, bundle: &Bundle, day: &str, slot_index: usize) -> bool {
        let Some(entry) = bundle.day(day) else {
            return false;
        };
        let Some(shown) = display_slots(entry).get(slot_index).copied() else {
            return false;
        };
        let Some(chosen) = entry.time_slots.iter().find(|slot| same_window(slot, shown)) else {
            return false;
        };

        upsert_by_date(&mut self.selected, to_selected(chosen));

        if let Some(renewable) = bundle.renewable_day(day) {
            let mirrored = renewable
                .time_slots
                .iter()
                .find(|slot| same_window(slot, chosen))
                .or_else(|| display_slots(renewable).get(slot_index).copied());
            if let Some(slot) = mirrored {
                upsert_by_date(&mut self.renewal, to_selected(slot));
            }
        }

        tracing::debug!(
            day,
            slot_index,
            selected = self.selected.len(),
            renewal = self.renewal.len(),
            "slot selected"
        );
        true
    }

    pub fn is_selected(&self, slot: &CandidateSlot) -> bool {
        self.selected.iter().any(|entry| {
            entry.date == slot.date
                && entry.start_time == normalize_time(&slot.start_time)
                && entry.end_time == normalize_time(&slot.end_time)
        })
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn satisfies(&self, required: usize) -> bool {
        self.selected.len() >= required
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.renewal.clear();
    }
}
