use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service::Frequency;

/// A candidate time window offered inside a bundle. Times are kept as the
/// backend sends them (`HH:MM` or `HH:MM:SS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    pub start_time: String,
    pub end_time: String,
    pub schedule_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBooking {
    pub day: String,
    pub time_slots: Vec<CandidateSlot>,
}

/// A server-offered combination of service days and candidate time windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub team_id: Option<Uuid>,
    pub day_combination: Vec<String>,
    pub booking: Vec<DayBooking>,
    pub renewable_slots: Vec<DayBooking>,
}

impl Bundle {
    pub fn day(&self, day: &str) -> Option<&DayBooking> {
        self.booking.iter().find(|entry| entry.day == day)
    }

    pub fn renewable_day(&self, day: &str) -> Option<&DayBooking> {
        self.renewable_slots.iter().find(|entry| entry.day == day)
    }
}

/// A slot the customer committed to, normalised for the booking payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTimeSlot {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub schedule_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BundleLocation {
    pub lat: f64,
    pub lng: f64,
    pub district_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuery {
    pub start_date: NaiveDate,
    pub location: BundleLocation,
    pub frequency: Frequency,
    pub service_period: String,
    pub duration: u32,
    pub service_type: String,
    pub service_id: Uuid,
}
