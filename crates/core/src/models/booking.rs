use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bundle::SelectedTimeSlot;
use super::customer::NewCustomer;
use super::service::{Frequency, SelectedItem, ServiceKind};
use crate::slots::SlotSelection;

/// The in-progress booking owned by a wizard session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub customer_id: Option<Uuid>,
    pub creating_new_customer: bool,
    pub new_customer: NewCustomer,

    pub service_id: Option<Uuid>,
    pub sub_service_id: Option<Uuid>,
    pub sub_service_name: Option<String>,
    pub service_kind: Option<ServiceKind>,
    pub specialized_category_id: Option<Uuid>,
    pub specialized_items: Vec<SelectedItem>,

    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub residence_type_id: Option<Uuid>,
    pub apartment_number: String,
    pub presence: bool,
    pub special_instructions: String,

    pub frequency: Option<Frequency>,
    /// Contract length in months, kept in the string form the form sends.
    pub duration: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub bundle_id: Option<String>,
    pub slots: SlotSelection,
}

impl BookingDraft {
    pub fn is_regular(&self) -> bool {
        self.service_kind == Some(ServiceKind::Regular)
    }

    pub fn duration_months(&self) -> Option<u32> {
        self.duration
            .as_deref()
            .and_then(|value| value.trim().parse::<u32>().ok())
    }

    /// Last service date: one-time bookings end on their start date, all
    /// others run for `duration` months.
    pub fn end_date(&self) -> Option<NaiveDate> {
        let start = self.start_date?;
        match (self.frequency, self.duration_months()) {
            (Some(Frequency::OneTime), _) | (None, _) | (_, None) => Some(start),
            (Some(_), Some(months)) => start.checked_add_months(Months::new(months)),
        }
    }

    pub fn required_slots(&self) -> usize {
        self.frequency.map(Frequency::required_slots).unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteQuery {
    pub service_id: Uuid,
    pub sub_service_id: Uuid,
    pub residence_type_id: Option<Uuid>,
    pub frequency: Option<Frequency>,
    pub duration_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub unit_price: i64,
    pub visits: u32,
    pub cleaner_count: u32,
    pub total_amount: i64,
    pub currency: String,
}

/// Normalised record sent to the backend when a booking is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalBookingPayload {
    /// Percent-encoded phone number.
    pub phone: String,
    pub cleaner_count: u32,
    pub user_id: Uuid,
    pub team_id: Option<Uuid>,
    pub service_id: Uuid,
    pub sub_service_id: Uuid,
    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub residence_type_id: Option<Uuid>,
    pub apartment_number: String,
    pub presence: bool,
    pub special_instructions: String,
    pub total_amount: i64,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Option<Frequency>,
    pub timeslots: Vec<SelectedTimeSlot>,
    pub renewal_slots: Vec<SelectedTimeSlot>,
    pub status: String,
    pub payment_status: String,
}

/// A provisional reservation returned by the block call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedBooking {
    pub booking_id: Uuid,
    /// Authoritative deadline, when the backend reports one.
    pub expires_at: Option<DateTime<Utc>>,
}
