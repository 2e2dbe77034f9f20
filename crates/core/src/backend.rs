//! The port through which the workflow reaches persistent data.
//!
//! The wizard and roster never talk to storage directly; they call a
//! `BookingBackend`. The database crate provides the PostgreSQL
//! implementation and a mock for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{
    booking::{BlockedBooking, FinalBookingPayload, Quote, QuoteQuery},
    bundle::{Bundle, BundleQuery},
    customer::{Customer, NewCustomer},
    reference::{Area, District, Property, ResidenceType},
    roster::{Team, TeamSchedule},
    service::{SelectedItem, Service, SpecializedItem},
};

#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn search_customers(&self, search: Option<String>) -> BookingResult<Vec<Customer>>;

    async fn get_customer(&self, id: Uuid) -> BookingResult<Option<Customer>>;

    async fn create_customer(&self, customer: NewCustomer) -> BookingResult<Customer>;

    async fn list_areas(&self) -> BookingResult<Vec<Area>>;

    async fn list_districts(&self, area_id: Uuid) -> BookingResult<Vec<District>>;

    async fn list_properties(&self, district_id: Uuid) -> BookingResult<Vec<Property>>;

    async fn list_residence_types(&self) -> BookingResult<Vec<ResidenceType>>;

    async fn list_services(&self, parent_id: Option<Uuid>) -> BookingResult<Vec<Service>>;

    async fn list_specialized_items(&self, category_id: Uuid) -> BookingResult<Vec<SpecializedItem>>;

    async fn fetch_bundles(&self, query: BundleQuery) -> BookingResult<Vec<Bundle>>;

    async fn fetch_quote(&self, query: QuoteQuery) -> BookingResult<Quote>;

    /// Reserves the payload's slots and returns a provisional booking.
    async fn block_booking(&self, payload: FinalBookingPayload) -> BookingResult<BlockedBooking>;

    async fn confirm_booking(&self, booking_id: Uuid) -> BookingResult<()>;

    /// Gives back the slots held by a provisional booking.
    async fn release_booking(&self, booking_id: Uuid) -> BookingResult<()>;

    async fn create_deep_booking(&self, payload: FinalBookingPayload) -> BookingResult<Uuid>;

    async fn create_specialized_booking(
        &self,
        payload: FinalBookingPayload,
        items: Vec<SelectedItem>,
    ) -> BookingResult<Uuid>;

    async fn list_teams(&self) -> BookingResult<Vec<Team>>;

    /// Schedules of every team with `start <= date <= end`.
    async fn list_schedules(&self, start: NaiveDate, end: NaiveDate) -> BookingResult<Vec<TeamSchedule>>;
}
