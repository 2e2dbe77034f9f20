//! PostgreSQL implementation of the booking backend port.

use std::collections::HashMap;

use async_trait::async_trait;
use brightbook_core::{
    backend::BookingBackend,
    bundle::{assemble_bundles, search_window},
    errors::{BookingError, BookingResult},
    hold::DEFAULT_HOLD_SECONDS,
    models::{
        booking::{BlockedBooking, FinalBookingPayload, Quote, QuoteQuery},
        bundle::{Bundle, BundleQuery},
        customer::{CreateCustomerRequest, Customer, NewCustomer},
        reference::{Area, District, Property, ResidenceType},
        roster::{Team, TeamMember, TeamSchedule},
        service::{SelectedItem, Service, SpecializedItem},
    },
    pricing,
};
use chrono::{Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::repositories::{booking, customer, reference, roster, service};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgBackend {
    pool: DbPool,
    hold_seconds: u32,
}

impl PgBackend {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            hold_seconds: DEFAULT_HOLD_SECONDS,
        }
    }

    /// Length of the hold placed by `block_booking`.
    pub fn with_hold_seconds(mut self, hold_seconds: u32) -> Self {
        self.hold_seconds = hold_seconds;
        self
    }
}

#[async_trait]
impl BookingBackend for PgBackend {
    async fn search_customers(&self, search: Option<String>) -> BookingResult<Vec<Customer>> {
        let customers = customer::search_customers(&self.pool, search.as_deref()).await?;
        Ok(customers.into_iter().map(Customer::from).collect())
    }

    async fn get_customer(&self, id: Uuid) -> BookingResult<Option<Customer>> {
        Ok(customer::get_customer_by_id(&self.pool, id).await?.map(Customer::from))
    }

    async fn create_customer(&self, new_customer: NewCustomer) -> BookingResult<Customer> {
        if !new_customer.is_complete() {
            return Err(BookingError::Validation(
                "name, phone and email are required".to_string(),
            ));
        }
        let request = CreateCustomerRequest::from(new_customer);
        Ok(customer::create_customer(&self.pool, &request).await?.into())
    }

    async fn list_areas(&self) -> BookingResult<Vec<Area>> {
        let areas = reference::list_areas(&self.pool).await?;
        Ok(areas.into_iter().map(Area::from).collect())
    }

    async fn list_districts(&self, area_id: Uuid) -> BookingResult<Vec<District>> {
        let districts = reference::list_districts(&self.pool, Some(area_id)).await?;
        Ok(districts.into_iter().map(District::from).collect())
    }

    async fn list_properties(&self, district_id: Uuid) -> BookingResult<Vec<Property>> {
        let properties = reference::list_properties(&self.pool, Some(district_id)).await?;
        Ok(properties.into_iter().map(Property::from).collect())
    }

    async fn list_residence_types(&self) -> BookingResult<Vec<ResidenceType>> {
        let residence_types = reference::list_residence_types(&self.pool).await?;
        Ok(residence_types.into_iter().map(ResidenceType::from).collect())
    }

    async fn list_services(&self, parent_id: Option<Uuid>) -> BookingResult<Vec<Service>> {
        let services = service::list_services(&self.pool, parent_id).await?;
        Ok(services.into_iter().map(Service::from).collect())
    }

    async fn list_specialized_items(&self, category_id: Uuid) -> BookingResult<Vec<SpecializedItem>> {
        let items = service::list_specialized_items(&self.pool, category_id).await?;
        Ok(items.into_iter().map(SpecializedItem::from).collect())
    }

    async fn fetch_bundles(&self, query: BundleQuery) -> BookingResult<Vec<Bundle>> {
        let (start, end) = search_window(query.start_date);
        let schedules: Vec<TeamSchedule> = roster::list_schedules(&self.pool, start, end)
            .await?
            .into_iter()
            .map(TeamSchedule::from)
            .collect();
        Ok(assemble_bundles(&query, &schedules))
    }

    async fn fetch_quote(&self, query: QuoteQuery) -> BookingResult<Quote> {
        let sub_service = service::get_service_by_id(&self.pool, query.sub_service_id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Service {} not found", query.sub_service_id)))?;

        let cleaner_count = match query.residence_type_id {
            Some(id) => reference::get_residence_type_by_id(&self.pool, id)
                .await?
                .and_then(|residence| u32::try_from(residence.cleaner_count).ok())
                .unwrap_or(1),
            None => 1,
        };

        pricing::quote(
            sub_service.base_price,
            &sub_service.currency,
            cleaner_count,
            query.frequency,
            query.duration_months,
        )
    }

    async fn block_booking(&self, payload: FinalBookingPayload) -> BookingResult<BlockedBooking> {
        let expires_at = Utc::now() + Duration::seconds(i64::from(self.hold_seconds));
        match booking::block_booking(&self.pool, &payload, expires_at).await? {
            Some(blocked) => Ok(BlockedBooking {
                booking_id: blocked.id,
                expires_at: blocked.expires_at,
            }),
            None => Err(BookingError::Conflict(
                "one or more selected slots are no longer available".to_string(),
            )),
        }
    }

    async fn confirm_booking(&self, booking_id: Uuid) -> BookingResult<()> {
        let now = Utc::now();
        if booking::confirm_booking(&self.pool, booking_id, now).await?.is_some() {
            return Ok(());
        }

        match booking::get_booking_by_id(&self.pool, booking_id).await? {
            None => Err(BookingError::NotFound(format!("Booking {} not found", booking_id))),
            Some(existing) if existing.is_blocked() => Err(BookingError::Expired(format!(
                "hold on booking {} ran out before confirmation",
                booking_id
            ))),
            Some(existing) => Err(BookingError::Conflict(format!(
                "booking {} is {}",
                booking_id, existing.status
            ))),
        }
    }

    async fn release_booking(&self, booking_id: Uuid) -> BookingResult<()> {
        if !booking::release_booking(&self.pool, booking_id).await? {
            tracing::debug!("No blocked booking {} to release", booking_id);
        }
        Ok(())
    }

    async fn create_deep_booking(&self, payload: FinalBookingPayload) -> BookingResult<Uuid> {
        Ok(booking::create_booking(&self.pool, &payload, &[]).await?.id)
    }

    async fn create_specialized_booking(
        &self,
        payload: FinalBookingPayload,
        items: Vec<SelectedItem>,
    ) -> BookingResult<Uuid> {
        if items.is_empty() {
            return Err(BookingError::Validation("at least one item is required".to_string()));
        }
        Ok(booking::create_booking(&self.pool, &payload, &items).await?.id)
    }

    async fn list_teams(&self) -> BookingResult<Vec<Team>> {
        let teams = roster::list_teams(&self.pool).await?;
        let mut members: HashMap<Uuid, Vec<TeamMember>> = HashMap::new();
        for member in roster::list_team_members(&self.pool).await? {
            members.entry(member.team_id).or_default().push(member.into());
        }

        Ok(teams
            .into_iter()
            .map(|team| Team {
                members: members.remove(&team.id).unwrap_or_default(),
                id: team.id,
                name: team.name,
            })
            .collect())
    }

    async fn list_schedules(&self, start: NaiveDate, end: NaiveDate) -> BookingResult<Vec<TeamSchedule>> {
        let schedules = roster::list_schedules(&self.pool, start, end).await?;
        Ok(schedules.into_iter().map(TeamSchedule::from).collect())
    }
}
