//! # Booking wizard
//!
//! The step controller owns a [`BookingDraft`] and walks it through
//! customer → service → location → schedule → bundle → time slots →
//! confirmation. Views never mutate the draft directly: they send
//! [`WizardIntent`]s, and the controller applies them, clearing dependent
//! fields and loading the options the next control needs.
//!
//! Only regular services visit the bundle and time-slot steps. Every other
//! service jumps from the schedule step straight to confirmation, and back.
//!
//! Regular bookings are two-phase: `submit` blocks the slots and starts a
//! hold, `confirm` finalizes it before the hold runs out. Deep-cleaning and
//! specialized bookings are created in a single call.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::errors::{BookingError, BookingResult};
use crate::hold::{BookingHold, Countdown, DEFAULT_HOLD_SECONDS};
use crate::pricing::MAX_DURATION_MONTHS;
use crate::models::{
    booking::{BookingDraft, FinalBookingPayload, Quote, QuoteQuery},
    bundle::{Bundle, BundleLocation, BundleQuery},
    customer::Customer,
    reference::{Area, District, Property, ResidenceType},
    service::{items_total, Frequency, SelectedItem, Service, ServiceKind, SpecializedItem},
};

pub const TOTAL_STEPS: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Customer = 1,
    Service = 2,
    Location = 3,
    Schedule = 4,
    Bundle = 5,
    TimeSlots = 6,
    Confirmation = 7,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Step::Customer),
            2 => Some(Step::Service),
            3 => Some(Step::Location),
            4 => Some(Step::Schedule),
            5 => Some(Step::Bundle),
            6 => Some(Step::TimeSlots),
            7 => Some(Step::Confirmation),
            _ => None,
        }
    }
}

/// Steps shown for a service kind; non-regular services skip 5 and 6.
pub fn visible_steps(kind: Option<ServiceKind>) -> Vec<Step> {
    let mut steps = vec![Step::Customer, Step::Service, Step::Location, Step::Schedule];
    if kind.is_none_or(ServiceKind::is_regular) {
        steps.extend([Step::Bundle, Step::TimeSlots]);
    }
    steps.push(Step::Confirmation);
    steps
}

/// Option lists loaded for the wizard's dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardOptions {
    pub areas: Vec<Area>,
    pub districts: Vec<District>,
    pub properties: Vec<Property>,
    pub residence_types: Vec<ResidenceType>,
    pub services: Vec<Service>,
    pub sub_services: Vec<Service>,
    pub specialized_categories: Vec<Service>,
    pub specialized_items: Vec<SpecializedItem>,
}

/// A change requested by one of the wizard's views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardIntent {
    SelectCustomer { customer_id: Uuid },
    StartNewCustomer,
    UpdateNewCustomer { name: String, phone: String, email: String },
    SelectService { service_id: Uuid },
    SelectSubService { sub_service_id: Uuid },
    SelectSpecializedCategory { category_id: Uuid },
    /// A quantity of zero removes the item.
    SetItemQuantity { item_id: Uuid, quantity: u32 },
    SelectArea { area_id: Uuid },
    SelectDistrict { district_id: Uuid },
    SelectProperty { property_id: Uuid },
    SelectResidenceType { residence_type_id: Uuid },
    SetApartmentNumber { apartment_number: String },
    SetPresence { presence: bool },
    SetSpecialInstructions { instructions: String },
    SetFrequency { frequency: Frequency },
    SetDuration { duration: String },
    SetStartDate { start_date: NaiveDate },
    SelectBundle { bundle_id: String },
    SelectSlot { day: String, slot_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    /// The abandon-booking prompt is now open.
    PromptOpened,
    /// Cancel acted as a step back.
    Retreated(Step),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Blocked {
        booking_id: Uuid,
        expires_at: DateTime<Utc>,
    },
    Created {
        booking_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub struct StepController {
    step: Step,
    draft: BookingDraft,
    customer: Option<Customer>,
    options: WizardOptions,
    bundles: Vec<Bundle>,
    quote: Option<Quote>,
    hold: BookingHold,
    cancel_prompt_open: bool,
    hold_seconds: u32,
}

impl Default for StepController {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_SECONDS)
    }
}

impl StepController {
    pub fn new(hold_seconds: u32) -> Self {
        Self {
            step: Step::Customer,
            draft: BookingDraft::default(),
            customer: None,
            options: WizardOptions::default(),
            bundles: Vec::new(),
            quote: None,
            hold: BookingHold::Draft,
            cancel_prompt_open: false,
            hold_seconds,
        }
    }

    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn hold(&self) -> &BookingHold {
        &self.hold
    }

    pub fn cancel_prompt_open(&self) -> bool {
        self.cancel_prompt_open
    }

    pub fn selected_bundle(&self) -> Option<&Bundle> {
        let id = self.draft.bundle_id.as_deref()?;
        self.bundles.iter().find(|bundle| bundle.id == id)
    }

    fn is_regular(&self) -> bool {
        self.draft.is_regular()
    }

    // ---- validation -------------------------------------------------------

    /// Checks the predicate that gates "Next" on `step`.
    pub fn validate_step(&self, step: Step) -> BookingResult<()> {
        let draft = &self.draft;
        let fail = |message: &str| Err(BookingError::Validation(message.to_string()));
        match step {
            Step::Customer => {
                if draft.creating_new_customer {
                    if !draft.new_customer.is_complete() {
                        return fail("new customer needs a name, phone and email");
                    }
                } else if draft.customer_id.is_none() {
                    return fail("select a customer");
                }
            }
            Step::Service => {
                if draft.service_id.is_none() || draft.sub_service_id.is_none() {
                    return fail("select a service and a sub-service");
                }
                if draft.service_kind == Some(ServiceKind::Specialized)
                    && (draft.specialized_category_id.is_none() || draft.specialized_items.is_empty())
                {
                    return fail("select a category and at least one item");
                }
            }
            Step::Location => {
                if draft.area_id.is_none()
                    || draft.district_id.is_none()
                    || draft.property_id.is_none()
                    || draft.residence_type_id.is_none()
                {
                    return fail("area, district, property and residence type are required");
                }
            }
            Step::Schedule => {
                if draft.start_date.is_none() {
                    return fail("select a start date");
                }
                if self.is_regular() {
                    match draft.frequency {
                        None => return fail("select a frequency"),
                        Some(Frequency::OneTime) => {}
                        Some(_) if draft.duration_months().is_none() => {
                            return fail("select a duration");
                        }
                        Some(_) => {}
                    }
                }
            }
            Step::Bundle => {
                if !self.is_regular() {
                    return fail("only regular services have a bundle step");
                }
                if draft.bundle_id.is_none() {
                    return fail("select a bundle");
                }
            }
            Step::TimeSlots => {
                let required = draft.required_slots();
                if !draft.slots.satisfies(required) {
                    return Err(BookingError::Validation(format!(
                        "select {required} time slot(s), {} chosen",
                        draft.slots.len()
                    )));
                }
            }
            Step::Confirmation => {
                for earlier in visible_steps(draft.service_kind) {
                    if earlier != Step::Confirmation {
                        self.validate_step(earlier)?;
                    }
                }
                if self.quote.is_none() {
                    return fail("pricing has not been loaded");
                }
                if self.hold.is_blocked() {
                    return fail("booking is already blocked, confirm it");
                }
            }
        }
        Ok(())
    }

    pub fn is_next_disabled(&self) -> bool {
        self.validate_step(self.step).is_err()
    }

    // ---- intents ----------------------------------------------------------

    /// Drops everything derived from the schedule parameters.
    fn invalidate_schedule(&mut self) {
        self.bundles.clear();
        self.draft.bundle_id = None;
        self.draft.slots.clear();
        self.quote = None;
    }

    fn clear_sub_service(&mut self) {
        self.draft.sub_service_id = None;
        self.draft.sub_service_name = None;
        self.draft.service_kind = None;
        self.clear_specialized();
        self.options.specialized_categories.clear();
    }

    fn clear_specialized(&mut self) {
        self.draft.specialized_category_id = None;
        self.draft.specialized_items.clear();
        self.options.specialized_items.clear();
    }

    fn clear_district(&mut self) {
        self.draft.district_id = None;
        self.options.districts.clear();
        self.clear_property();
    }

    fn clear_property(&mut self) {
        self.draft.property_id = None;
        self.options.properties.clear();
    }

    /// Applies one view change. The draft is frozen while its slots are
    /// blocked, so the confirmed booking always matches the reservation.
    pub async fn apply(&mut self, intent: WizardIntent, backend: &dyn BookingBackend) -> BookingResult<()> {
        debug!(?intent, step = self.step.number(), "applying wizard intent");
        if self.hold.is_blocked() {
            return Err(BookingError::Conflict(
                "confirm or cancel the blocked booking first".to_string(),
            ));
        }
        match intent {
            WizardIntent::SelectCustomer { customer_id } => {
                let customer = backend
                    .get_customer(customer_id)
                    .await?
                    .ok_or_else(|| BookingError::NotFound(format!("Customer with ID {customer_id} not found")))?;
                self.draft.customer_id = Some(customer.id);
                self.draft.creating_new_customer = false;
                self.prefill_location(&customer, backend).await?;
                self.customer = Some(customer);
            }
            WizardIntent::StartNewCustomer => {
                self.draft.creating_new_customer = true;
                self.draft.customer_id = None;
                self.customer = None;
            }
            WizardIntent::UpdateNewCustomer { name, phone, email } => {
                self.draft.creating_new_customer = true;
                self.draft.new_customer.name = name;
                self.draft.new_customer.phone = phone;
                self.draft.new_customer.email = email;
            }
            WizardIntent::SelectService { service_id } => {
                if self.draft.service_id != Some(service_id) {
                    self.clear_sub_service();
                    self.options.sub_services.clear();
                    self.invalidate_schedule();
                }
                self.draft.service_id = Some(service_id);
                self.options.sub_services = backend.list_services(Some(service_id)).await?;
            }
            WizardIntent::SelectSubService { sub_service_id } => {
                let sub_service = self
                    .options
                    .sub_services
                    .iter()
                    .find(|service| service.id == sub_service_id)
                    .cloned()
                    .ok_or_else(|| BookingError::NotFound(format!("Sub-service with ID {sub_service_id} not found")))?;
                if self.draft.sub_service_id != Some(sub_service_id) {
                    self.clear_specialized();
                    self.options.specialized_categories.clear();
                    self.invalidate_schedule();
                }
                let kind = ServiceKind::from_name(&sub_service.name);
                self.draft.sub_service_id = Some(sub_service.id);
                self.draft.sub_service_name = Some(sub_service.name);
                self.draft.service_kind = Some(kind);
                if kind == ServiceKind::Specialized {
                    self.options.specialized_categories = backend.list_services(Some(sub_service_id)).await?;
                }
            }
            WizardIntent::SelectSpecializedCategory { category_id } => {
                if self.draft.service_kind != Some(ServiceKind::Specialized) {
                    return Err(BookingError::Validation(
                        "categories only apply to specialized services".to_string(),
                    ));
                }
                if self.draft.specialized_category_id != Some(category_id) {
                    self.clear_specialized();
                }
                self.draft.specialized_category_id = Some(category_id);
                self.options.specialized_items = backend.list_specialized_items(category_id).await?;
            }
            WizardIntent::SetItemQuantity { item_id, quantity } => {
                self.set_item_quantity(item_id, quantity)?;
            }
            WizardIntent::SelectArea { area_id } => {
                if self.draft.area_id != Some(area_id) {
                    self.clear_district();
                    self.invalidate_schedule();
                }
                self.draft.area_id = Some(area_id);
                self.options.districts = backend.list_districts(area_id).await?;
            }
            WizardIntent::SelectDistrict { district_id } => {
                let belongs = self
                    .options
                    .districts
                    .iter()
                    .any(|district| district.id == district_id && Some(district.area_id) == self.draft.area_id);
                if !belongs {
                    return Err(BookingError::Validation(format!(
                        "district {district_id} is not part of the selected area"
                    )));
                }
                if self.draft.district_id != Some(district_id) {
                    self.clear_property();
                    self.invalidate_schedule();
                }
                self.draft.district_id = Some(district_id);
                self.options.properties = backend.list_properties(district_id).await?;
            }
            WizardIntent::SelectProperty { property_id } => {
                let belongs = self.options.properties.iter().any(|property| {
                    property.id == property_id && Some(property.district_id) == self.draft.district_id
                });
                if !belongs {
                    return Err(BookingError::Validation(format!(
                        "property {property_id} is not part of the selected district"
                    )));
                }
                if self.draft.property_id != Some(property_id) {
                    self.invalidate_schedule();
                }
                self.draft.property_id = Some(property_id);
            }
            WizardIntent::SelectResidenceType { residence_type_id } => {
                if self.draft.residence_type_id != Some(residence_type_id) {
                    self.quote = None;
                }
                self.draft.residence_type_id = Some(residence_type_id);
            }
            WizardIntent::SetApartmentNumber { apartment_number } => {
                self.draft.apartment_number = apartment_number;
            }
            WizardIntent::SetPresence { presence } => {
                self.draft.presence = presence;
            }
            WizardIntent::SetSpecialInstructions { instructions } => {
                self.draft.special_instructions = instructions;
            }
            WizardIntent::SetFrequency { frequency } => {
                if self.draft.frequency != Some(frequency) {
                    self.invalidate_schedule();
                }
                self.draft.frequency = Some(frequency);
            }
            WizardIntent::SetDuration { duration } => {
                match duration.trim().parse::<u32>() {
                    Ok(months) if (1..=MAX_DURATION_MONTHS).contains(&months) => {}
                    _ => {
                        return Err(BookingError::Validation(format!(
                            "duration must be between 1 and {MAX_DURATION_MONTHS} months, got {duration:?}"
                        )));
                    }
                }
                if self.draft.duration.as_deref() != Some(duration.as_str()) {
                    self.invalidate_schedule();
                }
                self.draft.duration = Some(duration);
            }
            WizardIntent::SetStartDate { start_date } => {
                if self.draft.start_date != Some(start_date) {
                    self.invalidate_schedule();
                }
                self.draft.start_date = Some(start_date);
            }
            WizardIntent::SelectBundle { bundle_id } => {
                if !self.bundles.iter().any(|bundle| bundle.id == bundle_id) {
                    return Err(BookingError::NotFound(format!("Bundle {bundle_id} not found")));
                }
                if self.draft.bundle_id.as_deref() != Some(bundle_id.as_str()) {
                    self.draft.slots.clear();
                }
                self.draft.bundle_id = Some(bundle_id);
            }
            WizardIntent::SelectSlot { day, slot_index } => {
                let Some(bundle_id) = self.draft.bundle_id.as_deref() else {
                    return Err(BookingError::Validation("select a bundle first".to_string()));
                };
                if let Some(bundle) = self.bundles.iter().find(|bundle| bundle.id == bundle_id) {
                    self.draft.slots.select_slot(bundle, &day, slot_index);
                }
            }
        }
        Ok(())
    }

    fn set_item_quantity(&mut self, item_id: Uuid, quantity: u32) -> BookingResult<()> {
        let items = &mut self.draft.specialized_items;
        if quantity == 0 {
            items.retain(|item| item.id != item_id);
            return Ok(());
        }
        if let Some(existing) = items.iter_mut().find(|item| item.id == item_id) {
            existing.quantity = quantity;
            return Ok(());
        }
        let item = self
            .options
            .specialized_items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| BookingError::NotFound(format!("Item with ID {item_id} not found")))?;
        items.push(SelectedItem {
            id: item.id,
            name: item.name.clone(),
            quantity,
            unit_price: item.unit_price,
            currency: item.currency.clone(),
        });
        Ok(())
    }

    /// Copies a known customer's address into the draft and loads the
    /// matching district and property lists.
    async fn prefill_location(&mut self, customer: &Customer, backend: &dyn BookingBackend) -> BookingResult<()> {
        let Some(area_id) = customer.area_id else {
            return Ok(());
        };
        self.invalidate_schedule();
        self.draft.area_id = Some(area_id);
        self.draft.district_id = customer.district_id;
        self.draft.property_id = customer.property_id;
        self.draft.residence_type_id = customer.residence_type_id.or(self.draft.residence_type_id);
        if let Some(apartment) = &customer.apartment_number {
            self.draft.apartment_number = apartment.clone();
        }
        self.options.districts = backend.list_districts(area_id).await?;
        self.options.properties = match customer.district_id {
            Some(district_id) => backend.list_properties(district_id).await?,
            None => Vec::new(),
        };
        Ok(())
    }

    // ---- navigation -------------------------------------------------------

    /// Moves to the next visible step once the current one validates,
    /// loading whatever that step displays.
    pub async fn advance(&mut self, backend: &dyn BookingBackend) -> BookingResult<Step> {
        self.validate_step(self.step)?;
        let next = match self.step {
            Step::Customer => {
                self.options.areas = backend.list_areas().await?;
                self.options.residence_types = backend.list_residence_types().await?;
                self.options.services = backend.list_services(None).await?;
                Step::Service
            }
            Step::Service => Step::Location,
            Step::Location => Step::Schedule,
            Step::Schedule => {
                if self.is_regular() {
                    self.bundles = backend.fetch_bundles(self.bundle_query()?).await?;
                    self.quote = Some(backend.fetch_quote(self.quote_query()?).await?);
                    Step::Bundle
                } else {
                    self.quote = Some(backend.fetch_quote(self.quote_query()?).await?);
                    Step::Confirmation
                }
            }
            Step::Bundle => Step::TimeSlots,
            Step::TimeSlots => Step::Confirmation,
            Step::Confirmation => {
                return Err(BookingError::Validation(
                    "already on the last step, submit the booking".to_string(),
                ));
            }
        };
        debug!(from = self.step.number(), to = next.number(), "wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Goes one visible step back.
    pub fn retreat(&mut self) -> BookingResult<Step> {
        if self.hold.is_blocked() {
            return Err(BookingError::Conflict(
                "confirm or cancel the blocked booking first".to_string(),
            ));
        }
        let previous = match self.step {
            Step::Customer => Step::Customer,
            Step::Service if self.draft.creating_new_customer => {
                self.draft.creating_new_customer = false;
                Step::Service
            }
            Step::Service => Step::Customer,
            Step::Location => Step::Service,
            Step::Schedule => Step::Location,
            Step::Bundle => {
                self.draft.bundle_id = None;
                self.bundles.clear();
                self.draft.slots.clear();
                Step::Schedule
            }
            Step::TimeSlots => {
                self.draft.slots.clear();
                Step::Bundle
            }
            Step::Confirmation if self.is_regular() => Step::TimeSlots,
            Step::Confirmation => Step::Schedule,
        };
        self.step = previous;
        Ok(previous)
    }

    /// Cancel opens the abandon prompt on the first step, or while a
    /// booking is blocked; elsewhere it is one step back.
    pub fn cancel(&mut self) -> BookingResult<CancelOutcome> {
        if self.step == Step::Customer || self.hold.is_blocked() {
            self.cancel_prompt_open = true;
            return Ok(CancelOutcome::PromptOpened);
        }
        self.retreat().map(CancelOutcome::Retreated)
    }

    pub fn dismiss_cancel(&mut self) {
        self.cancel_prompt_open = false;
    }

    /// Abandons the booking: releases a blocked hold and resets the wizard.
    pub async fn confirm_cancel(&mut self, backend: &dyn BookingBackend) -> BookingResult<()> {
        if !self.cancel_prompt_open {
            return Err(BookingError::Validation("no cancellation to confirm".to_string()));
        }
        if let Some(booking_id) = self.hold.cancel() {
            backend.release_booking(booking_id).await?;
            info!(%booking_id, "blocked booking released on cancel");
        }
        self.reset();
        Ok(())
    }

    /// Returns the wizard to its initial, empty state.
    pub fn reset(&mut self) {
        *self = Self::new(self.hold_seconds);
    }

    // ---- submission -------------------------------------------------------

    fn bundle_query(&self) -> BookingResult<BundleQuery> {
        let draft = &self.draft;
        let property = draft
            .property_id
            .and_then(|id| self.options.properties.iter().find(|property| property.id == id))
            .ok_or_else(|| BookingError::Validation("property location is not loaded".to_string()))?;
        let frequency = draft
            .frequency
            .ok_or_else(|| BookingError::Validation("select a frequency".to_string()))?;
        let duration = draft.duration_months().unwrap_or(0);
        Ok(BundleQuery {
            start_date: draft
                .start_date
                .ok_or_else(|| BookingError::Validation("select a start date".to_string()))?,
            location: BundleLocation {
                lat: property.lat,
                lng: property.lng,
                district_id: property.district_id,
            },
            frequency,
            service_period: format!("{duration} months"),
            duration,
            service_type: "regular".to_string(),
            service_id: draft
                .sub_service_id
                .ok_or_else(|| BookingError::Validation("select a sub-service".to_string()))?,
        })
    }

    fn quote_query(&self) -> BookingResult<QuoteQuery> {
        let draft = &self.draft;
        Ok(QuoteQuery {
            service_id: draft
                .service_id
                .ok_or_else(|| BookingError::Validation("select a service".to_string()))?,
            sub_service_id: draft
                .sub_service_id
                .ok_or_else(|| BookingError::Validation("select a sub-service".to_string()))?,
            residence_type_id: draft.residence_type_id,
            frequency: if self.is_regular() { draft.frequency } else { None },
            duration_months: if self.is_regular() { draft.duration_months() } else { None },
        })
    }

    /// Builds the payload sent to the backend for `customer`.
    pub fn build_payload(&self, customer: &Customer) -> BookingResult<FinalBookingPayload> {
        let draft = &self.draft;
        let quote = self
            .quote
            .as_ref()
            .ok_or_else(|| BookingError::Validation("pricing has not been loaded".to_string()))?;
        let start_date = draft
            .start_date
            .ok_or_else(|| BookingError::Validation("select a start date".to_string()))?;
        let kind = draft
            .service_kind
            .ok_or_else(|| BookingError::Validation("select a sub-service".to_string()))?;

        let (total_amount, currency) = match kind {
            ServiceKind::Specialized => (
                items_total(&draft.specialized_items),
                draft
                    .specialized_items
                    .first()
                    .map(|item| item.currency.clone())
                    .unwrap_or_else(|| quote.currency.clone()),
            ),
            _ => (quote.total_amount, quote.currency.clone()),
        };

        Ok(FinalBookingPayload {
            phone: urlencoding::encode(&customer.phone).into_owned(),
            cleaner_count: quote.cleaner_count,
            user_id: customer.id,
            team_id: self.selected_bundle().and_then(|bundle| bundle.team_id),
            service_id: draft
                .service_id
                .ok_or_else(|| BookingError::Validation("select a service".to_string()))?,
            sub_service_id: draft
                .sub_service_id
                .ok_or_else(|| BookingError::Validation("select a sub-service".to_string()))?,
            area_id: draft.area_id,
            district_id: draft.district_id,
            property_id: draft.property_id,
            residence_type_id: draft.residence_type_id,
            apartment_number: draft.apartment_number.clone(),
            presence: draft.presence,
            special_instructions: draft.special_instructions.clone(),
            total_amount,
            currency,
            start_date,
            end_date: draft.end_date().unwrap_or(start_date),
            frequency: if kind.is_regular() { draft.frequency } else { None },
            timeslots: draft.slots.selected.clone(),
            renewal_slots: draft.slots.renewal.clone(),
            status: if kind.is_regular() { "blocked" } else { "pending" }.to_string(),
            payment_status: "pending".to_string(),
        })
    }

    async fn resolve_customer(&mut self, backend: &dyn BookingBackend) -> BookingResult<Customer> {
        if self.draft.creating_new_customer {
            let customer = backend.create_customer(self.draft.new_customer.clone()).await?;
            info!(customer_id = %customer.id, "customer created from booking wizard");
            self.draft.creating_new_customer = false;
            self.draft.customer_id = Some(customer.id);
            self.customer = Some(customer.clone());
            return Ok(customer);
        }
        match (&self.customer, self.draft.customer_id) {
            (Some(customer), Some(id)) if customer.id == id => Ok(customer.clone()),
            (_, Some(id)) => backend
                .get_customer(id)
                .await?
                .ok_or_else(|| BookingError::NotFound(format!("Customer with ID {id} not found"))),
            (_, None) => Err(BookingError::Validation("select a customer".to_string())),
        }
    }

    /// Terminal action on the confirmation step.
    ///
    /// Regular services block their slots and start the hold; deep-cleaning
    /// and specialized services are booked at once and the wizard resets.
    pub async fn submit(&mut self, backend: &dyn BookingBackend, now: DateTime<Utc>) -> BookingResult<SubmitOutcome> {
        if self.step != Step::Confirmation {
            return Err(BookingError::Validation(format!(
                "bookings are submitted from the confirmation step, not step {}",
                self.step.number()
            )));
        }
        self.validate_step(Step::Confirmation)?;
        let customer = self.resolve_customer(backend).await?;
        let payload = self.build_payload(&customer)?;

        match self.draft.service_kind {
            Some(ServiceKind::Regular) => {
                let blocked = backend.block_booking(payload).await?;
                self.hold.block(&blocked, now, self.hold_seconds);
                let BookingHold::Blocked { booking_id, expires_at } = self.hold else {
                    return Err(BookingError::Internal("hold did not enter the blocked state".into()));
                };
                info!(%booking_id, %expires_at, "booking blocked");
                Ok(SubmitOutcome::Blocked { booking_id, expires_at })
            }
            Some(ServiceKind::Deep) => {
                let booking_id = backend.create_deep_booking(payload).await?;
                info!(%booking_id, "deep-cleaning booking created");
                self.reset();
                Ok(SubmitOutcome::Created { booking_id })
            }
            Some(ServiceKind::Specialized) => {
                let items = self.draft.specialized_items.clone();
                let booking_id = backend.create_specialized_booking(payload, items).await?;
                info!(%booking_id, "specialized booking created");
                self.reset();
                Ok(SubmitOutcome::Created { booking_id })
            }
            None => Err(BookingError::Validation("select a sub-service".to_string())),
        }
    }

    /// Second phase of a regular booking. Fails with `Expired` (and gives the
    /// slots back) once the hold has run out.
    pub async fn confirm(&mut self, backend: &dyn BookingBackend, now: DateTime<Utc>) -> BookingResult<Uuid> {
        let booking_id = match self.hold.confirmable(now) {
            Ok(booking_id) => booking_id,
            Err(BookingError::Expired(message)) => {
                if let Some(booking_id) = self.hold.booking_id() {
                    if let Err(e) = backend.release_booking(booking_id).await {
                        warn!(%booking_id, error = %e, "failed to release expired booking");
                    }
                }
                return Err(BookingError::Expired(message));
            }
            Err(e) => return Err(e),
        };
        backend.confirm_booking(booking_id).await?;
        self.hold.mark_confirmed();
        info!(%booking_id, "booking confirmed");
        self.reset();
        Ok(booking_id)
    }

    /// Expires a lapsed hold, returning the booking whose slots to release.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> Option<Uuid> {
        self.hold.expire_if_due(now)
    }

    pub fn view(&self, now: DateTime<Utc>) -> WizardView {
        let countdown = Countdown::from_hold(&self.hold, now);
        WizardView {
            current_step: self.step.number(),
            step: self.step,
            total_steps: TOTAL_STEPS,
            visible_steps: visible_steps(self.draft.service_kind)
                .into_iter()
                .map(Step::number)
                .collect(),
            draft: self.draft.clone(),
            end_date: self.draft.end_date(),
            options: self.options.clone(),
            bundles: self.bundles.clone(),
            required_slots: self.draft.required_slots(),
            next_disabled: self.is_next_disabled(),
            cancel_prompt_open: self.cancel_prompt_open,
            quote: self.quote.clone(),
            hold: self.hold.clone(),
            time_left: countdown.remaining(),
            countdown: countdown.display(),
        }
    }
}

/// Serializable snapshot of a wizard for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardView {
    pub current_step: u8,
    pub step: Step,
    pub total_steps: u8,
    pub visible_steps: Vec<u8>,
    pub draft: BookingDraft,
    pub end_date: Option<NaiveDate>,
    pub options: WizardOptions,
    pub bundles: Vec<Bundle>,
    pub required_slots: usize,
    pub next_disabled: bool,
    pub cancel_prompt_open: bool,
    pub quote: Option<Quote>,
    pub hold: BookingHold,
    pub time_left: u32,
    pub countdown: String,
}
