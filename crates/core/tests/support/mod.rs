#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use brightbook_core::{
    backend::BookingBackend,
    errors::{BookingError, BookingResult},
    models::{
        booking::{BlockedBooking, FinalBookingPayload, Quote, QuoteQuery},
        bundle::{Bundle, BundleQuery, CandidateSlot, DayBooking},
        customer::{Customer, NewCustomer},
        reference::{Area, District, Property, ResidenceType},
        roster::{Team, TeamSchedule},
        service::{SelectedItem, Service, SpecializedItem},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

pub fn slot(date_str: &str, start: &str, end: &str) -> CandidateSlot {
    CandidateSlot {
        start_time: start.to_string(),
        end_time: end.to_string(),
        schedule_id: Uuid::new_v4(),
        date: date(date_str),
    }
}

pub fn day(name: &str, slots: Vec<CandidateSlot>) -> DayBooking {
    DayBooking {
        day: name.to_string(),
        time_slots: slots,
    }
}

/// Monday/Wednesday bundle starting 2026-11-02 with renewal slots a week later.
pub fn two_day_bundle(team_id: Uuid) -> Bundle {
    Bundle {
        id: "mon-wed".to_string(),
        team_id: Some(team_id),
        day_combination: vec!["Monday".to_string(), "Wednesday".to_string()],
        booking: vec![
            day(
                "Monday",
                vec![
                    slot("2026-11-02", "13:00", "15:00"),
                    slot("2026-11-02", "09:00", "11:00"),
                ],
            ),
            day("Wednesday", vec![slot("2026-11-04", "10:00", "12:00")]),
        ],
        renewable_slots: vec![
            day(
                "Monday",
                vec![
                    slot("2026-11-09", "09:00", "11:00"),
                    slot("2026-11-09", "13:00", "15:00"),
                ],
            ),
            day("Wednesday", vec![slot("2026-11-11", "10:00", "12:00")]),
        ],
    }
}

/// In-memory backend recording the calls it receives.
pub struct FakeBackend {
    pub customer: Customer,
    pub area: Area,
    pub district: District,
    pub property: Property,
    pub residence_type: ResidenceType,
    pub root_service: Service,
    pub regular: Service,
    pub deep: Service,
    pub specialized: Service,
    pub category: Service,
    pub item: SpecializedItem,
    pub team_id: Uuid,
    pub blocked_id: Uuid,
    pub expires_at: Option<DateTime<Utc>>,
    pub calls: Mutex<Vec<String>>,
    pub payloads: Mutex<Vec<FinalBookingPayload>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let area = Area {
            id: Uuid::new_v4(),
            name: "Dubai Marina".to_string(),
        };
        let district = District {
            id: Uuid::new_v4(),
            area_id: area.id,
            name: "Marina Walk".to_string(),
        };
        let property = Property {
            id: Uuid::new_v4(),
            district_id: district.id,
            name: "Marina Heights".to_string(),
            lat: 25.08,
            lng: 55.14,
        };
        let root_service = service("Home Cleaning", None);
        let regular = service("Regular Cleaning", Some(root_service.id));
        let deep = service("Deep Clean", Some(root_service.id));
        let specialized = service("Sofa & Carpet", Some(root_service.id));
        let category = service("Sofas", Some(specialized.id));
        let item = SpecializedItem {
            id: Uuid::new_v4(),
            category_id: category.id,
            name: "3-seater sofa".to_string(),
            unit_price: 15_000,
            currency: "AED".to_string(),
        };
        Self {
            customer: Customer {
                id: Uuid::new_v4(),
                name: "Layla Haddad".to_string(),
                phone: "+971 50 123 4567".to_string(),
                email: "layla@example.com".to_string(),
                area_id: None,
                district_id: None,
                property_id: None,
                residence_type_id: None,
                apartment_number: None,
                created_at: Utc::now(),
            },
            area,
            district,
            property,
            residence_type: ResidenceType {
                id: Uuid::new_v4(),
                type_name: "Apartment".to_string(),
            },
            root_service,
            regular,
            deep,
            specialized,
            category,
            item,
            team_id: Uuid::new_v4(),
            blocked_id: Uuid::new_v4(),
            expires_at: None,
            calls: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls().iter().any(|recorded| recorded == call)
    }

    pub fn last_payload(&self) -> Option<FinalBookingPayload> {
        self.payloads.lock().unwrap().last().cloned()
    }
}

fn service(name: &str, parent_id: Option<Uuid>) -> Service {
    Service {
        id: Uuid::new_v4(),
        name: name.to_string(),
        parent_id,
        base_price: 12_000,
        currency: "AED".to_string(),
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn search_customers(&self, _search: Option<String>) -> BookingResult<Vec<Customer>> {
        self.record("search_customers");
        Ok(vec![self.customer.clone()])
    }

    async fn get_customer(&self, id: Uuid) -> BookingResult<Option<Customer>> {
        self.record("get_customer");
        Ok((id == self.customer.id).then(|| self.customer.clone()))
    }

    async fn create_customer(&self, customer: NewCustomer) -> BookingResult<Customer> {
        self.record("create_customer");
        Ok(Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            area_id: None,
            district_id: None,
            property_id: None,
            residence_type_id: None,
            apartment_number: None,
            created_at: Utc::now(),
        })
    }

    async fn list_areas(&self) -> BookingResult<Vec<Area>> {
        self.record("list_areas");
        Ok(vec![self.area.clone()])
    }

    async fn list_districts(&self, area_id: Uuid) -> BookingResult<Vec<District>> {
        self.record("list_districts");
        Ok(if area_id == self.area.id { vec![self.district.clone()] } else { Vec::new() })
    }

    async fn list_properties(&self, district_id: Uuid) -> BookingResult<Vec<Property>> {
        self.record("list_properties");
        Ok(if district_id == self.district.id { vec![self.property.clone()] } else { Vec::new() })
    }

    async fn list_residence_types(&self) -> BookingResult<Vec<ResidenceType>> {
        self.record("list_residence_types");
        Ok(vec![self.residence_type.clone()])
    }

    async fn list_services(&self, parent_id: Option<Uuid>) -> BookingResult<Vec<Service>> {
        self.record("list_services");
        let all = [
            self.root_service.clone(),
            self.regular.clone(),
            self.deep.clone(),
            self.specialized.clone(),
            self.category.clone(),
        ];
        Ok(all.into_iter().filter(|service| service.parent_id == parent_id).collect())
    }

    async fn list_specialized_items(&self, category_id: Uuid) -> BookingResult<Vec<SpecializedItem>> {
        self.record("list_specialized_items");
        Ok(if category_id == self.category.id { vec![self.item.clone()] } else { Vec::new() })
    }

    async fn fetch_bundles(&self, _query: BundleQuery) -> BookingResult<Vec<Bundle>> {
        self.record("fetch_bundles");
        Ok(vec![two_day_bundle(self.team_id)])
    }

    async fn fetch_quote(&self, _query: QuoteQuery) -> BookingResult<Quote> {
        self.record("fetch_quote");
        Ok(Quote {
            unit_price: 12_000,
            visits: 8,
            cleaner_count: 2,
            total_amount: 192_000,
            currency: "AED".to_string(),
        })
    }

    async fn block_booking(&self, payload: FinalBookingPayload) -> BookingResult<BlockedBooking> {
        self.record("block_booking");
        self.payloads.lock().unwrap().push(payload);
        Ok(BlockedBooking {
            booking_id: self.blocked_id,
            expires_at: self.expires_at,
        })
    }

    async fn confirm_booking(&self, booking_id: Uuid) -> BookingResult<()> {
        self.record("confirm_booking");
        if booking_id == self.blocked_id {
            Ok(())
        } else {
            Err(BookingError::NotFound(format!("Booking {booking_id} not found")))
        }
    }

    async fn release_booking(&self, _booking_id: Uuid) -> BookingResult<()> {
        self.record("release_booking");
        Ok(())
    }

    async fn create_deep_booking(&self, payload: FinalBookingPayload) -> BookingResult<Uuid> {
        self.record("create_deep_booking");
        self.payloads.lock().unwrap().push(payload);
        Ok(Uuid::new_v4())
    }

    async fn create_specialized_booking(
        &self,
        payload: FinalBookingPayload,
        _items: Vec<SelectedItem>,
    ) -> BookingResult<Uuid> {
        self.record("create_specialized_booking");
        self.payloads.lock().unwrap().push(payload);
        Ok(Uuid::new_v4())
    }

    async fn list_teams(&self) -> BookingResult<Vec<Team>> {
        self.record("list_teams");
        Ok(Vec::new())
    }

    async fn list_schedules(&self, _start: NaiveDate, _end: NaiveDate) -> BookingResult<Vec<TeamSchedule>> {
        self.record("list_schedules");
        Ok(Vec::new())
    }
}
