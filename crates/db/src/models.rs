use brightbook_core::models::{
    customer::Customer,
    reference::{Area, District, Property, ResidenceType},
    roster::{TeamMember, TeamSchedule},
    service::{Service, SpecializedItem},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbArea {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDistrict {
    pub id: Uuid,
    pub area_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProperty {
    pub id: Uuid,
    pub district_id: Uuid,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbResidenceType {
    pub id: Uuid,
    pub type_name: String,
    /// Cleaners sent to a residence of this type.
    pub cleaner_count: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub base_price: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSpecializedItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub residence_type_id: Option<Uuid>,
    pub apartment_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeam {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeamSchedule {
    pub id: Uuid,
    pub team_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_blocked: bool,
    pub is_available: bool,
    pub is_booked: bool,
    pub booking_id: Option<Uuid>,
    pub status: Option<String>,
    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub team_id: Option<Uuid>,
    pub total_amount: i64,
    pub currency: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub payment_status: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DbBooking {
    pub fn is_blocked(&self) -> bool {
        self.status == BOOKING_BLOCKED
    }
}

pub const BOOKING_BLOCKED: &str = "blocked";
pub const BOOKING_CONFIRMED: &str = "confirmed";
pub const BOOKING_RELEASED: &str = "released";

impl From<DbArea> for Area {
    fn from(row: DbArea) -> Self {
        Area {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<DbDistrict> for District {
    fn from(row: DbDistrict) -> Self {
        District {
            id: row.id,
            area_id: row.area_id,
            name: row.name,
        }
    }
}

impl From<DbProperty> for Property {
    fn from(row: DbProperty) -> Self {
        Property {
            id: row.id,
            district_id: row.district_id,
            name: row.name,
            lat: row.lat,
            lng: row.lng,
        }
    }
}

impl From<DbResidenceType> for ResidenceType {
    fn from(row: DbResidenceType) -> Self {
        ResidenceType {
            id: row.id,
            type_name: row.type_name,
        }
    }
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            base_price: row.base_price,
            currency: row.currency,
        }
    }
}

impl From<DbSpecializedItem> for SpecializedItem {
    fn from(row: DbSpecializedItem) -> Self {
        SpecializedItem {
            id: row.id,
            category_id: row.category_id,
            name: row.name,
            unit_price: row.unit_price,
            currency: row.currency,
        }
    }
}

impl From<DbCustomer> for Customer {
    fn from(row: DbCustomer) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            area_id: row.area_id,
            district_id: row.district_id,
            property_id: row.property_id,
            residence_type_id: row.residence_type_id,
            apartment_number: row.apartment_number,
            created_at: row.created_at,
        }
    }
}

impl From<DbTeamMember> for TeamMember {
    fn from(row: DbTeamMember) -> Self {
        TeamMember {
            id: row.id,
            team_id: row.team_id,
            name: row.name,
            role: row.role,
        }
    }
}

impl From<DbTeamSchedule> for TeamSchedule {
    fn from(row: DbTeamSchedule) -> Self {
        TeamSchedule {
            id: row.id,
            team_id: row.team_id,
            date: row.date,
            start_time: row.start_time.format(TIME_FORMAT).to_string(),
            end_time: row.end_time.format(TIME_FORMAT).to_string(),
            is_blocked: row.is_blocked,
            is_available: row.is_available,
            is_booked: row.is_booked,
            booking_id: row.booking_id,
            status: row.status,
            area_id: row.area_id,
            district_id: row.district_id,
            property_id: row.property_id,
        }
    }
}

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> eyre::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| eyre::eyre!("Invalid time '{}': {}", value, e))
}
