use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
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

/// Fields collected by the wizard when the booking is for a customer that
/// does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl NewCustomer {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.phone.trim().is_empty() && !self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
    pub residence_type_id: Option<Uuid>,
    pub apartment_number: Option<String>,
}

impl From<NewCustomer> for CreateCustomerRequest {
    fn from(customer: NewCustomer) -> Self {
        Self {
            name: customer.name,
            phone: customer.phone,
            email: customer.email,
            area_id: None,
            district_id: None,
            property_id: None,
            residence_type_id: None,
            apartment_number: None,
        }
    }
}
