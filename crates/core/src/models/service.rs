use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable service. Top-level services have no parent; sub-services and
/// specialized categories hang off a parent service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Price of a single visit in minor currency units.
    pub base_price: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub base_price: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

pub fn default_currency() -> String {
    "AED".to_string()
}

/// Business variant of a sub-service.
///
/// Decided once when the sub-service is selected and carried on the draft,
/// so the rest of the workflow never inspects the display name again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Regular,
    Deep,
    Specialized,
}

impl ServiceKind {
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("regular") {
            ServiceKind::Regular
        } else if name.contains("deep") {
            ServiceKind::Deep
        } else {
            ServiceKind::Specialized
        }
    }

    pub fn is_regular(self) -> bool {
        self == ServiceKind::Regular
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Once,
    Twice,
    Three,
    Four,
    Five,
    Six,
}

impl Frequency {
    /// Number of visits per week a customer has to pick a slot for.
    pub fn required_slots(self) -> usize {
        match self {
            Frequency::OneTime | Frequency::Once => 1,
            Frequency::Twice => 2,
            Frequency::Three => 3,
            Frequency::Four => 4,
            Frequency::Five => 5,
            Frequency::Six => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::OneTime => "one_time",
            Frequency::Once => "once",
            Frequency::Twice => "twice",
            Frequency::Three => "three",
            Frequency::Four => "four",
            Frequency::Five => "five",
            Frequency::Six => "six",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "one_time" => Some(Frequency::OneTime),
            "once" => Some(Frequency::Once),
            "twice" => Some(Frequency::Twice),
            "three" => Some(Frequency::Three),
            "four" => Some(Frequency::Four),
            "five" => Some(Frequency::Five),
            "six" => Some(Frequency::Six),
            _ => None,
        }
    }
}

/// Slot count required for a frequency given as its wire name; anything
/// unrecognised needs a single slot.
pub fn required_slots_for(frequency: Option<&str>) -> usize {
    frequency
        .and_then(Frequency::parse)
        .map(Frequency::required_slots)
        .unwrap_or(1)
}

/// An item that can be ordered under a specialized category, e.g. a sofa or
/// a carpet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecializedItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: i64,
    pub currency: String,
}

impl SelectedItem {
    pub fn line_total(&self) -> i64 {
        i64::from(self.quantity) * self.unit_price
    }
}

pub fn items_total(items: &[SelectedItem]) -> i64 {
    items.iter().map(SelectedItem::line_total).sum()
}
