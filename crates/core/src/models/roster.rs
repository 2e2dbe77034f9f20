use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<TeamMember>,
}

/// One shift record of a team on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSchedule {
    pub id: Uuid,
    pub team_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_blocked: bool,
    pub is_available: bool,
    pub is_booked: bool,
    pub booking_id: Option<Uuid>,
    pub status: Option<String>,
    pub area_id: Option<Uuid>,
    pub district_id: Option<Uuid>,
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterStatus {
    Working,
    Available,
    Booked,
    Cancelled,
    Transporting,
    Break,
    Blocked,
    Completed,
    Unknown,
}

impl RosterStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Working" => RosterStatus::Working,
            "Available" => RosterStatus::Available,
            "Booked" => RosterStatus::Booked,
            "Cancelled" => RosterStatus::Cancelled,
            "Transporting" => RosterStatus::Transporting,
            "Break" => RosterStatus::Break,
            "Blocked" => RosterStatus::Blocked,
            "Completed" => RosterStatus::Completed,
            _ => RosterStatus::Unknown,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RosterStatus::Working => "#2563eb",
            RosterStatus::Available => "#16a34a",
            RosterStatus::Booked => "#dc2626",
            RosterStatus::Cancelled => "#6b7280",
            RosterStatus::Transporting => "#f59e0b",
            RosterStatus::Break => "#a855f7",
            RosterStatus::Blocked => "#111827",
            RosterStatus::Completed => "#0d9488",
            RosterStatus::Unknown => "#d1d5db",
        }
    }
}

impl TeamSchedule {
    /// Explicit status wins; otherwise fall back to the availability flags.
    pub fn roster_status(&self) -> RosterStatus {
        if let Some(status) = &self.status {
            return RosterStatus::parse(status);
        }
        if self.is_booked {
            RosterStatus::Booked
        } else if self.is_blocked {
            RosterStatus::Blocked
        } else if self.is_available {
            RosterStatus::Available
        } else {
            RosterStatus::Unknown
        }
    }

    pub fn is_free(&self) -> bool {
        self.is_available && !self.is_blocked && !self.is_booked
    }
}
