use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Service address of a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Address {
    /// Free-form query handed to the geocoder
    pub fn geocode_query(&self) -> String {
        let street = self.street.trim();
        let city = self.city.trim();
        if street.is_empty() {
            city.to_string()
        } else {
            format!("{}, {}", street, city)
        }
    }
}

/// Kind of cleaning service requested by a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    RegularCleaning,
    DeepCleaning,
    MoveInOut,
    OfficeCleaning,
    PostConstruction,
    WindowCleaning,
}

impl ServiceType {
    /// The one specialization tag a provider needs for an exact skill match
    pub const fn required_specialization(self) -> &'static str {
        match self {
            ServiceType::RegularCleaning => "regular_cleaning",
            ServiceType::DeepCleaning => "deep_cleaning",
            ServiceType::MoveInOut => "move_in_out",
            ServiceType::OfficeCleaning => "office_cleaning",
            ServiceType::PostConstruction => "post_construction",
            ServiceType::WindowCleaning => "window_cleaning",
        }
    }
}

/// Optional extras on a booking. Only `window_cleaning` affects matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addons {
    #[serde(rename = "windowCleaning", default)]
    pub window_cleaning: bool,
    #[serde(rename = "insideFridge", default)]
    pub inside_fridge: bool,
    #[serde(rename = "insideOven", default)]
    pub inside_oven: bool,
    #[serde(rename = "laundryLoads", default)]
    pub laundry_loads: u8,
}

/// A service request to be matched against providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    #[serde(rename = "scheduledDate")]
    pub scheduled_date: NaiveDate,
    #[serde(rename = "scheduledTime")]
    pub scheduled_time: NaiveTime,
    #[serde(rename = "serviceType")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub addons: Addons,
    pub address: Address,
}

/// Cleaner profile as returned by the provider directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub city: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub specializations: BTreeSet<String>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: Option<f64>,
    #[serde(rename = "totalJobs", default)]
    pub total_jobs: u32,
    #[serde(rename = "isApproved", default = "default_true")]
    pub is_approved: bool,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

impl Provider {
    /// Approved and active providers are the only ones the engine ranks
    pub fn is_eligible(&self) -> bool {
        self.is_approved && self.is_active
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotKind {
    Recurring,
    OneTime,
    Blocked,
}

/// Which day(s) a slot applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotDay {
    Weekly(Weekday),
    Date(NaiveDate),
}

impl SlotDay {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            SlotDay::Weekly(weekday) => date.weekday() == *weekday,
            SlotDay::Date(day) => *day == date,
        }
    }
}

/// Time window within a day, inclusive at both ends. Never wraps midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    #[serde(rename = "providerId")]
    pub provider_id: Uuid,
    pub kind: SlotKind,
    pub day: SlotDay,
    pub window: TimeRange,
}

impl AvailabilitySlot {
    /// True when this slot applies to `date` and its window contains `time`
    #[inline]
    pub fn covers(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.day.matches(date) && self.window.contains(time)
    }
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Candidate lookup parameters handed to the provider directory
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub city: String,
    pub center: Option<Coordinates>,
    pub radius_km: f64,
    pub limit: usize,
}
