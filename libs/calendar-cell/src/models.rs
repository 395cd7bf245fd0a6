// libs/calendar-cell/src/models.rs
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// ==============================================================================
// RAW INPUT MODELS (portal REST API wire shapes)
// ==============================================================================

/// Appointment row as the portal API returns it. Every field is optional:
/// the API denormalizes patient/provider/service data onto the row and
/// omits anything the clinic never captured.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawAppointment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub patient_first_name: Option<String>,
    #[serde(default)]
    pub patient_paternal_surname: Option<String>,
    #[serde(default)]
    pub patient_maternal_surname: Option<String>,
    #[serde(default)]
    pub patient_phone: Option<String>,
    #[serde(default)]
    pub patient_email: Option<String>,
    #[serde(default)]
    pub patient_birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub patient_gender: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub service_category: Option<String>,
    #[serde(default)]
    pub service_price: Option<f64>,
    /// Number of minutes; the portal emits this as a number or a numeric
    /// string depending on how the service was captured.
    #[serde(default)]
    pub service_duration: Option<Value>,
    #[serde(default)]
    pub consultation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub treatment_id: Option<String>,
    #[serde(default)]
    pub is_treatment: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: Option<bool>,
}

/// Treatment plan row as the portal API returns it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawTreatment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub total_visits: Option<u32>,
    #[serde(default)]
    pub completed_visits: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_end_date: Option<NaiveDate>,
}

// ==============================================================================
// CANONICAL EVENT MODEL
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    PreRegistration,
}

impl EventStatus {
    /// Map a free-form portal status label onto the fixed enumeration.
    /// Returns `None` for labels outside it; the normalizer decides the
    /// fallback.
    pub fn parse_label(label: &str) -> Option<EventStatus> {
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Some(EventStatus::Pending),
            "confirmed" => Some(EventStatus::Confirmed),
            "cancelled" | "canceled" => Some(EventStatus::Cancelled),
            "completed" => Some(EventStatus::Completed),
            "pre_registration" | "preregistration" => Some(EventStatus::PreRegistration),
            _ => None,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Pending => write!(f, "pending"),
            EventStatus::Confirmed => write!(f, "confirmed"),
            EventStatus::Cancelled => write!(f, "cancelled"),
            EventStatus::Completed => write!(f, "completed"),
            EventStatus::PreRegistration => write!(f, "pre_registration"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Consultation,
    Treatment,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Consultation => write!(f, "consultation"),
            EventKind::Treatment => write!(f, "treatment"),
        }
    }
}

/// Compact view of the treatment plan an event belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentSummary {
    pub id: String,
    pub name: String,
    pub total_visits: Option<u32>,
    pub completed_visits: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
}

impl TreatmentSummary {
    pub fn from_raw(raw: &RawTreatment) -> Self {
        Self {
            id: raw.id.clone().unwrap_or_default(),
            name: raw.name.clone().unwrap_or_default(),
            total_visits: raw.total_visits,
            completed_visits: raw.completed_visits,
            start_date: raw.start_date,
            estimated_end_date: raw.estimated_end_date,
        }
    }
}

/// Canonical calendar event. Rebuilt from scratch on every refresh cycle;
/// never mutated in place once published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub service_name: String,
    pub category: Option<String>,
    pub status: EventStatus,
    pub kind: EventKind,
    pub patient_id: Option<String>,
    pub patient_name: String,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub treatment_id: Option<String>,
    /// 1-based position within the treatment group, ordered by start time.
    /// Present iff kind = Treatment and a treatment id exists.
    pub visit_index: Option<u32>,
    pub treatment: Option<TreatmentSummary>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

impl CalendarEvent {
    /// Past/future is a property of the read, not the record, so it is
    /// recomputed against the caller's clock instead of being cached.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.start < now
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Single place where titles are composed, so re-sequencing rebuilds
    /// them instead of appending another " (n)" suffix.
    pub fn compose_title(
        kind: &EventKind,
        category: Option<&str>,
        service_name: &str,
        visit_index: Option<u32>,
    ) -> String {
        let base = match (kind, category) {
            (EventKind::Treatment, Some(category)) if !category.is_empty() => {
                format!("{} - {}", category, service_name)
            }
            _ => service_name.to_string(),
        };
        match visit_index {
            Some(index) => format!("{} ({})", base, index),
            None => base,
        }
    }
}

/// Normalizer output: the canonical events plus how many malformed raw
/// records were dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub events: Vec<CalendarEvent>,
    pub skipped: usize,
}

// ==============================================================================
// FILTER MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    #[default]
    All,
    Today,
    Upcoming,
    Past,
}

impl TimeBucket {
    pub fn matches(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            TimeBucket::All => true,
            TimeBucket::Today => {
                let (start_of_today, start_of_tomorrow) = day_bounds(now);
                start >= start_of_today && start < start_of_tomorrow
            }
            TimeBucket::Upcoming => start >= now,
            TimeBucket::Past => start < now,
        }
    }
}

/// `[startOfToday, startOfTomorrow)` for the day containing `now`, in UTC.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_of_today = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    (start_of_today, start_of_today + Duration::days(1))
}

/// Filter specification over the canonical event set. Dimensions compose
/// conjunctively; within a dimension at most one value is active at a time.
/// Selecting a value in one dimension deliberately leaves the others as
/// they were (cumulative across dimensions).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EventFilter {
    pub bucket: TimeBucket,
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    pub provider_id: Option<String>,
    pub patient_id: Option<String>,
    pub search_text: Option<String>,
}

impl EventFilter {
    /// True iff any dimension differs from its default. Blank search text
    /// restricts nothing, so it counts as the default.
    pub fn is_active(&self) -> bool {
        self.bucket != TimeBucket::All
            || self.status.is_some()
            || self.category.is_some()
            || self.provider_id.is_some()
            || self.patient_id.is_some()
            || self
                .search_text
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
    }
}

// ==============================================================================
// DERIVED INDEX AND STATISTICS MODELS
// ==============================================================================

/// Palette cycled over patients in first-occurrence order. Assignment is a
/// pure function of that order, so a given fetch always colors the same way.
pub const PATIENT_COLOR_PALETTE: [&str; 8] = [
    "#1E88E5", "#43A047", "#FB8C00", "#8E24AA", "#00ACC1", "#F4511E", "#3949AB", "#6D4C41",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonRef {
    pub id: String,
    pub display_name: String,
}

/// Auxiliary lookups computed from the unfiltered canonical set. Rebuilt
/// when the set is rebuilt, untouched by filter changes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarIndex {
    pub patients: Vec<PersonRef>,
    pub patient_colors: HashMap<String, String>,
    pub providers: Vec<PersonRef>,
    pub category_counts: HashMap<String, usize>,
}

/// Summary counters over the unfiltered canonical set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CalendarStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
    pub completed: usize,
    pub pre_registration: usize,
    pub today: usize,
}

// ==============================================================================
// SNAPSHOT MODEL
// ==============================================================================

/// One atomic publication of the refresh pipeline: events, derived index and
/// statistics always describe the same fetch. Readers hold an `Arc` to the
/// snapshot they started with, so a concurrent rebuild never tears their view.
#[derive(Debug, Clone)]
pub struct CalendarSnapshot {
    pub generation: u64,
    pub refreshed_at: DateTime<Utc>,
    pub events: Vec<CalendarEvent>,
    pub index: CalendarIndex,
    pub stats: CalendarStats,
    pub skipped_records: usize,
}

impl CalendarSnapshot {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            refreshed_at: Utc::now(),
            events: Vec::new(),
            index: CalendarIndex::default(),
            stats: CalendarStats::default(),
            skipped_records: 0,
        }
    }
}
