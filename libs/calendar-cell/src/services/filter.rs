// libs/calendar-cell/src/services/filter.rs
use chrono::{DateTime, Utc};

use crate::models::{CalendarEvent, EventFilter};

/// Applies a filter specification over the canonical set. Pure and
/// re-entrant: the canonical set is never altered, the output preserves
/// input order, and repeated calls with the same inputs agree.
pub struct EventFilterService;

impl EventFilterService {
    pub fn new() -> Self {
        Self
    }

    /// All active dimensions must match (logical AND). `now` anchors the
    /// temporal bucket so callers and tests share one clock reading.
    pub fn apply(
        &self,
        events: &[CalendarEvent],
        filter: &EventFilter,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let search = filter
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        events
            .iter()
            .filter(|event| {
                filter.bucket.matches(event.start, now)
                    && filter
                        .status
                        .as_ref()
                        .map_or(true, |status| event.status == *status)
                    && filter
                        .category
                        .as_deref()
                        .map_or(true, |category| event.category.as_deref() == Some(category))
                    && filter
                        .provider_id
                        .as_deref()
                        .map_or(true, |provider| event.provider_id.as_deref() == Some(provider))
                    && filter
                        .patient_id
                        .as_deref()
                        .map_or(true, |patient| event.patient_id.as_deref() == Some(patient))
                    && search
                        .as_deref()
                        .map_or(true, |query| event.patient_name.to_lowercase().contains(query))
            })
            .cloned()
            .collect()
    }
}

impl Default for EventFilterService {
    fn default() -> Self {
        Self::new()
    }
}
