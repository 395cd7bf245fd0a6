// libs/calendar-cell/src/services/stats.rs
use chrono::{DateTime, Utc};

use crate::models::{CalendarEvent, CalendarStats, EventStatus, TimeBucket};

/// Summary counters over the full normalized set. Recomputed when the
/// canonical set is rebuilt, never from a filtered view.
pub struct StatsAggregatorService;

impl StatsAggregatorService {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, events: &[CalendarEvent], now: DateTime<Utc>) -> CalendarStats {
        let mut stats = CalendarStats::default();

        for event in events {
            stats.total += 1;
            match event.status {
                EventStatus::Pending => stats.pending += 1,
                EventStatus::Confirmed => stats.confirmed += 1,
                EventStatus::Cancelled => stats.cancelled += 1,
                EventStatus::Completed => stats.completed += 1,
                EventStatus::PreRegistration => stats.pre_registration += 1,
            }
            if TimeBucket::Today.matches(event.start, now) {
                stats.today += 1;
            }
        }

        stats
    }
}

impl Default for StatsAggregatorService {
    fn default() -> Self {
        Self::new()
    }
}
