// libs/calendar-cell/tests/filter_test.rs
use chrono::{DateTime, Duration, TimeZone, Utc};

use calendar_cell::models::{
    day_bounds, CalendarEvent, EventFilter, EventKind, EventStatus, TimeBucket,
};
use calendar_cell::services::filter::EventFilterService;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap()
}

fn event(id: &str, start: DateTime<Utc>) -> CalendarEvent {
    CalendarEvent {
        id: id.to_string(),
        title: "Limpieza dental".to_string(),
        start,
        end: start + Duration::minutes(30),
        service_name: "Limpieza dental".to_string(),
        category: None,
        status: EventStatus::Pending,
        kind: EventKind::Consultation,
        patient_id: Some("patient-1".to_string()),
        patient_name: "Ana García".to_string(),
        provider_id: Some("provider-1".to_string()),
        provider_name: Some("Dra. Torres".to_string()),
        treatment_id: None,
        visit_index: None,
        treatment: None,
        price: None,
        notes: None,
    }
}

fn ids(events: &[CalendarEvent]) -> Vec<&str> {
    events.iter().map(|e| e.id.as_str()).collect()
}

// ==============================================================================
// DEFAULT FILTER
// ==============================================================================

#[test]
fn default_filter_returns_everything_in_original_order() {
    let service = EventFilterService::new();
    let events = vec![
        event("a-1", now() - Duration::days(2)),
        event("a-2", now() + Duration::hours(1)),
        event("a-3", now() + Duration::days(3)),
    ];

    let filtered = service.apply(&events, &EventFilter::default(), now());

    assert_eq!(ids(&filtered), vec!["a-1", "a-2", "a-3"]);
    assert!(!EventFilter::default().is_active());
}

// ==============================================================================
// TEMPORAL BUCKETS
// ==============================================================================

#[test]
fn today_bucket_uses_half_open_day_bounds() {
    let service = EventFilterService::new();
    let (start_of_today, start_of_tomorrow) = day_bounds(now());
    let events = vec![
        event("at-midnight", start_of_today),
        event("before-midnight", start_of_tomorrow - Duration::minutes(1)),
        event("tomorrow", start_of_tomorrow),
        event("yesterday", start_of_today - Duration::minutes(1)),
    ];

    let filter = EventFilter {
        bucket: TimeBucket::Today,
        ..Default::default()
    };
    let filtered = service.apply(&events, &filter, now());

    assert_eq!(ids(&filtered), vec!["at-midnight", "before-midnight"]);
}

#[test]
fn upcoming_and_past_split_on_now() {
    let service = EventFilterService::new();
    let events = vec![
        event("past", now() - Duration::minutes(1)),
        event("at-now", now()),
        event("future", now() + Duration::minutes(1)),
    ];

    let upcoming = service.apply(
        &events,
        &EventFilter { bucket: TimeBucket::Upcoming, ..Default::default() },
        now(),
    );
    let past = service.apply(
        &events,
        &EventFilter { bucket: TimeBucket::Past, ..Default::default() },
        now(),
    );

    assert_eq!(ids(&upcoming), vec!["at-now", "future"]);
    assert_eq!(ids(&past), vec!["past"]);
}

#[test]
fn upcoming_confirmed_keeps_only_the_future_confirmed_event() {
    let service = EventFilterService::new();
    let mut past_confirmed = event("past-confirmed", now() - Duration::hours(2));
    past_confirmed.status = EventStatus::Confirmed;
    let mut future_confirmed = event("future-confirmed", now() + Duration::hours(2));
    future_confirmed.status = EventStatus::Confirmed;

    let filter = EventFilter {
        bucket: TimeBucket::Upcoming,
        status: Some(EventStatus::Confirmed),
        ..Default::default()
    };
    let filtered = service.apply(&[past_confirmed, future_confirmed], &filter, now());

    assert_eq!(ids(&filtered), vec!["future-confirmed"]);
}

// ==============================================================================
// CUMULATIVE-ACROSS-DIMENSIONS COMPOSITION
// ==============================================================================

#[test]
fn category_then_provider_retains_both_constraints() {
    let service = EventFilterService::new();
    let mut ortho_p1 = event("ortho-p1", now());
    ortho_p1.category = Some("Ortodoncia".to_string());
    let mut ortho_p2 = event("ortho-p2", now());
    ortho_p2.category = Some("Ortodoncia".to_string());
    ortho_p2.provider_id = Some("P2".to_string());
    let mut endo_p2 = event("endo-p2", now());
    endo_p2.category = Some("Endodoncia".to_string());
    endo_p2.provider_id = Some("P2".to_string());
    let events = vec![ortho_p1, ortho_p2, endo_p2];

    // First dimension selected.
    let mut filter = EventFilter {
        category: Some("Ortodoncia".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&service.apply(&events, &filter, now())), vec!["ortho-p1", "ortho-p2"]);

    // Second dimension selected; the first stays composed.
    filter.provider_id = Some("P2".to_string());
    assert_eq!(ids(&service.apply(&events, &filter, now())), vec!["ortho-p2"]);
    assert!(filter.is_active());
}

#[test]
fn patient_dimension_composes_like_the_others() {
    let service = EventFilterService::new();
    let mut other_patient = event("other", now());
    other_patient.patient_id = Some("patient-2".to_string());
    let events = vec![event("mine", now()), other_patient];

    let filter = EventFilter {
        patient_id: Some("patient-1".to_string()),
        ..Default::default()
    };

    assert_eq!(ids(&service.apply(&events, &filter, now())), vec!["mine"]);
}

// ==============================================================================
// FREE-TEXT SEARCH
// ==============================================================================

#[test]
fn search_is_case_insensitive_substring_on_patient_name() {
    let service = EventFilterService::new();
    let mut garcia = event("garcia", now());
    garcia.patient_name = "Ana García".to_string();
    let mut lopez = event("lopez", now());
    lopez.patient_name = "Luis López".to_string();
    let events = vec![garcia, lopez];

    let filter = EventFilter {
        search_text: Some("GARC".to_string()),
        ..Default::default()
    };

    assert_eq!(ids(&service.apply(&events, &filter, now())), vec!["garcia"]);
}

#[test]
fn blank_search_text_restricts_nothing_and_stays_inactive() {
    let service = EventFilterService::new();
    let events = vec![event("a-1", now()), event("a-2", now())];

    let filter = EventFilter {
        search_text: Some("   ".to_string()),
        ..Default::default()
    };

    assert_eq!(service.apply(&events, &filter, now()).len(), 2);
    assert!(!filter.is_active());
}

// ==============================================================================
// ACTIVITY FLAG
// ==============================================================================

#[test]
fn any_non_default_dimension_activates_the_filter() {
    let bucket_only = EventFilter { bucket: TimeBucket::Past, ..Default::default() };
    let status_only = EventFilter { status: Some(EventStatus::Cancelled), ..Default::default() };
    let search_only = EventFilter { search_text: Some("ana".to_string()), ..Default::default() };

    assert!(bucket_only.is_active());
    assert!(status_only.is_active());
    assert!(search_only.is_active());
    assert!(!EventFilter::default().is_active());
}
