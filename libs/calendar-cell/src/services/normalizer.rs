// libs/calendar-cell/src/services/normalizer.rs
use chrono::Duration;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{
    CalendarEvent, EventKind, EventStatus, NormalizedBatch, RawAppointment, RawTreatment,
    TreatmentSummary,
};

/// Applied when the service carries no duration, or a duration that is not
/// a positive whole number of minutes.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Converts raw portal rows into canonical `CalendarEvent`s. This is the
/// only place optional wire fields are validated and defaulted; everything
/// downstream operates on the fully-typed shape.
pub struct EventNormalizerService;

impl EventNormalizerService {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one fetch batch. Archived rows are excluded outright; rows
    /// missing an identifier or consultation timestamp are dropped with a
    /// warning and counted, never failing the batch.
    pub fn normalize(
        &self,
        raw: &[RawAppointment],
        treatments: &HashMap<String, RawTreatment>,
    ) -> NormalizedBatch {
        let mut events = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;

        for record in raw {
            if record.archived.unwrap_or(false) {
                debug!("Excluding archived appointment {:?}", record.id);
                continue;
            }

            let id = match record.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => id.to_string(),
                None => {
                    warn!("Skipping appointment without identifier");
                    skipped += 1;
                    continue;
                }
            };

            let start = match record.consultation_date {
                Some(start) => start,
                None => {
                    warn!("Skipping appointment {} without consultation timestamp", id);
                    skipped += 1;
                    continue;
                }
            };

            let treatment_id = record
                .treatment_id
                .as_deref()
                .filter(|tid| !tid.is_empty())
                .map(String::from);
            let kind = if treatment_id.is_some() || record.is_treatment.unwrap_or(false) {
                EventKind::Treatment
            } else {
                EventKind::Consultation
            };

            let status = match record.status.as_deref().and_then(EventStatus::parse_label) {
                Some(status) => status,
                None => {
                    debug!(
                        "Appointment {} has unknown status {:?}, defaulting to pending",
                        id, record.status
                    );
                    EventStatus::Pending
                }
            };

            // A dangling treatment reference is tolerated: the event keeps
            // its treatment kind and id, the summary stays empty.
            let treatment = treatment_id
                .as_ref()
                .and_then(|tid| treatments.get(tid))
                .map(TreatmentSummary::from_raw);

            let service_name = record.service_name.clone().unwrap_or_default();
            let category = record
                .service_category
                .as_deref()
                .filter(|category| !category.is_empty())
                .map(String::from);
            let duration = parse_duration_minutes(record.service_duration.as_ref());

            events.push(CalendarEvent {
                title: CalendarEvent::compose_title(&kind, category.as_deref(), &service_name, None),
                end: start + Duration::minutes(duration),
                patient_name: compose_display_name(
                    record.patient_first_name.as_deref(),
                    record.patient_paternal_surname.as_deref(),
                    record.patient_maternal_surname.as_deref(),
                ),
                id,
                start,
                service_name,
                category,
                status,
                kind,
                patient_id: record.patient_id.clone(),
                provider_id: record.provider_id.clone(),
                provider_name: record.provider_name.clone(),
                treatment_id,
                visit_index: None,
                treatment,
                price: record.service_price,
                notes: record.notes.clone(),
            });
        }

        if skipped > 0 {
            warn!("Dropped {} malformed appointment records", skipped);
        }

        NormalizedBatch { events, skipped }
    }

    /// Key the treatment fetch by id for the normalizer's lookup. Rows
    /// without an id cannot be referenced and are ignored.
    pub fn treatment_map(&self, treatments: Vec<RawTreatment>) -> HashMap<String, RawTreatment> {
        treatments
            .into_iter()
            .filter_map(|treatment| {
                let id = treatment.id.clone().filter(|id| !id.is_empty())?;
                Some((id, treatment))
            })
            .collect()
    }
}

impl Default for EventNormalizerService {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_duration_minutes(raw: Option<&Value>) -> i64 {
    let parsed = match raw {
        Some(Value::Number(minutes)) => minutes.as_i64(),
        Some(Value::String(minutes)) => minutes.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(minutes) if minutes > 0 => minutes,
        _ => DEFAULT_DURATION_MINUTES,
    }
}

/// Trimmed concatenation of the name parts with repeated whitespace
/// collapsed to single spaces.
fn compose_display_name(
    first_name: Option<&str>,
    paternal_surname: Option<&str>,
    maternal_surname: Option<&str>,
) -> String {
    [first_name, paternal_surname, maternal_surname]
        .iter()
        .flatten()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
