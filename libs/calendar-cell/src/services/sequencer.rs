// libs/calendar-cell/src/services/sequencer.rs
use std::collections::HashMap;
use tracing::debug;

use crate::models::{CalendarEvent, EventKind};

/// Assigns 1-based visit indices within each treatment group, ordered by
/// start time. Events without a treatment id are left untouched.
pub struct TreatmentSequencerService;

impl TreatmentSequencerService {
    pub fn new() -> Self {
        Self
    }

    /// Re-running on an already-sequenced set reproduces the same indices
    /// and titles: grouping and ordering depend only on the events
    /// themselves, and titles are recomposed rather than appended to.
    pub fn sequence(&self, mut events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, event) in events.iter().enumerate() {
            if event.kind == EventKind::Treatment {
                if let Some(treatment_id) = &event.treatment_id {
                    groups.entry(treatment_id.clone()).or_default().push(position);
                }
            }
        }

        for (treatment_id, mut members) in groups {
            // Members were collected in input order; the stable sort keeps
            // that order for equal start times.
            members.sort_by_key(|&position| events[position].start);
            debug!(
                "Sequencing {} visit(s) for treatment {}",
                members.len(),
                treatment_id
            );

            for (offset, &position) in members.iter().enumerate() {
                let event = &mut events[position];
                event.visit_index = Some(offset as u32 + 1);
                event.title = CalendarEvent::compose_title(
                    &event.kind,
                    event.category.as_deref(),
                    &event.service_name,
                    event.visit_index,
                );
            }
        }

        events
    }
}

impl Default for TreatmentSequencerService {
    fn default() -> Self {
        Self::new()
    }
}
