// libs/calendar-cell/src/services/index.rs
use std::collections::{HashMap, HashSet};

use crate::models::{CalendarEvent, CalendarIndex, PersonRef, PATIENT_COLOR_PALETTE};

/// Builds the auxiliary lookups over the unfiltered canonical set: distinct
/// patients and providers in first-occurrence order, palette-cycled patient
/// colors, and per-category counts.
pub struct DerivedIndexService;

impl DerivedIndexService {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, events: &[CalendarEvent]) -> CalendarIndex {
        let mut patients = Vec::new();
        let mut seen_patients = HashSet::new();
        let mut providers = Vec::new();
        let mut seen_providers = HashSet::new();
        let mut category_counts: HashMap<String, usize> = HashMap::new();

        for event in events {
            if let Some(patient_id) = &event.patient_id {
                if seen_patients.insert(patient_id.clone()) {
                    patients.push(PersonRef {
                        id: patient_id.clone(),
                        display_name: event.patient_name.clone(),
                    });
                }
            }
            if let Some(provider_id) = &event.provider_id {
                if seen_providers.insert(provider_id.clone()) {
                    providers.push(PersonRef {
                        id: provider_id.clone(),
                        display_name: event.provider_name.clone().unwrap_or_default(),
                    });
                }
            }
            if let Some(category) = &event.category {
                *category_counts.entry(category.clone()).or_insert(0) += 1;
            }
        }

        let patient_colors = patients
            .iter()
            .enumerate()
            .map(|(position, patient)| {
                let color = PATIENT_COLOR_PALETTE[position % PATIENT_COLOR_PALETTE.len()];
                (patient.id.clone(), color.to_string())
            })
            .collect();

        CalendarIndex {
            patients,
            patient_colors,
            providers,
            category_counts,
        }
    }
}

impl Default for DerivedIndexService {
    fn default() -> Self {
        Self::new()
    }
}
