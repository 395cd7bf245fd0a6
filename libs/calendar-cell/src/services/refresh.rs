// libs/calendar-cell/src/services/refresh.rs
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::CalendarError;
use crate::models::{CalendarEvent, CalendarSnapshot, EventFilter};
use crate::services::filter::EventFilterService;
use crate::services::index::DerivedIndexService;
use crate::services::normalizer::EventNormalizerService;
use crate::services::sequencer::TreatmentSequencerService;
use crate::services::source::{AppointmentSource, TreatmentSource};
use crate::services::stats::StatsAggregatorService;

/// Owns the refresh lifecycle: fetch both sources jointly, run the
/// normalize -> sequence -> index -> aggregate pipeline from scratch, and
/// atomically replace the published snapshot. Single producer, any number
/// of readers; a reader's snapshot stays valid while a rebuild runs.
pub struct CalendarRefreshService {
    appointment_source: Arc<dyn AppointmentSource>,
    treatment_source: Arc<dyn TreatmentSource>,
    normalizer: EventNormalizerService,
    sequencer: TreatmentSequencerService,
    indexer: DerivedIndexService,
    aggregator: StatsAggregatorService,
    filterer: EventFilterService,
    snapshot: RwLock<Arc<CalendarSnapshot>>,
    generation: AtomicU64,
    is_shutdown: RwLock<bool>,
}

impl CalendarRefreshService {
    pub fn new(
        appointment_source: Arc<dyn AppointmentSource>,
        treatment_source: Arc<dyn TreatmentSource>,
    ) -> Self {
        Self {
            appointment_source,
            treatment_source,
            normalizer: EventNormalizerService::new(),
            sequencer: TreatmentSequencerService::new(),
            indexer: DerivedIndexService::new(),
            aggregator: StatsAggregatorService::new(),
            filterer: EventFilterService::new(),
            snapshot: RwLock::new(Arc::new(CalendarSnapshot::empty())),
            generation: AtomicU64::new(0),
            is_shutdown: RwLock::new(false),
        }
    }

    /// Run one full refresh cycle. Normalization never starts on partial
    /// data: both fetches are awaited first, and either failure aborts the
    /// cycle with the previous snapshot retained unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Arc<CalendarSnapshot>, CalendarError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting calendar refresh {}", ticket);

        let (appointments, treatments) = tokio::join!(
            self.appointment_source.fetch_appointments(),
            self.treatment_source.fetch_treatments(),
        );
        let appointments = appointments?;
        let treatments = treatments?;

        let treatment_map = self.normalizer.treatment_map(treatments);
        let batch = self.normalizer.normalize(&appointments, &treatment_map);
        let skipped_records = batch.skipped;
        let events = self.sequencer.sequence(batch.events);
        let index = self.indexer.build(&events);
        let stats = self.aggregator.aggregate(&events, Utc::now());

        let next = Arc::new(CalendarSnapshot {
            generation: ticket,
            refreshed_at: Utc::now(),
            events,
            index,
            stats,
            skipped_records,
        });

        let mut current = self.snapshot.write().await;
        if current.generation > ticket {
            debug!(
                "Discarding superseded calendar refresh {} (current is {})",
                ticket, current.generation
            );
            return Err(CalendarError::RefreshSuperseded);
        }
        *current = Arc::clone(&next);
        info!(
            "Published calendar snapshot {} with {} event(s), {} skipped record(s)",
            ticket,
            next.events.len(),
            next.skipped_records
        );
        Ok(next)
    }

    /// Current published snapshot. Cheap: clones an `Arc`, never the data.
    pub async fn snapshot(&self) -> Arc<CalendarSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Filtered view over the current snapshot. Pure per call; holds no
    /// state between invocations.
    pub async fn filter(&self, filter: &EventFilter) -> Vec<CalendarEvent> {
        let snapshot = self.snapshot().await;
        self.filterer.apply(&snapshot.events, filter, Utc::now())
    }

    /// Periodic refresh loop. Fetch failures are logged and retried on the
    /// next interval; the loop only exits on shutdown.
    #[instrument(skip(self))]
    pub async fn run(&self, interval: Duration) {
        info!("Starting calendar refresh loop, interval {:?}", interval);
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;

            if *self.is_shutdown.read().await {
                info!("Calendar refresh loop shutting down");
                break;
            }

            match self.refresh().await {
                Ok(snapshot) => {
                    debug!("Calendar refresh {} complete", snapshot.generation);
                }
                Err(error) if error.is_retriable() => {
                    warn!("Calendar refresh failed, retrying next interval: {}", error);
                }
                Err(error) => {
                    debug!("Calendar refresh discarded: {}", error);
                }
            }
        }
    }

    pub async fn shutdown(&self) {
        info!("Initiating calendar refresh shutdown");
        *self.is_shutdown.write().await = true;
    }
}
