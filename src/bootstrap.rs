//! Wires adapters and services into the HTTP state and the background worker.

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioStore, BatchRepository, ProjectRepository, ResponseRepository, TranscriptionEngine,
    UsageRepository,
};
use crate::application::services::{
    BatchService, IngestionLimits, IngestionService, QuotaResolver, ResponseService,
    RetryPolicy, TenantResolver, TextResponseService, TranscriptionQueue, TranscriptionService,
    TranscriptionWorker,
};
use crate::infrastructure::persistence::memory::{
    InMemoryBatchRepository, InMemoryProjectRepository, InMemoryResponseRepository,
    InMemoryUsageRepository,
};
use crate::infrastructure::persistence::{
    PgBatchRepository, PgProjectRepository, PgResponseRepository, PgUsageRepository,
};
use crate::presentation::AppState;
use crate::presentation::config::Settings;

/// Persistence, storage and provider adapters the services run on.
pub struct Backends {
    pub responses: Arc<dyn ResponseRepository>,
    pub batches: Arc<dyn BatchRepository>,
    pub usage: Arc<dyn UsageRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub audio_store: Arc<dyn AudioStore>,
    pub engine: Arc<dyn TranscriptionEngine>,
}

impl Backends {
    pub fn postgres(
        pool: sqlx::PgPool,
        audio_store: Arc<dyn AudioStore>,
        engine: Arc<dyn TranscriptionEngine>,
    ) -> Self {
        Self {
            responses: Arc::new(PgResponseRepository::new(pool.clone())),
            batches: Arc::new(PgBatchRepository::new(pool.clone())),
            usage: Arc::new(PgUsageRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool)),
            audio_store,
            engine,
        }
    }

    pub fn in_memory(
        audio_store: Arc<dyn AudioStore>,
        engine: Arc<dyn TranscriptionEngine>,
    ) -> Self {
        Self {
            responses: Arc::new(InMemoryResponseRepository::new()),
            batches: Arc::new(InMemoryBatchRepository::new()),
            usage: Arc::new(InMemoryUsageRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            audio_store,
            engine,
        }
    }
}

pub struct Application {
    pub state: AppState,
    /// Must be spawned for queued jobs to run.
    pub worker: TranscriptionWorker,
}

pub fn assemble(settings: &Settings, backends: Backends) -> Application {
    let t = &settings.transcription;
    let policy = RetryPolicy::new(
        t.max_retries,
        Duration::from_millis(t.base_backoff_ms),
        Duration::from_millis(t.jitter_ms),
    );
    let transcription = Arc::new(TranscriptionService::new(
        backends.engine,
        policy,
        t.attempt_timeout(),
        t.default_language.clone(),
    ));

    let quota = Arc::new(QuotaResolver::new(backends.usage));
    let (queue, receiver) = TranscriptionQueue::bounded(settings.batch.queue_capacity);
    let pricing = settings.batch.pricing();

    let worker = TranscriptionWorker::new(
        receiver,
        Arc::clone(&backends.responses),
        Arc::clone(&backends.batches),
        Arc::clone(&backends.projects),
        Arc::clone(&backends.audio_store),
        Arc::clone(&transcription),
        pricing,
    );

    let limits = IngestionLimits {
        max_audio_bytes: settings.ingestion.max_audio_bytes(),
        allowed_formats: settings.ingestion.allowed_formats(),
    };

    let state = AppState {
        tenants: Arc::new(TenantResolver::new(
            backends.projects,
            Arc::clone(&quota),
            Duration::from_secs(settings.tenants.cache_ttl_secs),
        )),
        ingestion_service: Arc::new(IngestionService::new(
            Arc::clone(&backends.responses),
            backends.audio_store,
            transcription,
            Arc::clone(&quota),
            queue.clone(),
            limits,
        )),
        text_response_service: Arc::new(TextResponseService::new(
            Arc::clone(&backends.responses),
            quota,
            settings.ingestion.max_text_chars,
        )),
        batch_service: Arc::new(BatchService::new(
            Arc::clone(&backends.responses),
            backends.batches,
            queue.clone(),
            pricing,
            settings.batch.seconds_per_item,
        )),
        response_service: Arc::new(ResponseService::new(backends.responses, queue)),
    };

    Application { state, worker }
}
