#![allow(dead_code)]

pub mod test_postgres;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use voxpulse::application::ports::{
    AudioStore, AudioStoreError, EngineTranscript, RepositoryError, ResponseRepository,
    TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};
use voxpulse::application::services::{AudioSubmission, TenantContext, TranscriptionWorker};
use voxpulse::bootstrap::{Backends, assemble};
use voxpulse::domain::{
    AudioPath, BatchId, Metadata, PlanTier, Project, ProjectId, Response, ResponseId,
    ResponseKey, TranscribedAudio, TranscriptionMode, UserId,
};
use voxpulse::infrastructure::persistence::memory::{
    InMemoryBatchRepository, InMemoryProjectRepository, InMemoryResponseRepository,
    InMemoryUsageRepository,
};
use voxpulse::infrastructure::storage::ObjectAudioStore;
use voxpulse::presentation::{AppState, Settings};

pub const PROJECT_KEY: &str = "pk_test_123";

pub fn transcript(text: &str, language: Option<&str>, duration: Option<f64>) -> EngineTranscript {
    EngineTranscript {
        text: text.to_string(),
        language: language.map(str::to_string),
        duration_seconds: duration,
    }
}

/// Engine that replays scripted results in order, then keeps returning the fallback.
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<EngineTranscript, TranscriptionError>>>,
    fallback: Option<EngineTranscript>,
    calls: AtomicU32,
    languages: Mutex<Vec<String>>,
}

impl ScriptedEngine {
    pub fn always(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(transcript(text, Some("spanish"), Some(12.4))),
            calls: AtomicU32::new(0),
            languages: Mutex::new(Vec::new()),
        }
    }

    pub fn scripted(results: Vec<Result<EngineTranscript, TranscriptionError>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            fallback: None,
            calls: AtomicU32::new(0),
            languages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::scripted(vec![])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn languages(&self) -> Vec<String> {
        self.languages.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionEngine for ScriptedEngine {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest<'_>,
    ) -> Result<EngineTranscript, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.languages
            .lock()
            .unwrap()
            .push(request.language.to_string());

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match &self.fallback {
            Some(t) => Ok(t.clone()),
            None => Err(TranscriptionError::BadRequest("scripted failure".to_string())),
        }
    }
}

/// Audio store whose every operation fails.
pub struct BrokenAudioStore;

#[async_trait]
impl AudioStore for BrokenAudioStore {
    async fn store(&self, _path: &AudioPath, _data: Bytes) -> Result<u64, AudioStoreError> {
        Err(AudioStoreError::UploadFailed("storage offline".to_string()))
    }

    async fn fetch(&self, path: &AudioPath) -> Result<Bytes, AudioStoreError> {
        Err(AudioStoreError::NotFound(path.to_string()))
    }
}

/// Response rows whose next batch assignment fails once, then behaves.
pub struct FlakyAssignment {
    inner: Arc<InMemoryResponseRepository>,
    fail_next: AtomicBool,
}

impl FlakyAssignment {
    pub fn new(inner: Arc<InMemoryResponseRepository>) -> Self {
        Self {
            inner,
            fail_next: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl ResponseRepository for FlakyAssignment {
    async fn insert(&self, response: &Response) -> Result<(), RepositoryError> {
        self.inner.insert(response).await
    }

    async fn get_by_id(&self, id: ResponseId) -> Result<Option<Response>, RepositoryError> {
        self.inner.get_by_id(id).await
    }

    async fn find_text_response(
        &self,
        key: &ResponseKey,
    ) -> Result<Option<Response>, RepositoryError> {
        self.inner.find_text_response(key).await
    }

    async fn update_text(
        &self,
        id: ResponseId,
        text: &str,
        language: Option<&str>,
        metadata: &Metadata,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.inner
            .update_text(id, text, language, metadata, transcribed_at)
            .await
    }

    async fn delete(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.inner.delete(id).await
    }

    async fn list_by_sessions(
        &self,
        project_id: ProjectId,
        session_ids: &[String],
    ) -> Result<Vec<Response>, RepositoryError> {
        self.inner.list_by_sessions(project_id, session_ids).await
    }

    async fn assign_to_batch(
        &self,
        ids: &[ResponseId],
        batch_id: BatchId,
    ) -> Result<(), RepositoryError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::ConnectionFailed("connection reset".to_string()));
        }
        self.inner.assign_to_batch(ids, batch_id).await
    }

    async fn list_by_batch(&self, batch_id: BatchId) -> Result<Vec<Response>, RepositoryError> {
        self.inner.list_by_batch(batch_id).await
    }

    async fn begin_retranscription(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.inner.begin_retranscription(id).await
    }

    async fn mark_processing(&self, id: ResponseId) -> Result<(), RepositoryError> {
        self.inner.mark_processing(id).await
    }

    async fn mark_completed(
        &self,
        id: ResponseId,
        result: &TranscribedAudio,
        transcribed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.inner.mark_completed(id, result, transcribed_at).await
    }

    async fn mark_failed(&self, id: ResponseId, error_message: &str) -> Result<(), RepositoryError> {
        self.inner.mark_failed(id, error_message).await
    }
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.transcription.base_backoff_ms = 10;
    settings.transcription.jitter_ms = 0;
    settings.transcription.timeout_secs = 5;
    settings.batch.queue_capacity = 8;
    settings
}

/// Fully wired services over in-memory adapters.
pub struct Harness {
    pub responses: Arc<InMemoryResponseRepository>,
    pub batches: Arc<InMemoryBatchRepository>,
    pub usage: Arc<InMemoryUsageRepository>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub audio_store: Arc<dyn AudioStore>,
    pub engine: Arc<ScriptedEngine>,
    pub state: AppState,
    worker: Option<TranscriptionWorker>,
}

impl Harness {
    pub fn new(engine: ScriptedEngine) -> Self {
        Self::with_settings(engine, Arc::new(ObjectAudioStore::in_memory()), test_settings())
    }

    pub fn with_audio_store(engine: ScriptedEngine, audio_store: Arc<dyn AudioStore>) -> Self {
        Self::with_settings(engine, audio_store, test_settings())
    }

    pub fn with_settings(
        engine: ScriptedEngine,
        audio_store: Arc<dyn AudioStore>,
        settings: Settings,
    ) -> Self {
        Self::build(engine, audio_store, settings, |rows| rows)
    }

    /// Lets a test put a decorator in front of the response rows the services see.
    pub fn with_response_repository(
        engine: ScriptedEngine,
        wrap: impl FnOnce(Arc<InMemoryResponseRepository>) -> Arc<dyn ResponseRepository>,
    ) -> Self {
        Self::build(
            engine,
            Arc::new(ObjectAudioStore::in_memory()),
            test_settings(),
            wrap,
        )
    }

    fn build(
        engine: ScriptedEngine,
        audio_store: Arc<dyn AudioStore>,
        settings: Settings,
        wrap: impl FnOnce(Arc<InMemoryResponseRepository>) -> Arc<dyn ResponseRepository>,
    ) -> Self {
        let responses = Arc::new(InMemoryResponseRepository::new());
        let batches = Arc::new(InMemoryBatchRepository::new());
        let usage = Arc::new(InMemoryUsageRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let engine = Arc::new(engine);

        let app = assemble(
            &settings,
            Backends {
                responses: wrap(responses.clone()),
                batches: batches.clone(),
                usage: usage.clone(),
                projects: projects.clone(),
                audio_store: audio_store.clone(),
                engine: engine.clone(),
            },
        );

        Self {
            responses,
            batches,
            usage,
            projects,
            audio_store,
            engine,
            state: app.state,
            worker: Some(app.worker),
        }
    }

    /// Starts the background worker; without it queued jobs stay queued.
    pub fn spawn_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            tokio::spawn(worker.run());
        }
    }

    pub async fn add_project(&self, tier: PlanTier, mode: TranscriptionMode) -> Project {
        self.add_project_with_domains(tier, mode, vec![]).await
    }

    pub async fn add_project_with_domains(
        &self,
        tier: PlanTier,
        mode: TranscriptionMode,
        allowed_domains: Vec<String>,
    ) -> Project {
        let project = Project {
            id: ProjectId::new(),
            owner_id: UserId::new(),
            language: Some("es".to_string()),
            transcription_mode: mode,
            allowed_domains,
        };
        self.usage.add_account(project.owner_id, tier).await;
        self.projects.insert(PROJECT_KEY, project.clone()).await;
        project
    }

    pub async fn tenant(&self, project: &Project) -> TenantContext {
        self.state
            .tenants
            .resolve_project(project.id)
            .await
            .expect("project should resolve")
    }
}

pub fn audio_submission(session_id: &str) -> AudioSubmission {
    AudioSubmission {
        audio: Bytes::from_static(b"fake webm bytes"),
        content_type: "audio/webm;codecs=opus".to_string(),
        session_id: session_id.to_string(),
        question_id: Some("q1".to_string()),
        duration_seconds: Some(20),
        language: None,
        metadata: Metadata::new(),
    }
}
