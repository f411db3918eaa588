mod batch_service;
mod ingestion_service;
mod quota_resolver;
mod request_guard;
mod response_service;
mod retry_policy;
mod service_error;
mod tenant_resolver;
mod text_response_service;
mod transcription_queue;
mod transcription_service;
mod transcription_worker;
mod ttl_cache;

pub use batch_service::{
    BatchProgress, BatchQuote, BatchService, ConfirmedBatch, FailedItem, MAX_SESSIONS_PER_BATCH,
};
pub use ingestion_service::{AudioSubmission, IngestOutcome, IngestionLimits, IngestionService};
pub use quota_resolver::{QuotaResolver, QuotaStatus};
pub use request_guard::{
    authorize_origin, check_duration, validate_language, validate_question_id,
    validate_session_id,
};
pub use response_service::ResponseService;
pub use retry_policy::RetryPolicy;
pub use service_error::ServiceError;
pub use tenant_resolver::{TenantContext, TenantResolver};
pub use text_response_service::{TextAction, TextOutcome, TextResponseService, TextSubmission};
pub use transcription_queue::{
    JobHandle, JobReport, QueueError, QueueSlot, TranscriptionQueue, WorkerJob, WorkerMessage,
};
pub use transcription_service::TranscriptionService;
pub use transcription_worker::{TranscriptionWorker, WorkerError};
pub use ttl_cache::TtlCache;
