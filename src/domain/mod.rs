mod audio_format;
mod audio_path;
mod batch;
mod batch_status;
mod billing;
mod identifiers;
pub mod language;
mod origin_policy;
mod plan;
mod platform;
mod pricing;
mod project;
mod response;
mod response_status;

pub use audio_format::AudioFormat;
pub use audio_path::AudioPath;
pub use batch::Batch;
pub use batch_status::BatchStatus;
pub use billing::{BillingSubject, UsagePeriod, UsageScope, UsageSnapshot};
pub use identifiers::{BatchId, OrganizationId, ProjectId, ResponseId, UserId};
pub use origin_policy::is_origin_allowed;
pub use plan::{ExportFormat, Plan, PlanTier};
pub use platform::{detect_platform, enrich_metadata};
pub use pricing::TranscriptionPricing;
pub use project::{Project, TranscriptionMode};
pub use response::{
    AudioPointer, InputMethod, Metadata, Response, ResponseKey, TranscribedAudio,
};
pub use response_status::ResponseStatus;
