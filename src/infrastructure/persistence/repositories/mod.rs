mod pg_batch_repository;
mod pg_project_repository;
mod pg_response_repository;
mod pg_usage_repository;

pub use pg_batch_repository::PgBatchRepository;
pub use pg_project_repository::PgProjectRepository;
pub use pg_response_repository::PgResponseRepository;
pub use pg_usage_repository::PgUsageRepository;
