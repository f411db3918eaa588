pub mod memory;
mod pg_error;
mod pg_pool;
mod repositories;

pub use repositories::PgBatchRepository;
pub use repositories::PgProjectRepository;
pub use repositories::PgResponseRepository;
pub use repositories::PgUsageRepository;

pub use pg_pool::{create_pool, run_migrations};
