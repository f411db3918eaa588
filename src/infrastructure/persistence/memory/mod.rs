//! Process-local implementations of the persistence ports. They back the
//! database-less local mode and the test suite.

mod in_memory_batch_repository;
mod in_memory_project_repository;
mod in_memory_response_repository;
mod in_memory_usage_repository;

pub use in_memory_batch_repository::InMemoryBatchRepository;
pub use in_memory_project_repository::InMemoryProjectRepository;
pub use in_memory_response_repository::InMemoryResponseRepository;
pub use in_memory_usage_repository::InMemoryUsageRepository;
