use async_trait::async_trait;

use crate::domain::{BillingSubject, UsagePeriod, UsageScope, UsageSnapshot, UserId};

use super::RepositoryError;

/// Billing collaborator: plan membership and monthly usage counters.
#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn resolve_subject(&self, user_id: UserId) -> Result<BillingSubject, RepositoryError>;

    async fn read_usage(
        &self,
        subject: &BillingSubject,
        period: &UsagePeriod,
    ) -> Result<UsageSnapshot, RepositoryError>;

    /// Adds one to the counter, creating it on first use. Returns the new count.
    async fn increment(
        &self,
        scope: UsageScope,
        period: &UsagePeriod,
    ) -> Result<u64, RepositoryError>;
}
