use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{RepositoryError, UsageRepository};
use crate::domain::{
    BillingSubject, OrganizationId, PlanTier, UsagePeriod, UsageScope, UsageSnapshot, UserId,
};

/// Accounts and usage counters. Unknown users resolve to an individual free plan.
#[derive(Default)]
pub struct InMemoryUsageRepository {
    subjects: RwLock<HashMap<UserId, BillingSubject>>,
    counters: RwLock<HashMap<(UsageScope, UsagePeriod), u64>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_account(&self, user_id: UserId, tier: PlanTier) {
        self.subjects
            .write()
            .await
            .insert(user_id, BillingSubject::Individual { user_id, tier });
    }

    pub async fn add_member(&self, user_id: UserId, org_id: OrganizationId, tier: PlanTier) {
        self.subjects.write().await.insert(
            user_id,
            BillingSubject::Pooled {
                user_id,
                org_id,
                tier,
            },
        );
    }

    pub async fn set_count(&self, scope: UsageScope, period: &UsagePeriod, count: u64) {
        self.counters
            .write()
            .await
            .insert((scope, period.clone()), count);
    }

    pub async fn count(&self, scope: UsageScope, period: &UsagePeriod) -> u64 {
        self.counters
            .read()
            .await
            .get(&(scope, period.clone()))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn resolve_subject(&self, user_id: UserId) -> Result<BillingSubject, RepositoryError> {
        Ok(self
            .subjects
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or(BillingSubject::Individual {
                user_id,
                tier: PlanTier::Free,
            }))
    }

    async fn read_usage(
        &self,
        subject: &BillingSubject,
        period: &UsagePeriod,
    ) -> Result<UsageSnapshot, RepositoryError> {
        Ok(UsageSnapshot {
            scope_count: self.count(subject.quota_scope(), period).await,
            personal_count: self
                .count(UsageScope::Personal(subject.user_id()), period)
                .await,
        })
    }

    async fn increment(
        &self,
        scope: UsageScope,
        period: &UsagePeriod,
    ) -> Result<u64, RepositoryError> {
        let mut counters = self.counters.write().await;
        let count = counters.entry((scope, period.clone())).or_insert(0);
        *count += 1;
        Ok(*count)
    }
}
