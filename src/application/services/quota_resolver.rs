use std::sync::Arc;

use crate::application::ports::{RepositoryError, UsageRepository};
use crate::domain::{BillingSubject, Plan, UsagePeriod, UsageScope, UserId};

use super::ServiceError;

/// Effective plan and current-period usage for one billing subject.
#[derive(Debug, Clone)]
pub struct QuotaStatus {
    pub subject: BillingSubject,
    pub plan: &'static Plan,
    pub period: UsagePeriod,
    /// Count in the quota scope; the pool's count for pooled subjects.
    pub usage_current: u64,
    /// The individual's own count, for reporting only.
    pub personal_usage: u64,
    pub quota_exceeded: bool,
}

impl QuotaStatus {
    pub fn ensure_available(&self) -> Result<(), ServiceError> {
        if self.quota_exceeded {
            return Err(ServiceError::QuotaExceeded {
                used: self.usage_current,
                limit: self.plan.max_responses,
            });
        }
        Ok(())
    }
}

/// Read-only quota check plus the post-completion counter increment.
///
/// Check and increment are separate steps; concurrent requests near the limit can
/// both pass and overshoot it slightly.
pub struct QuotaResolver {
    usage: Arc<dyn UsageRepository>,
}

impl QuotaResolver {
    pub fn new(usage: Arc<dyn UsageRepository>) -> Self {
        Self { usage }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, owner: UserId) -> Result<QuotaStatus, RepositoryError> {
        let subject = self.usage.resolve_subject(owner).await?;
        let period = UsagePeriod::current();
        let snapshot = self.usage.read_usage(&subject, &period).await?;
        let plan = subject.tier().plan();

        let status = QuotaStatus {
            subject,
            plan,
            period,
            usage_current: snapshot.scope_count,
            personal_usage: snapshot.personal_count,
            quota_exceeded: snapshot.scope_count >= plan.max_responses,
        };

        tracing::debug!(
            tier = %plan.tier,
            usage = status.usage_current,
            personal_usage = status.personal_usage,
            limit = plan.max_responses,
            "Quota resolved"
        );

        Ok(status)
    }

    /// Counts one completed response. Pooled subjects bump the pool and the member's
    /// personal counter together.
    #[tracing::instrument(skip(self, status), fields(period = %status.period))]
    pub async fn record_completion(&self, status: &QuotaStatus) -> Result<(), RepositoryError> {
        match status.subject {
            BillingSubject::Pooled {
                user_id, org_id, ..
            } => {
                tokio::try_join!(
                    self.usage
                        .increment(UsageScope::Organization(org_id), &status.period),
                    self.usage
                        .increment(UsageScope::Personal(user_id), &status.period),
                )?;
            }
            BillingSubject::Individual { user_id, .. } => {
                self.usage
                    .increment(UsageScope::Personal(user_id), &status.period)
                    .await?;
            }
        }
        Ok(())
    }
}
