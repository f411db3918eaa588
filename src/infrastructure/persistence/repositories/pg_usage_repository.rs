use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, UsageRepository};
use crate::domain::{
    BillingSubject, OrganizationId, PlanTier, UsagePeriod, UsageScope, UsageSnapshot, UserId,
};

use super::super::pg_error::query_failed;

pub struct PgUsageRepository {
    pool: PgPool,
}

impl PgUsageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, scope: UsageScope, period: &UsagePeriod) -> Result<u64, RepositoryError> {
        let (sql, id) = match scope {
            UsageScope::Personal(user_id) => (
                "SELECT responses_count FROM usage WHERE user_id = $1 AND month = $2",
                user_id.as_uuid(),
            ),
            UsageScope::Organization(org_id) => (
                "SELECT responses_count FROM org_usage WHERE org_id = $1 AND month = $2",
                org_id.as_uuid(),
            ),
        };

        let count: Option<i64> = sqlx::query_scalar(sql)
            .bind(id)
            .bind(period.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(query_failed)?;

        Ok(count.unwrap_or(0).max(0) as u64)
    }
}

#[async_trait]
impl UsageRepository for PgUsageRepository {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn resolve_subject(&self, user_id: UserId) -> Result<BillingSubject, RepositoryError> {
        let row: Option<(String, Option<Uuid>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT a.plan, a.org_id, o.plan
            FROM accounts a
            LEFT JOIN organizations o ON o.id = a.org_id
            WHERE a.user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        let subject = match row {
            Some((_, Some(org_id), Some(org_plan))) => BillingSubject::Pooled {
                user_id,
                org_id: OrganizationId::from_uuid(org_id),
                tier: PlanTier::from_key(&org_plan),
            },
            Some((plan, _, _)) => BillingSubject::Individual {
                user_id,
                tier: PlanTier::from_key(&plan),
            },
            None => BillingSubject::Individual {
                user_id,
                tier: PlanTier::Free,
            },
        };

        Ok(subject)
    }

    #[instrument(skip(self, subject), fields(user_id = %subject.user_id(), period = %period))]
    async fn read_usage(
        &self,
        subject: &BillingSubject,
        period: &UsagePeriod,
    ) -> Result<UsageSnapshot, RepositoryError> {
        let personal_count = self
            .count(UsageScope::Personal(subject.user_id()), period)
            .await?;
        let scope_count = match subject.quota_scope() {
            UsageScope::Personal(_) => personal_count,
            scope => self.count(scope, period).await?,
        };

        Ok(UsageSnapshot {
            scope_count,
            personal_count,
        })
    }

    #[instrument(skip(self), fields(period = %period))]
    async fn increment(
        &self,
        scope: UsageScope,
        period: &UsagePeriod,
    ) -> Result<u64, RepositoryError> {
        let (sql, id) = match scope {
            UsageScope::Personal(user_id) => (
                r#"
                INSERT INTO usage (user_id, month, responses_count)
                VALUES ($1, $2, 1)
                ON CONFLICT (user_id, month)
                DO UPDATE SET responses_count = usage.responses_count + 1
                RETURNING responses_count
                "#,
                user_id.as_uuid(),
            ),
            UsageScope::Organization(org_id) => (
                r#"
                INSERT INTO org_usage (org_id, month, responses_count)
                VALUES ($1, $2, 1)
                ON CONFLICT (org_id, month)
                DO UPDATE SET responses_count = org_usage.responses_count + 1
                RETURNING responses_count
                "#,
                org_id.as_uuid(),
            ),
        };

        let count: i64 = sqlx::query_scalar(sql)
            .bind(id)
            .bind(period.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)?;

        Ok(count.max(0) as u64)
    }
}
