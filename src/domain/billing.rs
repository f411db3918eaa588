use std::fmt;

use chrono::{DateTime, Datelike, Utc};

use super::{OrganizationId, PlanTier, UserId};

/// Whose quota a request is charged against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingSubject {
    Individual {
        user_id: UserId,
        tier: PlanTier,
    },
    /// Member of an organization sharing one pooled quota.
    Pooled {
        user_id: UserId,
        org_id: OrganizationId,
        tier: PlanTier,
    },
}

impl BillingSubject {
    pub fn user_id(&self) -> UserId {
        match self {
            BillingSubject::Individual { user_id, .. } | BillingSubject::Pooled { user_id, .. } => {
                *user_id
            }
        }
    }

    pub fn tier(&self) -> PlanTier {
        match self {
            BillingSubject::Individual { tier, .. } | BillingSubject::Pooled { tier, .. } => *tier,
        }
    }

    pub fn quota_scope(&self) -> UsageScope {
        match self {
            BillingSubject::Individual { user_id, .. } => UsageScope::Personal(*user_id),
            BillingSubject::Pooled { org_id, .. } => UsageScope::Organization(*org_id),
        }
    }
}

/// Counter a usage increment lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageScope {
    Personal(UserId),
    Organization(OrganizationId),
}

/// Calendar month a usage counter covers, formatted `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsagePeriod(String);

impl UsagePeriod {
    pub fn current() -> Self {
        Self::containing(Utc::now())
    }

    pub fn containing(at: DateTime<Utc>) -> Self {
        Self(format!("{:04}-{:02}", at.year(), at.month()))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UsagePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Usage counts read for one billing subject in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// Count in the quota scope (pool for pooled subjects).
    pub scope_count: u64,
    /// The individual's own count, reported but never used for gating.
    pub personal_count: u64,
}
