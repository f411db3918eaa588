mod helpers;

use voxpulse::application::services::ServiceError;
use voxpulse::domain::{
    BillingSubject, OrganizationId, PlanTier, ProjectId, TranscriptionMode, UsagePeriod,
    UsageScope, UserId,
};

use helpers::{Harness, PROJECT_KEY, ScriptedEngine};

#[tokio::test]
async fn given_valid_key_when_resolving_widget_then_project_plan_and_origin_are_returned() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Freelancer, TranscriptionMode::Realtime)
        .await;

    let tenant = harness
        .state
        .tenants
        .resolve_widget(PROJECT_KEY, Some("https://survey.alchemer.com".to_string()))
        .await
        .unwrap();

    assert_eq!(tenant.project.id, project.id);
    assert_eq!(tenant.quota.plan.tier, PlanTier::Freelancer);
    assert_eq!(tenant.quota.usage_current, 0);
    assert!(!tenant.quota.quota_exceeded);
    assert_eq!(tenant.origin.as_deref(), Some("https://survey.alchemer.com"));
}

#[tokio::test]
async fn given_unknown_key_when_resolving_widget_then_invalid_project_key() {
    let harness = Harness::new(ScriptedEngine::always("unused"));

    let result = harness
        .state
        .tenants
        .resolve_widget("pk_unknown", None)
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidProjectKey)));
}

#[tokio::test]
async fn given_domain_lock_when_origin_not_listed_then_domain_unauthorized() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    harness
        .add_project_with_domains(
            PlanTier::Pro,
            TranscriptionMode::Realtime,
            vec!["*.qualtrics.com".to_string()],
        )
        .await;
    let tenants = &harness.state.tenants;

    assert!(
        tenants
            .resolve_widget(PROJECT_KEY, Some("https://acme.qualtrics.com".to_string()))
            .await
            .is_ok()
    );
    assert!(matches!(
        tenants
            .resolve_widget(PROJECT_KEY, Some("https://evil.test".to_string()))
            .await,
        Err(ServiceError::DomainUnauthorized(Some(_)))
    ));
    assert!(matches!(
        tenants.resolve_widget(PROJECT_KEY, None).await,
        Err(ServiceError::DomainUnauthorized(None))
    ));
}

#[tokio::test]
async fn given_unknown_project_id_when_resolving_dashboard_then_not_found() {
    let harness = Harness::new(ScriptedEngine::always("unused"));

    let result = harness.state.tenants.resolve_project(ProjectId::new()).await;

    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn given_owner_without_account_when_resolving_then_free_plan_applies() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Realtime)
        .await;
    let mut orphan = project.clone();
    orphan.id = ProjectId::new();
    orphan.owner_id = UserId::new();
    harness.projects.insert("pk_orphan", orphan.clone()).await;

    let tenant = harness.tenant(&orphan).await;

    assert_eq!(tenant.quota.plan.tier, PlanTier::Free);
}

#[tokio::test]
async fn given_organization_member_when_pool_is_exhausted_then_quota_is_exceeded_for_member() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Free, TranscriptionMode::Realtime)
        .await;
    let org_id = OrganizationId::new();
    harness
        .usage
        .add_member(project.owner_id, org_id, PlanTier::Freelancer)
        .await;
    let period = UsagePeriod::current();
    harness
        .usage
        .set_count(UsageScope::Organization(org_id), &period, 1_000)
        .await;
    harness
        .usage
        .set_count(UsageScope::Personal(project.owner_id), &period, 3)
        .await;

    let tenant = harness.tenant(&project).await;

    assert_eq!(tenant.quota.plan.tier, PlanTier::Freelancer);
    assert!(matches!(
        tenant.quota.subject,
        BillingSubject::Pooled { org_id: id, .. } if id == org_id
    ));
    assert_eq!(tenant.quota.usage_current, 1_000);
    assert_eq!(tenant.quota.personal_usage, 3);
    assert!(tenant.quota.quota_exceeded);
}

#[tokio::test]
async fn given_organization_member_when_response_completes_then_pool_and_member_counters_grow() {
    let harness = Harness::new(ScriptedEngine::always("hola"));
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Realtime)
        .await;
    let org_id = OrganizationId::new();
    harness
        .usage
        .add_member(project.owner_id, org_id, PlanTier::Pro)
        .await;
    let tenant = harness.tenant(&project).await;

    harness
        .state
        .ingestion_service
        .ingest(&tenant, helpers::audio_submission("sess-1"))
        .await
        .unwrap();

    let period = UsagePeriod::current();
    assert_eq!(
        harness
            .usage
            .count(UsageScope::Organization(org_id), &period)
            .await,
        1
    );
    assert_eq!(
        harness
            .usage
            .count(UsageScope::Personal(project.owner_id), &period)
            .await,
        1
    );
}
