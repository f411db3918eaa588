mod helpers;

use voxpulse::application::ports::ResponseRepository;
use voxpulse::application::services::{JobReport, ServiceError, TextSubmission};
use voxpulse::domain::{
    AudioFormat, AudioPath, Metadata, PlanTier, ProjectId, Response, ResponseId, ResponseKey,
    ResponseStatus, TranscriptionMode,
};

use helpers::{Harness, ScriptedEngine, audio_submission, transcript};

#[tokio::test]
async fn given_transcribed_response_when_retranscribing_then_previous_transcript_is_kept() {
    let mut harness = Harness::new(ScriptedEngine::scripted(vec![
        Ok(transcript("primera versión", Some("es"), Some(20.0))),
        Ok(transcript("segunda versión", Some("es"), Some(20.0))),
    ]));
    harness.spawn_worker();
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Batch)
        .await;
    let tenant = harness.tenant(&project).await;
    let staged = harness
        .state
        .ingestion_service
        .stage(&tenant, audio_submission("sess-1"))
        .await
        .unwrap();
    let service = &harness.state.response_service;

    let first = service
        .retranscribe(project.id, staged.response_id)
        .await
        .unwrap()
        .outcome()
        .await;
    assert_eq!(
        first,
        Some(JobReport::Response {
            response_id: staged.response_id,
            status: ResponseStatus::Completed,
        })
    );

    service
        .retranscribe(project.id, staged.response_id)
        .await
        .unwrap()
        .outcome()
        .await;

    let row = harness.responses.all().await.remove(0);
    assert_eq!(row.status, ResponseStatus::Completed);
    assert_eq!(row.transcript.as_deref(), Some("segunda versión"));
    assert_eq!(row.previous_transcript.as_deref(), Some("primera versión"));
    assert_eq!(harness.engine.calls(), 2);
}

#[tokio::test]
async fn given_provider_failure_when_retranscribing_then_row_is_failed_with_error() {
    let mut harness = Harness::new(ScriptedEngine::failing());
    harness.spawn_worker();
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Batch)
        .await;
    let tenant = harness.tenant(&project).await;
    let staged = harness
        .state
        .ingestion_service
        .stage(&tenant, audio_submission("sess-1"))
        .await
        .unwrap();

    let report = harness
        .state
        .response_service
        .retranscribe(project.id, staged.response_id)
        .await
        .unwrap()
        .outcome()
        .await;

    assert!(matches!(
        report,
        Some(JobReport::Response {
            status: ResponseStatus::Failed,
            ..
        })
    ));
    let row = harness.responses.all().await.remove(0);
    assert_eq!(row.status, ResponseStatus::Failed);
    assert!(row.error_message.is_some());
    assert!(row.audio.stored_path().is_some());
}

#[tokio::test]
async fn given_text_response_when_retranscribing_then_validation_error() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Realtime)
        .await;
    let tenant = harness.tenant(&project).await;
    let outcome = harness
        .state
        .text_response_service
        .upsert(
            &tenant,
            TextSubmission {
                session_id: "sess-1".to_string(),
                question_id: None,
                text: "escrita".to_string(),
                language: None,
                metadata: Metadata::new(),
            },
        )
        .await
        .unwrap();
    let response_id = outcome.response_id.unwrap();

    let result = harness
        .state
        .response_service
        .retranscribe(project.id, response_id)
        .await;

    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn given_response_in_flight_when_retranscribing_then_invalid_state() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Realtime)
        .await;
    let tenant = harness.tenant(&project).await;
    let staged = harness
        .state
        .ingestion_service
        .stage(&tenant, audio_submission("sess-1"))
        .await
        .unwrap();
    assert_eq!(staged.status, ResponseStatus::Processing);

    let result = harness
        .state
        .response_service
        .retranscribe(project.id, staged.response_id)
        .await;

    assert!(matches!(result, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn given_unknown_or_foreign_response_when_retranscribing_then_not_found() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project = harness
        .add_project(PlanTier::Pro, TranscriptionMode::Batch)
        .await;
    let tenant = harness.tenant(&project).await;
    let staged = harness
        .state
        .ingestion_service
        .stage(&tenant, audio_submission("sess-1"))
        .await
        .unwrap();
    let service = &harness.state.response_service;

    assert!(matches!(
        service.retranscribe(project.id, ResponseId::new()).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.retranscribe(ProjectId::new(), staged.response_id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn given_row_without_transcript_when_retranscription_begins_then_old_snapshot_is_cleared() {
    let harness = Harness::new(ScriptedEngine::always("unused"));
    let project_id = ProjectId::new();
    let mut response = Response::staged_voice(
        ResponseKey::new(project_id, "sess-1".to_string(), None),
        AudioPath::for_session(&project_id, "sess-1", 1_700_000_000_000, AudioFormat::Webm),
        512,
        Some(10),
        Metadata::new(),
    );
    response.status = ResponseStatus::Failed;
    response.previous_transcript = Some("versión antigua".to_string());
    harness.responses.insert(&response).await.unwrap();

    harness
        .responses
        .begin_retranscription(response.id)
        .await
        .unwrap();

    let row = harness.responses.get_by_id(response.id).await.unwrap().unwrap();
    assert_eq!(row.status, ResponseStatus::Processing);
    assert_eq!(row.previous_transcript, None);
    assert_eq!(row.error_message, None);
}
