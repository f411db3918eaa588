mod helpers;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use voxpulse::application::ports::{
    EngineTranscript, TranscriptionEngine, TranscriptionError, TranscriptionRequest,
};
use voxpulse::application::services::{RetryPolicy, TranscriptionService};
use voxpulse::domain::AudioFormat;

use helpers::{ScriptedEngine, transcript};

const AUDIO: &[u8] = b"fake audio";

fn service(engine: Arc<dyn TranscriptionEngine>) -> TranscriptionService {
    TranscriptionService::new(
        engine,
        RetryPolicy::new(2, Duration::from_secs(2), Duration::ZERO),
        Duration::from_secs(30),
        "es".to_string(),
    )
}

struct HangingEngine {
    calls: AtomicU32,
}

#[async_trait]
impl TranscriptionEngine for HangingEngine {
    async fn transcribe(
        &self,
        _request: &TranscriptionRequest<'_>,
    ) -> Result<EngineTranscript, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(transcript("too late", None, None))
    }
}

#[tokio::test(start_paused = true)]
async fn given_language_name_from_provider_when_transcribing_then_short_code_is_returned() {
    let engine = Arc::new(ScriptedEngine::always("  hola mundo  "));
    let result = service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Webm, None)
        .await
        .unwrap();

    assert_eq!(result.text, "hola mundo");
    assert_eq!(result.language.as_deref(), Some("es"));
    assert_eq!(result.duration_seconds, Some(12));
    assert_eq!(engine.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_unsupported_hint_when_transcribing_then_default_language_is_sent() {
    let engine = Arc::new(ScriptedEngine::always("hello"));
    service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Mp3, Some("klingon"))
        .await
        .unwrap();

    assert_eq!(engine.languages(), vec!["es".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn given_provider_omits_language_when_transcribing_then_requested_code_is_kept() {
    let engine = Arc::new(ScriptedEngine::scripted(vec![Ok(transcript(
        "bonjour",
        None,
        None,
    ))]));
    let result = service(engine)
        .transcribe(AUDIO, AudioFormat::Wav, Some("fr"))
        .await
        .unwrap();

    assert_eq!(result.language.as_deref(), Some("fr"));
    assert_eq!(result.duration_seconds, None);
}

#[tokio::test(start_paused = true)]
async fn given_permanent_error_when_transcribing_then_fails_without_retry() {
    let engine = Arc::new(ScriptedEngine::scripted(vec![Err(
        TranscriptionError::Unauthorized("bad key".to_string()),
    )]));
    let result = service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Webm, None)
        .await;

    assert!(matches!(result, Err(TranscriptionError::Unauthorized(_))));
    assert_eq!(engine.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_transient_error_then_success_when_transcribing_then_second_attempt_wins() {
    let engine = Arc::new(ScriptedEngine::scripted(vec![
        Err(TranscriptionError::RateLimited("slow down".to_string())),
        Ok(transcript("segundo intento", Some("es"), Some(3.0))),
    ]));
    let result = service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Webm, None)
        .await
        .unwrap();

    assert_eq!(result.text, "segundo intento");
    assert_eq!(engine.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn given_transient_errors_every_time_when_transcribing_then_gives_up_after_retry_budget() {
    let engine = Arc::new(ScriptedEngine::scripted(vec![
        Err(TranscriptionError::ProviderUnavailable("503".to_string())),
        Err(TranscriptionError::ProviderUnavailable("503".to_string())),
        Err(TranscriptionError::ProviderUnavailable("503".to_string())),
        Ok(transcript("never reached", None, None)),
    ]));
    let result = service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Webm, None)
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionError::ProviderUnavailable(_))
    ));
    assert_eq!(engine.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn given_hanging_provider_when_transcribing_then_each_attempt_times_out_within_bound() {
    let engine = Arc::new(HangingEngine {
        calls: AtomicU32::new(0),
    });
    let started = Instant::now();

    let result = service(engine.clone())
        .transcribe(AUDIO, AudioFormat::Webm, None)
        .await;

    assert!(matches!(result, Err(TranscriptionError::Timeout(d)) if d == Duration::from_secs(30)));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 3);

    // Three 30s attempts plus 2s and 4s of backoff.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(96), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(100), "elapsed {:?}", elapsed);
}
