//! Request and response pieces shared by the Whisper-compatible HTTP providers.

use reqwest::{StatusCode, multipart};
use serde::Deserialize;

use crate::application::ports::{EngineTranscript, TranscriptionError, TranscriptionRequest};

#[derive(Deserialize)]
pub(super) struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

impl From<VerboseTranscription> for EngineTranscript {
    fn from(v: VerboseTranscription) -> Self {
        EngineTranscript {
            text: v.text,
            language: v.language,
            duration_seconds: v.duration,
        }
    }
}

/// Multipart form carrying the audio plus the `verbose_json` and language fields.
pub(super) fn transcription_form(
    request: &TranscriptionRequest<'_>,
) -> Result<multipart::Form, TranscriptionError> {
    let file_part = multipart::Part::bytes(request.audio.to_vec())
        .file_name(format!("audio.{}", request.format.extension()))
        .mime_str(request.format.as_mime())
        .map_err(|e| TranscriptionError::UnsupportedFormat(format!("mime: {}", e)))?;

    Ok(multipart::Form::new()
        .text("response_format", "verbose_json")
        .text("language", request.language.to_string())
        .part("file", file_part))
}

pub(super) fn classify_status(status: StatusCode, body: String) -> TranscriptionError {
    let detail = format!("status {}: {}", status.as_u16(), body);
    match status.as_u16() {
        400 | 422 => TranscriptionError::BadRequest(detail),
        415 => TranscriptionError::UnsupportedFormat(detail),
        401 | 403 => TranscriptionError::Unauthorized(detail),
        429 => TranscriptionError::RateLimited(detail),
        s if s >= 500 => TranscriptionError::ProviderUnavailable(detail),
        _ => TranscriptionError::ApiRequestFailed(detail),
    }
}

pub(super) async fn read_transcript(
    response: reqwest::Response,
) -> Result<EngineTranscript, TranscriptionError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        return Err(classify_status(status, body));
    }

    let parsed: VerboseTranscription = response
        .json()
        .await
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

    Ok(parsed.into())
}

pub(super) fn request_failed(e: reqwest::Error) -> TranscriptionError {
    if e.is_connect() {
        TranscriptionError::ProviderUnavailable(format!("connect: {}", e))
    } else {
        TranscriptionError::ApiRequestFailed(format!("request: {}", e))
    }
}
