use axum::extract::Multipart;
use bytes::Bytes;

use crate::application::services::AudioSubmission;
use crate::domain::Metadata;

use super::error::ApiError;

/// Reads the widget's multipart form: an `audio` file plus text fields.
pub async fn read_audio_submission(mut multipart: Multipart) -> Result<AudioSubmission, ApiError> {
    let mut audio: Option<(Bytes, String)> = None;
    let mut session_id = None;
    let mut question_id = None;
    let mut duration_seconds = None;
    let mut language = None;
    let mut metadata = Metadata::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "audio" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read audio: {}", e)))?;
            audio = Some((data, content_type));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read field {}: {}", name, e)))?;
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }

        match name.as_str() {
            "session_id" => session_id = Some(value),
            "question_id" => question_id = Some(value),
            "language" => language = Some(value),
            "duration_seconds" => {
                let seconds = value.parse::<f64>().map_err(|_| {
                    ApiError::bad_request("duration_seconds must be a number")
                })?;
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(ApiError::bad_request("duration_seconds must be positive"));
                }
                duration_seconds = Some(seconds.ceil() as u32);
            }
            "metadata" => {
                metadata = serde_json::from_str(&value)
                    .map_err(|_| ApiError::bad_request("metadata must be a JSON object"))?;
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let (audio, content_type) =
        audio.ok_or_else(|| ApiError::bad_request("No audio file provided"))?;
    let session_id = session_id.ok_or_else(|| ApiError::bad_request("session_id is required"))?;

    Ok(AudioSubmission {
        audio,
        content_type,
        session_id,
        question_id,
        duration_seconds,
        language,
        metadata,
    })
}
