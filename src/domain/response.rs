use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{AudioPath, BatchId, ProjectId, ResponseId, ResponseStatus};

pub type Metadata = Map<String, Value>;

const NOT_RETAINED: &str = "transcribed-immediate";
const TEXT_INPUT: &str = "text-input";
const LOST: &str = "failed-no-audio";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMethod {
    Voice,
    Text,
}

impl InputMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethod::Voice => "voice",
            InputMethod::Text => "text",
        }
    }
}

impl FromStr for InputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voice" => Ok(InputMethod::Voice),
            "text" => Ok(InputMethod::Text),
            _ => Err(format!("Invalid input method: {}", s)),
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the raw audio of a response lives, or why there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPointer {
    /// Transcribed on receipt; bytes were discarded.
    NotRetained,
    /// Typed answer, never had audio.
    TextInput,
    /// Transcription and fallback storage both failed.
    Lost,
    Stored(AudioPath),
}

impl AudioPointer {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            NOT_RETAINED => AudioPointer::NotRetained,
            TEXT_INPUT => AudioPointer::TextInput,
            LOST => AudioPointer::Lost,
            path => AudioPointer::Stored(AudioPath::from_raw(path)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AudioPointer::NotRetained => NOT_RETAINED,
            AudioPointer::TextInput => TEXT_INPUT,
            AudioPointer::Lost => LOST,
            AudioPointer::Stored(path) => path.as_str(),
        }
    }

    pub fn stored_path(&self) -> Option<&AudioPath> {
        match self {
            AudioPointer::Stored(path) => Some(path),
            _ => None,
        }
    }
}

/// Identity of a single answer: one question within one respondent session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseKey {
    pub project_id: ProjectId,
    pub session_id: String,
    pub question_id: Option<String>,
}

impl ResponseKey {
    pub fn new(project_id: ProjectId, session_id: String, question_id: Option<String>) -> Self {
        Self {
            project_id,
            session_id,
            question_id,
        }
    }
}

/// One respondent answer, voice- or text-sourced.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: ResponseId,
    pub project_id: ProjectId,
    pub session_id: String,
    pub question_id: Option<String>,
    pub input_method: InputMethod,
    pub audio: AudioPointer,
    pub audio_size_bytes: u64,
    pub duration_seconds: Option<u32>,
    pub transcript: Option<String>,
    pub previous_transcript: Option<String>,
    pub language: Option<String>,
    pub metadata: Metadata,
    pub status: ResponseStatus,
    pub error_message: Option<String>,
    pub batch_id: Option<BatchId>,
    pub created_at: DateTime<Utc>,
    pub transcribed_at: Option<DateTime<Utc>>,
}

/// Transcript fields produced by a successful speech-to-text call.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribedAudio {
    pub text: String,
    pub language: Option<String>,
    pub duration_seconds: Option<u32>,
}

impl Response {
    fn base(key: ResponseKey, input_method: InputMethod, audio: AudioPointer) -> Self {
        Self {
            id: ResponseId::new(),
            project_id: key.project_id,
            session_id: key.session_id,
            question_id: key.question_id,
            input_method,
            audio,
            audio_size_bytes: 0,
            duration_seconds: None,
            transcript: None,
            previous_transcript: None,
            language: None,
            metadata: Metadata::new(),
            status: ResponseStatus::Pending,
            error_message: None,
            batch_id: None,
            created_at: Utc::now(),
            transcribed_at: None,
        }
    }

    /// Voice answer transcribed on receipt; audio bytes are not kept.
    pub fn transcribed_voice(
        key: ResponseKey,
        audio_size_bytes: u64,
        result: TranscribedAudio,
        metadata: Metadata,
    ) -> Self {
        let mut response = Self::base(key, InputMethod::Voice, AudioPointer::NotRetained);
        response.audio_size_bytes = audio_size_bytes;
        response.duration_seconds = result.duration_seconds;
        response.transcript = Some(result.text);
        response.language = result.language;
        response.metadata = metadata;
        response.status = ResponseStatus::Completed;
        response.transcribed_at = Some(response.created_at);
        response
    }

    /// Voice answer whose transcription failed; audio may be retained for a later re-run.
    pub fn failed_voice(
        key: ResponseKey,
        audio: AudioPointer,
        audio_size_bytes: u64,
        duration_seconds: Option<u32>,
        metadata: Metadata,
        error_message: String,
    ) -> Self {
        let mut response = Self::base(key, InputMethod::Voice, audio);
        response.audio_size_bytes = audio_size_bytes;
        response.duration_seconds = duration_seconds;
        response.metadata = metadata;
        response.status = ResponseStatus::Failed;
        response.error_message = Some(error_message);
        response
    }

    /// Voice answer stored for transcription later.
    pub fn staged_voice(
        key: ResponseKey,
        path: AudioPath,
        audio_size_bytes: u64,
        duration_seconds: Option<u32>,
        metadata: Metadata,
    ) -> Self {
        let mut response = Self::base(key, InputMethod::Voice, AudioPointer::Stored(path));
        response.audio_size_bytes = audio_size_bytes;
        response.duration_seconds = duration_seconds;
        response.metadata = metadata;
        response
    }

    pub fn typed(key: ResponseKey, text: String, language: Option<String>, metadata: Metadata) -> Self {
        let mut response = Self::base(key, InputMethod::Text, AudioPointer::TextInput);
        response.duration_seconds = Some(0);
        response.transcript = Some(text);
        response.language = language;
        response.metadata = metadata;
        response.status = ResponseStatus::Completed;
        response.transcribed_at = Some(response.created_at);
        response
    }

    pub fn key(&self) -> ResponseKey {
        ResponseKey::new(
            self.project_id,
            self.session_id.clone(),
            self.question_id.clone(),
        )
    }
}
