use std::str::FromStr;

use super::{ProjectId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptionMode {
    /// Uploaded audio is queued for transcription straight away.
    Realtime,
    /// Uploaded audio waits for a confirmed batch.
    Batch,
}

impl TranscriptionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionMode::Realtime => "realtime",
            TranscriptionMode::Batch => "batch",
        }
    }
}

impl FromStr for TranscriptionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "realtime" => Ok(TranscriptionMode::Realtime),
            "batch" => Ok(TranscriptionMode::Batch),
            _ => Err(format!("Invalid transcription mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub language: Option<String>,
    pub transcription_mode: TranscriptionMode,
    pub allowed_domains: Vec<String>,
}
