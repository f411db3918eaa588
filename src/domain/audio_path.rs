use std::fmt;

use super::{AudioFormat, ProjectId};

/// Location of retained raw audio inside the audio store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPath(String);

impl AudioPath {
    pub fn for_session(
        project_id: &ProjectId,
        session_id: &str,
        timestamp_millis: i64,
        format: AudioFormat,
    ) -> Self {
        Self(format!(
            "{}/{}_{}.{}",
            project_id.as_uuid(),
            session_id,
            timestamp_millis,
            format.extension()
        ))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format implied by the file extension, if recognised.
    pub fn format(&self) -> Option<AudioFormat> {
        self.0
            .rsplit_once('.')
            .and_then(|(_, ext)| AudioFormat::from_extension(ext))
    }
}

impl fmt::Display for AudioPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
