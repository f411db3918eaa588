/// Audio container formats accepted from the recording widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Webm,
    Mp3,
    Wav,
    Mp4,
    Ogg,
}

impl AudioFormat {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence.to_ascii_lowercase().as_str() {
            "audio/webm" => Some(Self::Webm),
            "audio/mp3" | "audio/mpeg" => Some(Self::Mp3),
            "audio/wav" | "audio/x-wav" | "audio/wave" => Some(Self::Wav),
            "audio/mp4" => Some(Self::Mp4),
            "audio/ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "webm" => Some(Self::Webm),
            "mp3" | "mpeg" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "mp4" => Some(Self::Mp4),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
            Self::Ogg => "ogg",
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Mp4 => "audio/mp4",
            Self::Ogg => "audio/ogg",
        }
    }
}
