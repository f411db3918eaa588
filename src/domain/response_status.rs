use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::Pending => "pending",
            ResponseStatus::Processing => "processing",
            ResponseStatus::Completed => "completed",
            ResponseStatus::Failed => "failed",
        }
    }

    /// Still waiting on a transcription attempt.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, ResponseStatus::Pending | ResponseStatus::Processing)
    }
}

impl FromStr for ResponseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ResponseStatus::Pending),
            "processing" => Ok(ResponseStatus::Processing),
            "completed" => Ok(ResponseStatus::Completed),
            "failed" => Ok(ResponseStatus::Failed),
            _ => Err(format!("Invalid response status: {}", s)),
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
