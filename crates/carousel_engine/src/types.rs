use std::fmt;

use carousel_core::DisplayItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ItemsReady(Vec<DisplayItem>),
    SourceUnavailable(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Plain-language explanation suitable for end users.
    pub fn user_message(&self) -> &'static str {
        match self.kind {
            FailureKind::InvalidUrl => "Die Adresse der Website ist ungültig.",
            FailureKind::Timeout | FailureKind::Network => {
                "Die Website ist derzeit nicht erreichbar."
            }
            FailureKind::HttpStatus(401) | FailureKind::HttpStatus(403) => {
                "Keine Berechtigung zum Lesen der Nachrichten."
            }
            _ => "Die Nachrichtenquelle konnte nicht gelesen werden.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    Network,
    SourceUnavailable,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::SourceUnavailable => write!(f, "no readable news list"),
        }
    }
}
