use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type RequestId = u64;
pub type BatchId = u64;

/// Body of a successful `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub steps: Option<Vec<String>>,
}

impl ChatReply {
    /// Splits into the answer and the steps to reveal; steps are empty when
    /// the server sent none.
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.answer, self.steps.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HealthReply {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        file_name: String,
        result: Result<(), RequestError>,
    },
    QueryCompleted {
        request_id: RequestId,
        result: Result<ChatReply, RequestError>,
    },
    HealthChecked {
        result: Result<String, RequestError>,
    },
    StepRevealed {
        batch_id: BatchId,
        index: usize,
        text: String,
        at: DateTime<Utc>,
    },
    SimulationTick {
        tick: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    FileRead,
    Runtime,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::FileRead => write!(f, "could not read file"),
            FailureKind::Runtime => write!(f, "engine runtime unavailable"),
        }
    }
}
