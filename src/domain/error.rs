// src/domain/error.rs
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification of a failed remote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Host could not be reached
    NetworkError,
    /// No response within the configured deadline
    TimeoutError,
    NotFound,
    /// 5xx-class failure on the remote side
    ServerError,
    /// Body was not valid JSON for the expected shape
    ParseError,
    UnknownError,
}

impl ErrorKind {
    /// `NotFound` and `ParseError` describe stable conditions; everything else may
    /// succeed on a later attempt.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::NotFound | ErrorKind::ParseError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::TimeoutError => "TIMEOUT_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ServerError => "SERVER_ERROR",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure surfaced by the fetch client and the data accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    pub status: Option<u16>,
    #[serde(rename = "code")]
    pub kind: ErrorKind,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            kind,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Failure of the durable key-value backend. Never leaves the progress store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
