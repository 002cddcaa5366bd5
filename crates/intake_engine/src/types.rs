use thiserror::Error;

/// Why a title resolution failed. Each URL fails independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("page has no usable title")]
    NoTitle,
    #[error("network error: {0}")]
    Network(String),
}

/// A queue or immediate-submission call was rejected by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EngineRejection {
    pub message: String,
}

impl EngineRejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The persisted-list query failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store query failed: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Privileged scheme registration with the OS failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scheme registration failed: {message}")]
pub struct RegistrarError {
    pub message: String,
}

impl RegistrarError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One item the engine rejected, keyed by its position in the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub index: usize,
    pub url: String,
    pub message: String,
}

/// Outcome of one submission batch. Per-item rejections are recorded here
/// and surfaced; they never fail the submission as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionReport {
    pub accepted: usize,
    pub failures: Vec<ItemFailure>,
}

impl SubmissionReport {
    pub fn fully_accepted(&self) -> bool {
        self.failures.is_empty()
    }
}
