use std::fmt;
use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub type RequestId = u64;

/// A report file ready to be sent as multipart form data.
#[derive(Clone, PartialEq, Eq)]
pub struct ReportUpload {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ReportUpload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Reads `path` as-is; the upload is named after its last path component.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file")
            })?;
        let content = std::fs::read(path)?;
        Ok(Self { file_name, content })
    }
}

impl fmt::Debug for ReportUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportUpload")
            .field("file_name", &self.file_name)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Body of a 2xx reply from `/process_file` or `/process_string`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DiagnosisResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub filename_processed: Option<String>,
}

/// Body of `GET /` on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct BackendHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    DiagnosisCompleted {
        request_id: RequestId,
        result: Result<DiagnosisResponse, ApiError>,
    },
    HealthChecked(Result<BackendHealth, ApiError>),
}

/// Failures of a single backend call. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("could not build request: {0}")]
    Request(String),
    /// Non-2xx reply; `message` comes from the body's `error` field.
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine worker: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}
