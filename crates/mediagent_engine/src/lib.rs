//! MediAgent engine: backend settings, HTTP client and background execution.
mod client;
mod engine;
mod settings;
mod types;

pub use client::{DiagnosisApi, ReqwestDiagnosisClient};
pub use engine::EngineHandle;
pub use settings::{ApiSettings, API_URL_ENV, DEFAULT_API_URL};
pub use types::{
    ApiError, BackendHealth, DiagnosisResponse, EngineError, EngineEvent, ReportUpload, RequestId,
};
