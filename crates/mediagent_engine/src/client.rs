use client_logging::{client_debug, client_error};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiSettings, BackendHealth, DiagnosisResponse, ReportUpload};

const PROCESS_FILE_PATH: &str = "process_file";
const PROCESS_STRING_PATH: &str = "process_string";
const FILE_FIELD: &str = "file";
const FILE_DEFAULT_ERROR: &str = "Failed to process file";
const STRING_DEFAULT_ERROR: &str = "Failed to process report";

#[async_trait::async_trait]
pub trait DiagnosisApi: Send + Sync {
    /// `POST {base}/process_file` with the report as multipart field `file`.
    async fn process_file(&self, upload: &ReportUpload) -> Result<DiagnosisResponse, ApiError>;

    /// `POST {base}/process_string` with `{"report_content": text}`.
    async fn process_string(&self, text: &str) -> Result<DiagnosisResponse, ApiError>;

    /// `GET {base}/`.
    async fn health(&self) -> Result<BackendHealth, ApiError>;
}

#[derive(Serialize)]
struct ProcessStringBody<'a> {
    report_content: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestDiagnosisClient {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestDiagnosisClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn submit(
        &self,
        request: reqwest::RequestBuilder,
        default_error: &str,
    ) -> Result<DiagnosisResponse, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        client_debug!("backend replied http {} ({} bytes)", status.as_u16(), body.len());

        if !status.is_success() {
            let parsed: ErrorBody = serde_json::from_slice(&body).map_err(|err| {
                ApiError::Decode(format!(
                    "unreadable error response (http {}): {err}",
                    status.as_u16()
                ))
            })?;
            let message = parsed
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| default_error.to_string());
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body)
            .map_err(|err| ApiError::Decode(format!("unreadable diagnosis response: {err}")))
    }
}

#[async_trait::async_trait]
impl DiagnosisApi for ReqwestDiagnosisClient {
    async fn process_file(&self, upload: &ReportUpload) -> Result<DiagnosisResponse, ApiError> {
        let part = Part::bytes(upload.content.clone())
            .file_name(upload.file_name.clone())
            .mime_str("text/plain")
            .map_err(|err| ApiError::Request(err.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);
        let request = self
            .client
            .post(self.settings.endpoint(PROCESS_FILE_PATH))
            .multipart(form);

        let result = self.submit(request, FILE_DEFAULT_ERROR).await;
        if let Err(err) = &result {
            client_error!("Error processing file {}: {}", upload.file_name, err);
        }
        result
    }

    async fn process_string(&self, text: &str) -> Result<DiagnosisResponse, ApiError> {
        let body = serde_json::to_vec(&ProcessStringBody {
            report_content: text,
        })
        .map_err(|err| ApiError::Request(err.to_string()))?;
        let request = self
            .client
            .post(self.settings.endpoint(PROCESS_STRING_PATH))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let result = self.submit(request, STRING_DEFAULT_ERROR).await;
        if let Err(err) = &result {
            client_error!("Error processing string ({} chars): {}", text.chars().count(), err);
        }
        result
    }

    async fn health(&self) -> Result<BackendHealth, ApiError> {
        let response = self
            .client
            .get(self.settings.endpoint(""))
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::Decode(format!("unreadable health response: {err}")))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        return ApiError::Request(err.to_string());
    }
    ApiError::Network(err.to_string())
}
