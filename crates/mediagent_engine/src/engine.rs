use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use client_logging::{client_debug, client_info, client_warn};

use crate::client::{DiagnosisApi, ReqwestDiagnosisClient};
use crate::{ApiSettings, EngineError, EngineEvent, ReportUpload, RequestId};

enum EngineCommand {
    ProcessFile {
        request_id: RequestId,
        upload: ReportUpload,
    },
    ProcessText {
        request_id: RequestId,
        text: String,
    },
    CheckHealth,
}

/// Runs backend calls on a worker thread and reports back through events.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        client_info!("Engine using backend {}", settings.base_url());
        let api = ReqwestDiagnosisClient::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn DiagnosisApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mediagent-io")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("mediagent-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(api.as_ref(), command, event_tx).await;
                    });
                }
                client_debug!("Engine command channel closed");
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn process_file(&self, request_id: RequestId, upload: ReportUpload) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::ProcessFile { request_id, upload });
    }

    pub fn process_text(&self, request_id: RequestId, text: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::ProcessText {
            request_id,
            text: text.into(),
        });
    }

    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    api: &dyn DiagnosisApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ProcessFile { request_id, upload } => {
            client_info!(
                "ProcessFile request_id={} file={} bytes={}",
                request_id,
                upload.file_name,
                upload.content.len()
            );
            let result = api.process_file(&upload).await;
            log_outcome(request_id, &result);
            EngineEvent::DiagnosisCompleted { request_id, result }
        }
        EngineCommand::ProcessText { request_id, text } => {
            client_info!("ProcessText request_id={} chars={}", request_id, text.chars().count());
            let result = api.process_string(&text).await;
            log_outcome(request_id, &result);
            EngineEvent::DiagnosisCompleted { request_id, result }
        }
        EngineCommand::CheckHealth => {
            let result = api.health().await;
            if let Err(err) = &result {
                client_warn!("Health check failed: {}", err);
            }
            EngineEvent::HealthChecked(result)
        }
    };
    let _ = event_tx.send(event);
}

fn log_outcome<T>(request_id: RequestId, result: &Result<T, crate::ApiError>) {
    match result {
        Ok(_) => client_info!("Request {} completed", request_id),
        Err(err) => client_warn!("Request {} failed: {}", request_id, err),
    }
}
