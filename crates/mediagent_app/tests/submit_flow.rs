use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;

use mediagent_app::platform::app::{Controller, SubmissionOutcome};
use mediagent_app::platform::config::resolve_settings;
use mediagent_app::platform::session::SessionStore;
use mediagent_core::{Msg, Route, SESSION_KEY_DIAGNOSIS, SESSION_KEY_FILENAME};
use mediagent_engine::{
    ApiError, ApiSettings, BackendHealth, DiagnosisApi, DiagnosisResponse, EngineHandle,
    ReportUpload, DEFAULT_API_URL,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Option<Duration> = Some(Duration::from_secs(10));

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

/// Mock backend kept alive together with the runtime that started it.
struct Backend {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl Backend {
    fn start(mocks: Vec<Mock>) -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for mock in mocks {
                mock.mount(&server).await;
            }
            server
        });
        Self { server, runtime }
    }

    fn controller(&self) -> Controller {
        let settings = ApiSettings::parse(&self.server.uri()).unwrap();
        Controller::new(EngineHandle::new(settings).unwrap(), SessionStore::new())
    }

    fn request_count(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

fn write_report(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, "Patient: 61yo female. Shortness of breath, palpitations.").unwrap();
    path
}

fn process_file_replies(template: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/process_file"))
        .respond_with(template)
}

#[test]
fn successful_upload_stores_diagnosis_and_navigates() {
    init_logging();
    let backend = Backend::start(vec![process_file_replies(
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "diagnosis": "X",
            "filename_processed": "f.txt"
        })),
    )
    .expect(1)]);
    let dir = TempDir::new().unwrap();
    let mut controller = backend.controller();

    controller.select_path(&write_report(&dir, "report.txt"));
    controller.dispatch(Msg::SubmitClicked);
    assert!(controller.state().is_loading());

    let mut rendered = Vec::new();
    assert!(controller.pump_until_settled(WAIT, |view| rendered.push(view.clone())));

    assert_eq!(
        controller.session().get(SESSION_KEY_DIAGNOSIS).as_deref(),
        Some("X")
    );
    assert_eq!(
        controller.session().get(SESSION_KEY_FILENAME).as_deref(),
        Some("f.txt")
    );
    assert_eq!(controller.state().route(), Route::Results);
    assert_eq!(controller.outcome(), SubmissionOutcome::Diagnosed);
    let results = controller.state().view().results.expect("results loaded");
    assert_eq!(results.diagnosis.as_deref(), Some("X"));
    assert!(rendered.iter().any(|view| view.route == Route::Results));
}

#[test]
fn backend_rejection_shows_its_message_and_stays_on_form() {
    init_logging();
    let backend = Backend::start(vec![process_file_replies(
        ResponseTemplate::new(400).set_body_json(json!({ "error": "bad format" })),
    )]);
    let dir = TempDir::new().unwrap();
    let mut controller = backend.controller();

    controller.select_path(&write_report(&dir, "report.txt"));
    controller.dispatch(Msg::SubmitClicked);
    assert!(controller.pump_until_settled(WAIT, |_| {}));

    let view = controller.state().view();
    assert_eq!(view.route, Route::Upload);
    assert_eq!(view.upload.error.as_deref(), Some("bad format"));
    assert!(!view.upload.loading);
    assert!(controller.session().is_empty());
    assert_eq!(controller.outcome(), SubmissionOutcome::Failed);
}

#[test]
fn submit_without_file_makes_no_request() {
    init_logging();
    let backend = Backend::start(vec![Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)]);
    let mut controller = backend.controller();

    let view = controller.dispatch(Msg::SubmitClicked).expect("render");
    assert!(controller.pump_until_settled(WAIT, |_| {}));

    assert_eq!(
        view.upload.error.as_deref(),
        Some("Please select a file to upload")
    );
    assert_eq!(backend.request_count(), 0);
}

#[test]
fn pdf_selection_is_rejected_before_any_request() {
    init_logging();
    let backend = Backend::start(vec![]);
    let dir = TempDir::new().unwrap();
    let mut controller = backend.controller();

    controller.select_path(&write_report(&dir, "report.txt"));
    let view = controller
        .select_path(&write_report(&dir, "report.pdf"))
        .expect("render");

    assert_eq!(view.upload.selected_file, None);
    assert_eq!(view.upload.error.as_deref(), Some("Please select a .txt file"));

    controller.dispatch(Msg::SubmitClicked);
    assert_eq!(backend.request_count(), 0);
}

#[test]
fn missing_file_is_reported_as_unreadable() {
    init_logging();
    let backend = Backend::start(vec![]);
    let dir = TempDir::new().unwrap();
    let mut controller = backend.controller();

    let view = controller
        .select_path(&dir.path().join("absent.txt"))
        .expect("render");

    let error = view.upload.error.expect("error shown");
    assert!(error.starts_with("Could not read "));
    assert!(error.contains("absent.txt"));
}

#[test]
fn refused_connection_returns_form_to_idle() {
    init_logging();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = ApiSettings::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let mut controller = Controller::new(EngineHandle::new(settings).unwrap(), SessionStore::new());
    let dir = TempDir::new().unwrap();

    controller.select_path(&write_report(&dir, "report.txt"));
    controller.dispatch(Msg::SubmitClicked);
    assert!(controller.pump_until_settled(WAIT, |_| {}));

    let view = controller.state().view();
    assert!(!view.upload.loading);
    assert!(view.upload.can_submit);
    assert!(!view.upload.error.unwrap_or_default().is_empty());
    assert_eq!(view.route, Route::Upload);
}

struct SilentFailureApi;

#[async_trait::async_trait]
impl DiagnosisApi for SilentFailureApi {
    async fn process_file(&self, _upload: &ReportUpload) -> Result<DiagnosisResponse, ApiError> {
        Err(ApiError::Network(String::new()))
    }

    async fn process_string(&self, _text: &str) -> Result<DiagnosisResponse, ApiError> {
        Err(ApiError::Network(String::new()))
    }

    async fn health(&self) -> Result<BackendHealth, ApiError> {
        Err(ApiError::Network(String::new()))
    }
}

#[test]
fn failure_without_message_shows_generic_fallback() {
    init_logging();
    let engine = EngineHandle::with_api(Arc::new(SilentFailureApi)).unwrap();
    let mut controller = Controller::new(engine, SessionStore::new());
    let dir = TempDir::new().unwrap();

    controller.select_path(&write_report(&dir, "report.txt"));
    controller.dispatch(Msg::SubmitClicked);
    assert!(controller.pump_until_settled(WAIT, |_| {}));

    assert!(!controller.state().is_loading());
    assert_eq!(
        controller.state().error(),
        Some("An error occurred while processing the file. Please try again.")
    );
}

#[test]
fn text_submission_round_trip() {
    init_logging();
    let text = "Chest pain radiating to left arm.\n";
    let backend = Backend::start(vec![Mock::given(method("POST"))
        .and(path("/process_string"))
        .and(wiremock::matchers::body_json(json!({ "report_content": text })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "diagnosis": "Possible angina"
        })))
        .expect(1)]);
    let mut controller = backend.controller();

    controller.dispatch(Msg::ReportTextSubmitted(text.to_string()));
    assert!(controller.pump_until_settled(WAIT, |_| {}));

    assert_eq!(controller.state().route(), Route::Results);
    assert_eq!(
        controller.session().get(SESSION_KEY_DIAGNOSIS).as_deref(),
        Some("Possible angina")
    );
    assert_eq!(
        controller.session().get(SESSION_KEY_FILENAME).as_deref(),
        Some("report text")
    );
}

#[test]
fn upload_another_resets_form_but_keeps_session() {
    init_logging();
    let backend = Backend::start(vec![process_file_replies(
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "diagnosis": "Bronchitis"
        })),
    )]);
    let dir = TempDir::new().unwrap();
    let mut controller = backend.controller();

    controller.select_path(&write_report(&dir, "lungs.txt"));
    controller.dispatch(Msg::SubmitClicked);
    assert!(controller.pump_until_settled(WAIT, |_| {}));
    assert_eq!(
        controller.session().get(SESSION_KEY_FILENAME).as_deref(),
        Some("lungs.txt")
    );

    let view = controller.dispatch(Msg::UploadAnotherClicked).expect("render");

    assert_eq!(view.route, Route::Upload);
    assert_eq!(view.upload.selected_file, None);
    assert_eq!(
        controller.session().get(SESSION_KEY_DIAGNOSIS).as_deref(),
        Some("Bronchitis")
    );
}

#[test]
fn api_url_flag_beats_env_value() {
    let settings = resolve_settings(
        Some("http://flag.example:9000/"),
        Some("http://env.example:8000"),
    )
    .unwrap();
    assert_eq!(settings.base_url(), "http://flag.example:9000");

    let settings = resolve_settings(None, Some("http://env.example:8000")).unwrap();
    assert_eq!(settings.base_url(), "http://env.example:8000");
}

#[test]
fn blank_or_missing_env_uses_default_backend() {
    for env in [None, Some(""), Some("  \t")] {
        let settings = resolve_settings(None, env).unwrap();
        assert_eq!(settings.base_url(), DEFAULT_API_URL);
    }
}

#[test]
fn invalid_flag_is_an_error_even_with_valid_env() {
    let err = resolve_settings(Some("localhost:5000"), Some("http://env.example")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}

#[test]
fn nothing_submitted_counts_as_failure() {
    init_logging();
    let backend = Backend::start(vec![]);
    let controller = backend.controller();

    assert_eq!(controller.outcome(), SubmissionOutcome::Failed);
}
