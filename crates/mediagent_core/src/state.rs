use crate::view_model::{AppViewModel, ResultsView, UploadView};
use crate::Route;

pub type RequestId = u64;

/// Session-storage key holding the diagnosis text for the results view.
pub const SESSION_KEY_DIAGNOSIS: &str = "diagnosis";
/// Session-storage key holding the processed file name for the results view.
pub const SESSION_KEY_FILENAME: &str = "filename";

/// A file chosen in the upload form. Content is passed through untouched.
#[derive(Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl ReportFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

// Report content is patient data; keep it out of debug output and logs.
impl std::fmt::Debug for ReportFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportFile")
            .field("name", &self.name)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// Backend reply as seen by the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosisReply {
    pub status: String,
    pub diagnosis: String,
    pub filename_processed: Option<String>,
}

impl DiagnosisReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionSource {
    File { name: String },
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) request_id: RequestId,
    pub(crate) source: SubmissionSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    route: Route,
    selected: Option<ReportFile>,
    error: Option<String>,
    in_flight: Option<InFlight>,
    results: Option<ResultsView>,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let loading = self.in_flight.is_some();
        AppViewModel {
            route: self.route,
            upload: UploadView {
                selected_file: self.selected.as_ref().map(|file| file.name.clone()),
                error: self.error.clone(),
                loading,
                can_select: !loading,
                can_submit: !loading && self.selected.is_some(),
            },
            results: self.results.clone(),
            dirty: self.dirty,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_file(&self) -> Option<&ReportFile> {
        self.selected.as_ref()
    }

    pub fn in_flight_request(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|pending| pending.request_id)
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn select_file(&mut self, file: ReportFile) {
        self.selected = Some(file);
        self.error = None;
        self.mark_dirty();
    }

    pub(crate) fn reject_selection(&mut self, message: String) {
        self.selected = None;
        self.error = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.mark_dirty();
    }

    /// Enters the loading state and allocates the id for the new request.
    pub(crate) fn begin_request(&mut self, source: SubmissionSource) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.in_flight = Some(InFlight { request_id, source });
        self.error = None;
        self.mark_dirty();
        request_id
    }

    /// Leaves the loading state if `request_id` is the one in flight.
    pub(crate) fn finish_request(&mut self, request_id: RequestId) -> Option<SubmissionSource> {
        match &self.in_flight {
            Some(pending) if pending.request_id == request_id => {
                self.mark_dirty();
                self.in_flight.take().map(|pending| pending.source)
            }
            _ => None,
        }
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        self.route = route;
        self.mark_dirty();
    }

    pub(crate) fn set_results(&mut self, results: ResultsView) {
        self.results = Some(results);
        self.mark_dirty();
    }

    /// Fresh upload form; the request counter keeps counting.
    pub(crate) fn reset_form(&mut self) {
        self.selected = None;
        self.error = None;
        self.results = None;
        self.mark_dirty();
    }
}
