//! MediAgent core: pure upload-form state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::{Effect, Route};
pub use msg::Msg;
pub use state::{
    AppState, DiagnosisReply, ReportFile, RequestId, SubmissionSource, SESSION_KEY_DIAGNOSIS,
    SESSION_KEY_FILENAME,
};
pub use update::{update, TEXT_REPORT_LABEL};
pub use validate::{is_report_filename, validate_report_filename, ValidationError};
pub use view_model::{AppViewModel, ResultsView, UploadView};
