use crate::state::SubmissionSource;
use crate::view_model::ResultsView;
use crate::{AppState, DiagnosisReply, Effect, Msg, ReportFile, Route, ValidationError};

/// Stored as the file name when the report was submitted as text.
pub const TEXT_REPORT_LABEL: &str = "report text";

const FILE_NOT_SUCCESS: &str = "Failed to process file. Please try again.";
const TEXT_NOT_SUCCESS: &str = "Failed to process report. Please try again.";
const FILE_FALLBACK_ERROR: &str =
    "An error occurred while processing the file. Please try again.";
const TEXT_FALLBACK_ERROR: &str =
    "An error occurred while processing the report. Please try again.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(selection) => {
            // The picker is disabled while a request is in flight.
            if state.is_loading() {
                return (state, Vec::new());
            }
            if let Some(file) = selection {
                select_file(&mut state, file);
            }
            Vec::new()
        }
        Msg::FileUnreadable { name, reason } => {
            if !state.is_loading() {
                state.reject_selection(format!("Could not read {name}: {reason}"));
            }
            Vec::new()
        }
        Msg::SubmitClicked => {
            if state.is_loading() {
                return (state, Vec::new());
            }
            let selected = state.selected_file().cloned();
            match selected {
                None => {
                    state.set_error(ValidationError::NoFileSelected.to_string());
                    Vec::new()
                }
                Some(file) => {
                    let request_id = state.begin_request(SubmissionSource::File {
                        name: file.name.clone(),
                    });
                    vec![Effect::ProcessFile { request_id, file }]
                }
            }
        }
        Msg::ReportTextSubmitted(text) => {
            if state.is_loading() {
                return (state, Vec::new());
            }
            if text.is_empty() {
                state.set_error(ValidationError::EmptyReportText.to_string());
                Vec::new()
            } else {
                let request_id = state.begin_request(SubmissionSource::Text);
                vec![Effect::ProcessText { request_id, text }]
            }
        }
        Msg::DiagnosisReceived { request_id, result } => {
            match state.finish_request(request_id) {
                Some(source) => apply_reply(&mut state, &source, result),
                // Stale or unknown request.
                None => Vec::new(),
            }
        }
        Msg::ResultsLoaded {
            diagnosis,
            filename,
        } => {
            state.set_results(ResultsView {
                filename,
                diagnosis,
            });
            Vec::new()
        }
        Msg::UploadAnotherClicked => {
            if state.route() == Route::Results {
                state.reset_form();
                state.navigate(Route::Upload);
                vec![Effect::Navigate(Route::Upload)]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn select_file(state: &mut AppState, file: ReportFile) {
    match crate::validate_report_filename(&file.name) {
        Ok(()) => state.select_file(file),
        Err(err) => state.reject_selection(err.to_string()),
    }
}

fn apply_reply(
    state: &mut AppState,
    source: &SubmissionSource,
    result: Result<DiagnosisReply, String>,
) -> Vec<Effect> {
    let (not_success, fallback) = match source {
        SubmissionSource::File { .. } => (FILE_NOT_SUCCESS, FILE_FALLBACK_ERROR),
        SubmissionSource::Text => (TEXT_NOT_SUCCESS, TEXT_FALLBACK_ERROR),
    };

    match result {
        Ok(reply) if reply.is_success() => {
            let filename = reply
                .filename_processed
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| match source {
                    SubmissionSource::File { name } => name.clone(),
                    SubmissionSource::Text => TEXT_REPORT_LABEL.to_string(),
                });
            state.navigate(Route::Results);
            vec![
                Effect::StoreSession {
                    diagnosis: reply.diagnosis,
                    filename,
                },
                Effect::Navigate(Route::Results),
            ]
        }
        Ok(_) => {
            state.set_error(not_success.to_string());
            Vec::new()
        }
        Err(message) => {
            let message = if message.is_empty() {
                fallback.to_string()
            } else {
                message
            };
            state.set_error(message);
            Vec::new()
        }
    }
}
