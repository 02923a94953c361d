use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use client_logging::client_warn;
use mediagent_core::{update, AppState, AppViewModel, Msg, ReportFile, Route};
use mediagent_engine::{EngineHandle, ReportUpload};

use super::effects::EffectRunner;
use super::session::SessionStore;

/// Interval at which an idle wait emits `Msg::Tick`.
const TICK: Duration = Duration::from_millis(75);

/// How a one-shot submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The results view is showing a diagnosis.
    Diagnosed,
    /// Validation, the backend or the transport failed, or nothing was submitted.
    Failed,
}

impl From<SubmissionOutcome> for ExitCode {
    fn from(outcome: SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::Diagnosed => ExitCode::SUCCESS,
            SubmissionOutcome::Failed => ExitCode::FAILURE,
        }
    }
}

/// Owns the form state and drives the update/effect loop.
pub struct Controller {
    state: AppState,
    runner: EffectRunner,
    session: SessionStore,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Controller {
    pub fn new(engine: EngineHandle, session: SessionStore) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(engine, session.clone(), msg_tx);
        Self {
            state: AppState::new(),
            runner,
            session,
            msg_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn outcome(&self) -> SubmissionOutcome {
        if self.state.route() == Route::Results {
            SubmissionOutcome::Diagnosed
        } else {
            SubmissionOutcome::Failed
        }
    }

    /// Applies `msg`, runs its effects and returns the view when a render is due.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    /// Reads `path` and offers it to the form as the selected file.
    pub fn select_path(&mut self, path: &Path) -> Option<AppViewModel> {
        match ReportUpload::from_path(path) {
            Ok(upload) => self.dispatch(Msg::FileSelected(Some(ReportFile::new(
                upload.file_name,
                upload.content,
            )))),
            Err(err) => {
                client_warn!("Could not read {}: {}", path.display(), err);
                self.dispatch(Msg::FileUnreadable {
                    name: path.display().to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Processes messages until no request is in flight and the inbox is empty.
    ///
    /// `wait` bounds the total time spent; `None` waits for as long as the
    /// backend takes. Returns false when the wait ran out first.
    pub fn pump_until_settled(
        &mut self,
        wait: Option<Duration>,
        mut on_render: impl FnMut(&AppViewModel),
    ) -> bool {
        let deadline = wait.map(|wait| Instant::now() + wait);
        loop {
            while let Ok(msg) = self.msg_rx.try_recv() {
                if let Some(view) = self.dispatch(msg) {
                    on_render(&view);
                }
            }
            if !self.state.is_loading() {
                return true;
            }

            let slice = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return false;
                    }
                    remaining.min(TICK)
                }
                None => TICK,
            };
            let msg = match self.msg_rx.recv_timeout(slice) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => Msg::Tick,
                Err(RecvTimeoutError::Disconnected) => return false,
            };
            if let Some(view) = self.dispatch(msg) {
                on_render(&view);
            }
        }
    }
}
