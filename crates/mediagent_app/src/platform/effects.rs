use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::client_debug;
use mediagent_core::{
    DiagnosisReply, Effect, Msg, Route, SESSION_KEY_DIAGNOSIS, SESSION_KEY_FILENAME,
};
use mediagent_engine::{DiagnosisResponse, EngineEvent, EngineHandle, ReportUpload};

use super::session::SessionStore;

const EVENT_POLL: Duration = Duration::from_millis(50);

/// Executes core effects and feeds engine results back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    session: SessionStore,
    msg_tx: mpsc::Sender<Msg>,
    shutdown: Arc<AtomicBool>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, session: SessionStore, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self {
            engine,
            session,
            msg_tx,
            shutdown: Arc::new(AtomicBool::new(false)),
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ProcessFile { request_id, file } => {
                    client_debug!("Dispatching request {} for {}", request_id, file.name);
                    self.engine
                        .process_file(request_id, ReportUpload::new(file.name, file.content));
                }
                Effect::ProcessText { request_id, text } => {
                    client_debug!("Dispatching request {} for report text", request_id);
                    self.engine.process_text(request_id, text);
                }
                Effect::StoreSession {
                    diagnosis,
                    filename,
                } => {
                    client_debug!(
                        "Storing diagnosis ({} chars) for {}",
                        diagnosis.len(),
                        filename
                    );
                    self.session.set(SESSION_KEY_DIAGNOSIS, diagnosis);
                    self.session.set(SESSION_KEY_FILENAME, filename);
                }
                Effect::Navigate(Route::Results) => {
                    // The results view only knows what session storage holds.
                    let _ = self.msg_tx.send(Msg::ResultsLoaded {
                        diagnosis: self.session.get(SESSION_KEY_DIAGNOSIS),
                        filename: self.session.get(SESSION_KEY_FILENAME),
                    });
                }
                Effect::Navigate(Route::Upload) => {
                    client_debug!("Navigated back to upload form");
                }
            }
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let msg_tx = self.msg_tx.clone();
        let shutdown = self.shutdown.clone();
        thread::spawn(move || {
            while !shutdown.load(Ordering::Relaxed) {
                let Some(event) = engine.recv_timeout(EVENT_POLL) else {
                    continue;
                };
                let msg = match event {
                    EngineEvent::DiagnosisCompleted { request_id, result } => {
                        Msg::DiagnosisReceived {
                            request_id,
                            result: result.map(map_reply).map_err(|err| err.to_string()),
                        }
                    }
                    EngineEvent::HealthChecked(result) => {
                        client_debug!("Ignoring health result: {:?}", result);
                        continue;
                    }
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        });
    }
}

impl Drop for EffectRunner {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn map_reply(response: DiagnosisResponse) -> DiagnosisReply {
    DiagnosisReply {
        status: response.status,
        diagnosis: response.diagnosis,
        filename_processed: response.filename_processed,
    }
}
