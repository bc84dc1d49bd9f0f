use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use console_logging::{console_info, console_warn};
use ragscope_core::{Effect, Msg};
use ragscope_engine::{EngineEvent, EngineHandle};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn check_health(&self) {
        self.engine.check_health();
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartSimulation => self.engine.start_simulation(),
                Effect::Upload { file } => {
                    console_info!("Upload requested for {} ({:?})", file.name, file.path);
                    self.engine.upload(file.name, file.path);
                }
                Effect::Query { request_id, text } => {
                    self.engine.query(request_id, text);
                }
                Effect::RevealSteps { steps } => self.engine.reveal_steps(steps),
                Effect::Teardown => self.engine.teardown(),
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            pump_events(|timeout| engine.recv_timeout(timeout), &msg_tx);
        });
    }
}

/// Forwards engine events as messages until either side goes away.
fn pump_events<F>(mut recv: F, msg_tx: &mpsc::Sender<Msg>)
where
    F: FnMut(Duration) -> Result<EngineEvent, RecvTimeoutError>,
{
    loop {
        let event = match recv(Duration::from_millis(50)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                console_warn!("Engine event channel closed");
                break;
            }
        };
        if let Some(msg) = map_event(event) {
            if msg_tx.send(msg).is_err() {
                // Dispatch loop has exited.
                break;
            }
        }
    }
}

/// Translates engine output into view messages. Health checks only log.
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::UploadCompleted { result, .. } => Some(match result {
            Ok(()) => Msg::UploadSucceeded { at: Utc::now() },
            Err(_) => Msg::UploadFailed { at: Utc::now() },
        }),
        EngineEvent::QueryCompleted { request_id, result } => Some(match result {
            Ok(reply) => {
                let (answer, steps) = reply.into_parts();
                Msg::QueryResolved {
                    request_id,
                    answer,
                    steps,
                }
            }
            Err(_) => Msg::QueryFailed { request_id },
        }),
        EngineEvent::StepRevealed { text, at, .. } => Some(Msg::StepRevealed { text, at }),
        EngineEvent::SimulationTick { .. } => Some(Msg::SimulationTick),
        EngineEvent::HealthChecked { result } => {
            match result {
                Ok(status) => console_info!("Pipeline reachable: {}", status),
                Err(err) => console_warn!("Pipeline health check failed: {}", err),
            }
            None
        }
    }
}
