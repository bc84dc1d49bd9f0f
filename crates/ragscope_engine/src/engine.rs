use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use console_logging::{console_error, console_info, console_warn};

use crate::client::{PipelineClient, ReqwestPipelineClient};
use crate::scheduler::RevealScheduler;
use crate::simulation::SimulationTicker;
use crate::sink::{ChannelEventSink, EventSink};
use crate::{ClientSettings, EngineEvent, FailureKind, RequestError, RequestId, TimingSettings};

enum EngineCommand {
    Upload { file_name: String, path: PathBuf },
    Query { request_id: RequestId, text: String },
    CheckHealth,
    RevealSteps { steps: Vec<String> },
    StartSimulation,
    Teardown,
}

/// Owns the engine thread. Commands go in through the handle, results come
/// back as [`EngineEvent`]s.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, timing: TimingSettings) -> Result<Self, RequestError> {
        let client = ReqwestPipelineClient::new(settings)?;
        Self::with_client(Arc::new(client), timing)
    }

    /// Starts the engine thread around `client`. Fails with
    /// [`FailureKind::Runtime`] if the tokio runtime cannot be built.
    pub fn with_client(
        client: Arc<dyn PipelineClient>,
        timing: TimingSettings,
    ) -> Result<Self, RequestError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|err| {
            console_error!("Failed to start engine runtime: {}", err);
            RequestError::new(FailureKind::Runtime, err.to_string())
        })?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let handle = runtime.handle().clone();
            let mut scheduler =
                RevealScheduler::new(handle.clone(), timing.reveal_interval, sink.clone());
            let mut ticker = SimulationTicker::new(handle, timing.simulation_tick, sink.clone());

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::RevealSteps { steps } => {
                        scheduler.schedule(steps);
                    }
                    EngineCommand::StartSimulation => {
                        ticker.start();
                    }
                    EngineCommand::Teardown => {
                        scheduler.cancel_all();
                        ticker.stop();
                    }
                    request => {
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_request(client.as_ref(), request, sink.as_ref()).await;
                        });
                    }
                }
            }
            // Every handle is gone: scheduler and ticker drop here and cancel their timers.
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload(&self, file_name: impl Into<String>, path: impl Into<PathBuf>) {
        self.send(EngineCommand::Upload {
            file_name: file_name.into(),
            path: path.into(),
        });
    }

    pub fn query(&self, request_id: RequestId, text: impl Into<String>) {
        self.send(EngineCommand::Query {
            request_id,
            text: text.into(),
        });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn reveal_steps(&self, steps: Vec<String>) {
        self.send(EngineCommand::RevealSteps { steps });
    }

    pub fn start_simulation(&self) {
        self.send(EngineCommand::StartSimulation);
    }

    /// Cancels pending reveals and stops the simulator. In-flight requests
    /// still complete; their events are for the caller to ignore.
    pub fn teardown(&self) {
        self.send(EngineCommand::Teardown);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Disconnected` means the
    /// engine thread has exited and no further events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        let receiver = self
            .event_rx
            .lock()
            .map_err(|_| RecvTimeoutError::Disconnected)?;
        receiver.recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            console_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_request(
    client: &dyn PipelineClient,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Upload { file_name, path } => {
            console_info!("Uploading {} from {:?}", file_name, path);
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => client.upload(&file_name, bytes).await,
                Err(err) => Err(RequestError::new(FailureKind::FileRead, err.to_string())),
            };
            if let Err(err) = &result {
                console_warn!("Upload of {} failed: {}", file_name, err);
            }
            sink.emit(EngineEvent::UploadCompleted { file_name, result });
        }
        EngineCommand::Query { request_id, text } => {
            console_info!("Query {} sent ({} chars)", request_id, text.len());
            let result = client.query(&text).await;
            match &result {
                Ok(reply) => console_info!(
                    "Query {} answered with {} steps",
                    request_id,
                    reply.steps.as_ref().map_or(0, Vec::len)
                ),
                Err(err) => console_warn!("Query {} failed: {}", request_id, err),
            }
            sink.emit(EngineEvent::QueryCompleted { request_id, result });
        }
        EngineCommand::CheckHealth => {
            let result = client.health().await;
            sink.emit(EngineEvent::HealthChecked { result });
        }
        EngineCommand::RevealSteps { .. }
        | EngineCommand::StartSimulation
        | EngineCommand::Teardown => {}
    }
}
