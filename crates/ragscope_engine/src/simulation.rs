use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use console_logging::{console_info, console_trace};

use crate::sink::EventSink;
use crate::EngineEvent;

/// Drives the graph simulator with a fixed-period tick while started.
///
/// The first tick arrives one period after `start`. Dropping the ticker stops it.
pub struct SimulationTicker {
    runtime: Handle,
    period: Duration,
    sink: Arc<dyn EventSink>,
    running: Option<Running>,
}

struct Running {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SimulationTicker {
    pub fn new(runtime: Handle, period: Duration, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runtime,
            period,
            sink,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts ticking. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.running.is_some() {
            return false;
        }
        let token = CancellationToken::new();
        let task = self.runtime.spawn(run(
            self.period,
            self.sink.clone(),
            token.clone(),
        ));
        self.running = Some(Running { token, task });
        console_info!("Simulation started ({:?} per stage)", self.period);
        true
    }

    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.token.cancel();
            running.task.abort();
            console_info!("Simulation stopped");
        }
    }
}

impl Drop for SimulationTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(period: Duration, sink: Arc<dyn EventSink>, token: CancellationToken) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                tick += 1;
                console_trace!("Simulation tick {}", tick);
                sink.emit(EngineEvent::SimulationTick { tick });
            }
        }
    }
}
