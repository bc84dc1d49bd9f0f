//! Staggered reveal of pipeline steps.
//!
//! Each call to [`RevealScheduler::schedule`] creates one [`RevealBatch`]: one
//! timer per step, at offsets `0, Δ, 2Δ, …` from the call. Batches are not
//! coalesced, so overlapping batches interleave by firing time.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use console_logging::{console_debug, console_info};

use crate::sink::EventSink;
use crate::{BatchId, EngineEvent};

/// Timers created by one `schedule` call; cancelled together.
pub(crate) struct RevealBatch {
    id: BatchId,
    token: CancellationToken,
    timers: Vec<JoinHandle<()>>,
}

impl RevealBatch {
    fn is_finished(&self) -> bool {
        self.timers.iter().all(JoinHandle::is_finished)
    }

    fn cancel(&self) {
        if !self.is_finished() {
            console_debug!("Cancelling reveal batch {}", self.id);
        }
        self.token.cancel();
        for timer in &self.timers {
            timer.abort();
        }
    }
}

pub struct RevealScheduler {
    runtime: Handle,
    interval: Duration,
    sink: Arc<dyn EventSink>,
    batches: Vec<RevealBatch>,
    next_batch: BatchId,
}

impl RevealScheduler {
    pub fn new(runtime: Handle, interval: Duration, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runtime,
            interval,
            sink,
            batches: Vec::new(),
            next_batch: 1,
        }
    }

    /// Schedules one reveal per step, in order, `interval` apart, starting now.
    pub fn schedule(&mut self, steps: Vec<String>) -> BatchId {
        self.batches.retain(|batch| !batch.is_finished());

        let id = self.next_batch;
        self.next_batch += 1;
        let token = CancellationToken::new();
        let start = Instant::now();
        let count = steps.len();

        let timers = steps
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let token = token.clone();
                let sink = self.sink.clone();
                let deadline = start + self.interval * index as u32;
                self.runtime.spawn(async move {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {}
                        _ = sleep_until(deadline) => {
                            if !token.is_cancelled() {
                                sink.emit(EngineEvent::StepRevealed {
                                    batch_id: id,
                                    index,
                                    text,
                                    at: Utc::now(),
                                });
                            }
                        }
                    }
                })
            })
            .collect();

        console_debug!("Scheduled reveal batch {} with {} steps", id, count);
        self.batches.push(RevealBatch { id, token, timers });
        id
    }

    /// Batches that still have at least one timer outstanding.
    pub fn pending_batches(&self) -> usize {
        self.batches
            .iter()
            .filter(|batch| !batch.is_finished())
            .count()
    }

    pub fn cancel_all(&mut self) {
        let pending = self.pending_batches();
        for batch in self.batches.drain(..) {
            batch.cancel();
        }
        if pending > 0 {
            console_info!("Cancelled {} pending reveal batches", pending);
        }
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
