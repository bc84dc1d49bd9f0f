use std::sync::mpsc;

use crate::EngineEvent;

/// Destination for everything the engine produces: request outcomes, step
/// reveals and simulator ticks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        // The receiver goes away when the view is torn down; late events are dropped.
        let _ = self.tx.send(event);
    }
}
