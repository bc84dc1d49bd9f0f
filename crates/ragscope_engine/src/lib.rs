//! Ragscope engine: pipeline requests, step-reveal timers and the simulator
//! ticker, all running on a background tokio runtime.
mod client;
mod engine;
mod scheduler;
mod settings;
mod simulation;
mod sink;
mod types;

pub use client::{PipelineClient, ReqwestPipelineClient};
pub use engine::EngineHandle;
pub use scheduler::RevealScheduler;
pub use settings::{
    parse_base_url, ClientSettings, SettingsError, TimingSettings, API_URL_ENV, DEFAULT_API_URL,
};
pub use simulation::SimulationTicker;
pub use sink::{ChannelEventSink, EventSink};
pub use types::{BatchId, ChatReply, EngineEvent, FailureKind, RequestError, RequestId};
