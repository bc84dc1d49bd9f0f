//! Ragscope core: pure state machine for the pipeline timelines and the
//! simulated graph, plus view-model helpers.
mod effect;
mod msg;
mod scenario;
mod state;
mod timeline;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use scenario::{Scenario, ScenarioState, Stage};
pub use state::{
    processing_line, AppState, Lifecycle, RequestId, SelectedFile, UploadState, UPLOAD_FAILED,
    UPLOAD_PROMPT, UPLOAD_SUCCEEDED,
};
pub use timeline::{
    LogTimeline, Message, MessageTimeline, Role, ScrollAnchor, StepEvent, StepKind, Timestamp,
    ValidationError, GREETING, LOG_PLACEHOLDER, SERVER_ERROR_REPLY,
};
pub use update::update;
pub use view_model::{AppViewModel, EdgeView, GraphView, NodeView};
