use crate::{RequestId, SelectedFile, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view became visible.
    Mounted,
    /// The view is going away; nothing may touch its timelines afterwards.
    Unmounted,
    /// User edited the chat input.
    InputChanged(String),
    /// User submitted the current chat input.
    MessageSubmitted,
    /// User picked a document to upload.
    FileSelected { file: SelectedFile, at: Timestamp },
    /// The pipeline accepted the upload.
    UploadSucceeded { at: Timestamp },
    /// The upload was rejected or never reached the pipeline.
    UploadFailed { at: Timestamp },
    /// The pipeline answered a query.
    QueryResolved {
        request_id: RequestId,
        answer: String,
        steps: Vec<String>,
    },
    /// A query failed: transport error, non-2xx, or malformed body.
    QueryFailed { request_id: RequestId },
    /// A scheduled step reveal fired.
    StepRevealed { text: String, at: Timestamp },
    /// Simulator interval elapsed.
    SimulationTick,
    /// UI/render tick to coalesce rendering.
    Tick,
    NoOp,
}
