use crate::{RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Begin ticking the graph simulator.
    StartSimulation,
    /// Send the selected document to the pipeline.
    Upload { file: SelectedFile },
    /// Send a chat query to the pipeline.
    Query { request_id: RequestId, text: String },
    /// Reveal each step in order, one reveal interval apart.
    RevealSteps { steps: Vec<String> },
    /// Cancel every pending reveal and stop the simulator.
    Teardown,
}
