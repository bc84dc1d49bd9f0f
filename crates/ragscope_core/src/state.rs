use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::scenario::ScenarioState;
use crate::timeline::{LogTimeline, MessageTimeline, StepKind, Timestamp, ValidationError};
use crate::view_model::{AppViewModel, GraphView};

pub type RequestId = u64;

pub const UPLOAD_PROMPT: &str = "Upload PDF Context";
pub const UPLOAD_SUCCEEDED: &str = "Vector Store Created.";
pub const UPLOAD_FAILED: &str = "Upload Failed.";

pub fn processing_line(file_name: &str) -> String {
    format!("Processing {file_name}…")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Builds a selection from a path, naming it after the final component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Detached,
    Mounted,
    TornDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    lifecycle: Lifecycle,
    input: String,
    logs: LogTimeline,
    messages: MessageTimeline,
    upload: UploadState,
    scenario: ScenarioState,
    outstanding: BTreeSet<RequestId>,
    next_request_id: RequestId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::Detached,
            input: String::new(),
            logs: LogTimeline::new(),
            messages: MessageTimeline::with_greeting(),
            upload: UploadState::default(),
            scenario: ScenarioState::new(),
            outstanding: BTreeSet::new(),
            next_request_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            lifecycle: self.lifecycle,
            input: self.input.clone(),
            logs: self.logs.entries().to_vec(),
            log_scroll: self.logs.scroll(),
            messages: self.messages.messages().to_vec(),
            message_scroll: self.messages.scroll(),
            loading: self.is_loading(),
            upload_label: self
                .upload
                .file_name
                .clone()
                .unwrap_or_else(|| UPLOAD_PROMPT.to_string()),
            graph: GraphView::from_state(&self.scenario),
            dirty: self.dirty,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn logs(&self) -> &LogTimeline {
        &self.logs
    }

    pub fn messages(&self) -> &MessageTimeline {
        &self.messages
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn scenario(&self) -> &ScenarioState {
        &self.scenario
    }

    /// True while at least one query is awaiting its response.
    pub fn is_loading(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
        self.mark_dirty();
    }

    pub(crate) fn set_input(&mut self, text: String) {
        self.input = text;
        self.mark_dirty();
    }

    /// Moves the current input into the message timeline and allocates a
    /// request id for it.
    pub(crate) fn submit_input(&mut self) -> Result<(RequestId, String), ValidationError> {
        self.messages.submit(&self.input)?;
        let text = std::mem::take(&mut self.input);
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.outstanding.insert(request_id);
        self.mark_dirty();
        Ok((request_id, text))
    }

    /// Clears an outstanding request. Returns false if the id was not pending.
    pub(crate) fn finish_request(&mut self, request_id: RequestId) -> bool {
        let was_pending = self.outstanding.remove(&request_id);
        if was_pending {
            self.mark_dirty();
        }
        was_pending
    }

    pub(crate) fn messages_mut(&mut self) -> &mut MessageTimeline {
        self.mark_dirty();
        &mut self.messages
    }

    pub(crate) fn select_file(&mut self, file_name: &str, at: Timestamp) {
        self.upload.file_name = Some(file_name.to_string());
        self.logs.append(StepKind::Info, processing_line(file_name), at);
        self.mark_dirty();
    }

    pub(crate) fn append_log(&mut self, kind: StepKind, text: impl Into<String>, at: Timestamp) {
        self.logs.append(kind, text, at);
        self.mark_dirty();
    }

    pub(crate) fn advance_scenario(&mut self) {
        self.scenario.advance();
        self.mark_dirty();
    }
}
