use std::ops::Range;

use chrono::{DateTime, Utc};

pub type Timestamp = DateTime<Utc>;

/// Shown as the first assistant turn of every session.
pub const GREETING: &str = "Ready. Upload a document or ask me anything.";
/// Assistant reply appended when a query fails for any reason.
pub const SERVER_ERROR_REPLY: &str = "Server Error.";
/// Rendered in place of the log pane while it is empty.
pub const LOG_PLACEHOLDER: &str = "...waiting for input...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Info,
    Success,
    Error,
    Router,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEvent {
    pub kind: StepKind,
    pub text: String,
    pub revealed_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("message is empty")]
    EmptyMessage,
}

/// Scroll position of a single pane.
///
/// Each timeline owns one of these; appending moves it to the newest entry.
/// Nothing in the view model scrolls the surrounding page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollAnchor {
    pub bottom: Option<usize>,
}

impl ScrollAnchor {
    fn follow(&mut self, index: usize) {
        self.bottom = Some(index);
    }

    /// Entries visible in a pane `height` rows tall, ending at the anchor.
    pub fn visible_range(&self, height: usize) -> Range<usize> {
        match self.bottom {
            Some(bottom) => {
                let end = bottom + 1;
                end.saturating_sub(height)..end
            }
            None => 0..0,
        }
    }
}

/// Append-only trace of revealed pipeline steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogTimeline {
    entries: Vec<StepEvent>,
    scroll: ScrollAnchor,
}

impl LogTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. A timestamp earlier than the previous entry's is
    /// clamped so insertion order and time order agree.
    pub fn append(&mut self, kind: StepKind, text: impl Into<String>, at: Timestamp) {
        let revealed_at = match self.entries.last() {
            Some(last) if last.revealed_at > at => last.revealed_at,
            _ => at,
        };
        self.entries.push(StepEvent {
            kind,
            text: text.into(),
            revealed_at,
        });
        self.scroll.follow(self.entries.len() - 1);
    }

    pub fn entries(&self) -> &[StepEvent] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll(&self) -> ScrollAnchor {
        self.scroll
    }
}

/// Append-only conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
    scroll: ScrollAnchor,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greeting() -> Self {
        let mut timeline = Self::new();
        timeline.push(Message::assistant(GREETING));
        timeline
    }

    /// Appends the user's turn. Whitespace-only text is rejected and leaves
    /// the timeline untouched.
    pub fn submit(&mut self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        self.push(Message::user(text));
        Ok(())
    }

    pub fn on_resolved(&mut self, answer: impl Into<String>) {
        self.push(Message::assistant(answer));
    }

    pub fn on_failed(&mut self) {
        self.push(Message::assistant(SERVER_ERROR_REPLY));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn scroll(&self) -> ScrollAnchor {
        self.scroll
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll.follow(self.messages.len() - 1);
    }
}
