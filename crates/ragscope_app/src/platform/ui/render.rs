//! Incremental terminal rendering.
//!
//! Each pane keeps its own cursor and follows its own scroll anchor, so a
//! new log line never reprints the conversation and vice versa.

use chrono::Local;
use ragscope_core::{
    AppViewModel, GraphView, Message, Role, Scenario, Stage, StepEvent, StepKind, LOG_PLACEHOLDER,
};

pub const BADGE: &str = "Adaptive RAG v1.0";

#[derive(Debug, Default)]
pub struct Renderer {
    logs_shown: usize,
    messages_shown: usize,
    placeholder_shown: bool,
    was_loading: bool,
    upload_label: Option<String>,
    graph: Option<(Scenario, Option<Stage>)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines to print for everything that changed since the previous call.
    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.logs.is_empty() && !self.placeholder_shown {
            lines.push(format!("log  │ {LOG_PLACEHOLDER}"));
            self.placeholder_shown = true;
        }
        if let Some(bottom) = view.log_scroll.bottom {
            for entry in view.logs.iter().take(bottom + 1).skip(self.logs_shown) {
                lines.push(format_log_line(entry));
            }
            self.logs_shown = self.logs_shown.max(bottom + 1);
        }

        if let Some(bottom) = view.message_scroll.bottom {
            for message in view.messages.iter().take(bottom + 1).skip(self.messages_shown) {
                lines.push(format_message(message));
            }
            self.messages_shown = self.messages_shown.max(bottom + 1);
        }

        if view.loading && !self.was_loading {
            lines.push("chat │ Thinking...".to_string());
        }
        self.was_loading = view.loading;

        if self.upload_label.as_deref() != Some(view.upload_label.as_str()) {
            lines.push(format!("file │ {}", view.upload_label));
            self.upload_label = Some(view.upload_label.clone());
        }

        let graph_key = (
            view.graph.scenario,
            view.graph.active_node().map(|node| node.stage),
        );
        if self.graph != Some(graph_key) && graph_key.1.is_some() {
            lines.push(format_graph(&view.graph));
        }
        self.graph = Some(graph_key);

        lines
    }
}

pub fn format_log_line(entry: &StepEvent) -> String {
    let marker = match entry.kind {
        StepKind::Info => "·",
        StepKind::Success => "✓",
        StepKind::Error => "✗",
        StepKind::Router => "›",
    };
    format!(
        "log  │ [{}] {} {}",
        entry.revealed_at.with_timezone(&Local).format("%H:%M:%S"),
        marker,
        entry.text
    )
}

fn format_message(message: &Message) -> String {
    match message.role {
        Role::User => format!("you  │ {}", message.content),
        Role::Assistant => format!("rag  │ {}", message.content),
    }
}

/// One line per transition: the badge, then the current scenario's path with
/// the active node bracketed and its outgoing edges drawn as `=>`.
pub fn format_graph(graph: &GraphView) -> String {
    let sequence = graph.scenario.sequence();
    let mut out = format!("graph│ {} │ ", graph.badge);
    for (i, stage) in sequence.iter().enumerate() {
        let node = graph.nodes.iter().find(|node| node.stage == *stage);
        match node {
            Some(node) if node.active => out.push_str(&format!("[{}]", node.label)),
            Some(node) => out.push_str(node.label),
            None => out.push_str(stage.label()),
        }
        if let Some(next) = sequence.get(i + 1) {
            let edge = graph
                .edges
                .iter()
                .find(|edge| edge.from == *stage && edge.to == *next);
            let arrow = match edge {
                Some(edge) if edge.animated => "=>",
                _ => "->",
            };
            match edge.and_then(|edge| edge.label) {
                Some(label) => out.push_str(&format!(" -{label}{arrow} ")),
                None => out.push_str(&format!(" {arrow} ")),
            }
        }
    }
    out
}
