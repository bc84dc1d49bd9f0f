use crate::{Lifecycle, Message, Scenario, ScenarioState, ScrollAnchor, Stage, StepEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub lifecycle: Lifecycle,
    pub input: String,
    pub logs: Vec<StepEvent>,
    pub log_scroll: ScrollAnchor,
    pub messages: Vec<Message>,
    pub message_scroll: ScrollAnchor,
    pub loading: bool,
    pub upload_label: String,
    pub graph: GraphView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphView {
    pub scenario: Scenario,
    pub badge: &'static str,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub stage: Stage,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeView {
    pub from: Stage,
    pub to: Stage,
    pub label: Option<&'static str>,
    pub dashed: bool,
    /// Traversal animation; only set while `from` is the active stage.
    pub animated: bool,
}

struct EdgeSpec {
    from: Stage,
    to: Stage,
    label: Option<&'static str>,
    dashed: bool,
}

const EDGES: &[EdgeSpec] = &[
    EdgeSpec {
        from: Stage::Start,
        to: Stage::Retrieve,
        label: None,
        dashed: false,
    },
    EdgeSpec {
        from: Stage::Retrieve,
        to: Stage::Grade,
        label: None,
        dashed: false,
    },
    EdgeSpec {
        from: Stage::Grade,
        to: Stage::WebSearch,
        label: Some("Irrelevant"),
        dashed: true,
    },
    EdgeSpec {
        from: Stage::Grade,
        to: Stage::Generate,
        label: Some("Relevant"),
        dashed: false,
    },
    EdgeSpec {
        from: Stage::WebSearch,
        to: Stage::Generate,
        label: None,
        dashed: false,
    },
    EdgeSpec {
        from: Stage::Generate,
        to: Stage::End,
        label: None,
        dashed: false,
    },
];

impl GraphView {
    pub fn from_state(state: &ScenarioState) -> Self {
        let active = state.active_stage();
        let nodes = Stage::ALL
            .iter()
            .map(|&stage| NodeView {
                stage,
                label: stage.label(),
                active: active == Some(stage),
            })
            .collect();
        let edges = EDGES
            .iter()
            .map(|edge| EdgeView {
                from: edge.from,
                to: edge.to,
                label: edge.label,
                dashed: edge.dashed,
                animated: active == Some(edge.from),
            })
            .collect();
        Self {
            scenario: state.scenario(),
            badge: state.scenario().badge(),
            nodes,
            edges,
        }
    }

    pub fn active_node(&self) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.active)
    }
}
