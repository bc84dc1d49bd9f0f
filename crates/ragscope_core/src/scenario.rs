//! Simulated walk through the adaptive RAG graph.
//!
//! The simulator alternates between the document-relevant path and the web
//! fallback path, one stage per tick, forever.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Retrieve,
    Grade,
    WebSearch,
    Generate,
    End,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Start,
        Stage::Retrieve,
        Stage::Grade,
        Stage::WebSearch,
        Stage::Generate,
        Stage::End,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Start => "START",
            Stage::Retrieve => "retrieve_node",
            Stage::Grade => "grade_docs",
            Stage::WebSearch => "web_search",
            Stage::Generate => "generate_node",
            Stage::End => "END",
        }
    }
}

const PDF_SEQUENCE: &[Stage] = &[
    Stage::Start,
    Stage::Retrieve,
    Stage::Grade,
    Stage::Generate,
    Stage::End,
];

const WEB_SEQUENCE: &[Stage] = &[
    Stage::Start,
    Stage::Retrieve,
    Stage::Grade,
    Stage::WebSearch,
    Stage::Generate,
    Stage::End,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Retrieved documents are relevant; the answer is generated from them.
    #[default]
    Pdf,
    /// Documents are graded irrelevant; the graph detours through web search.
    Web,
}

impl Scenario {
    pub fn sequence(self) -> &'static [Stage] {
        match self {
            Scenario::Pdf => PDF_SEQUENCE,
            Scenario::Web => WEB_SEQUENCE,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Scenario::Pdf => Scenario::Web,
            Scenario::Web => Scenario::Pdf,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Scenario::Pdf => "SIMULATION: DOC RELEVANT",
            Scenario::Web => "SIMULATION: WEB FALLBACK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScenarioState {
    scenario: Scenario,
    // Index into `scenario.sequence()`; `None` until the first tick.
    position: Option<usize>,
    flips: u64,
}

impl ScenarioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_with(scenario: Scenario) -> Self {
        Self {
            scenario,
            ..Self::default()
        }
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn active_stage(&self) -> Option<Stage> {
        self.position.map(|index| self.scenario.sequence()[index])
    }

    /// Number of times the scenario has switched since construction.
    pub fn flips(&self) -> u64 {
        self.flips
    }

    /// Moves to the next stage. After `End` the scenario flips and the walk
    /// restarts at `Start` of the other sequence.
    pub fn advance(&mut self) {
        let sequence = self.scenario.sequence();
        self.position = match self.position {
            None => Some(0),
            Some(index) if index + 1 < sequence.len() => Some(index + 1),
            Some(_) => {
                self.scenario = self.scenario.flipped();
                self.flips += 1;
                Some(0)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_has_no_active_stage() {
        let state = ScenarioState::new();
        assert_eq!(state.scenario(), Scenario::Pdf);
        assert_eq!(state.active_stage(), None);
    }

    #[test]
    fn active_stage_always_belongs_to_current_sequence() {
        let mut state = ScenarioState::new();
        for _ in 0..40 {
            state.advance();
            let stage = state.active_stage().expect("stage after tick");
            assert!(state.scenario().sequence().contains(&stage));
        }
    }

    #[test]
    fn web_search_only_visited_in_web_scenario() {
        let mut state = ScenarioState::new();
        let mut seen = Vec::new();
        for _ in 0..11 {
            state.advance();
            seen.push((state.scenario(), state.active_stage()));
        }
        let visits: Vec<_> = seen
            .iter()
            .filter(|(_, stage)| *stage == Some(Stage::WebSearch))
            .collect();
        assert_eq!(visits, vec![&(Scenario::Web, Some(Stage::WebSearch))]);
    }
}
