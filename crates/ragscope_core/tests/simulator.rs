use pretty_assertions::assert_eq;
use ragscope_core::{update, AppState, Msg, Scenario, ScenarioState, Stage};

fn tick(state: &mut ScenarioState, times: usize) {
    for _ in 0..times {
        state.advance();
    }
}

#[test]
fn first_tick_activates_start() {
    let mut state = ScenarioState::new();
    tick(&mut state, 1);
    assert_eq!(state.scenario(), Scenario::Pdf);
    assert_eq!(state.active_stage(), Some(Stage::Start));
}

#[test]
fn pdf_cycle_plus_one_tick_flips_to_web_start() {
    let mut state = ScenarioState::new();
    let cycle = Scenario::Pdf.sequence().len();
    tick(&mut state, cycle);
    assert_eq!(state.active_stage(), Some(Stage::End));
    assert_eq!(state.flips(), 0);

    tick(&mut state, 1);
    assert_eq!(state.flips(), 1);
    assert_eq!(state.scenario(), Scenario::Web);
    assert_eq!(state.active_stage(), Some(Stage::Start));
}

#[test]
fn web_cycle_plus_one_tick_flips_to_pdf_start() {
    let mut state = ScenarioState::starting_with(Scenario::Web);
    tick(&mut state, 6 + 1);

    assert_eq!(state.flips(), 1);
    assert_eq!(state.scenario(), Scenario::Pdf);
    assert_eq!(state.active_stage(), Some(Stage::Start));
}

#[test]
fn scenarios_alternate_forever() {
    let mut state = ScenarioState::new();
    let mut visited = Vec::new();
    for _ in 0..(5 + 6) * 3 {
        state.advance();
        visited.push(state.active_stage().unwrap());
    }

    let one_round: Vec<Stage> = Scenario::Pdf
        .sequence()
        .iter()
        .chain(Scenario::Web.sequence())
        .copied()
        .collect();
    assert_eq!(visited, one_round.repeat(3));
    assert_eq!(state.flips(), 5);
}

#[test]
fn graph_view_tracks_active_stage_and_keeps_all_edges() {
    let mut state = AppState::new();
    for _ in 0..3 {
        let (next, _) = update(state, Msg::SimulationTick);
        state = next;
    }

    let graph = state.view().graph;
    assert_eq!(graph.badge, "SIMULATION: DOC RELEVANT");
    assert_eq!(graph.active_node().map(|node| node.stage), Some(Stage::Grade));
    assert_eq!(graph.nodes.iter().filter(|node| node.active).count(), 1);

    assert_eq!(graph.edges.len(), 6);
    let labelled: Vec<_> = graph
        .edges
        .iter()
        .filter_map(|edge| edge.label.map(|label| (edge.to, label, edge.animated)))
        .collect();
    assert_eq!(
        labelled,
        vec![
            (Stage::WebSearch, "Irrelevant", true),
            (Stage::Generate, "Relevant", true),
        ]
    );
    assert!(graph
        .edges
        .iter()
        .filter(|edge| edge.from != Stage::Grade)
        .all(|edge| !edge.animated));
}

#[test]
fn graph_view_before_first_tick_has_nothing_active() {
    let graph = AppState::new().view().graph;
    assert!(graph.active_node().is_none());
    assert!(graph.edges.iter().all(|edge| !edge.animated));
    assert_eq!(graph.edges.len(), 6);
}
