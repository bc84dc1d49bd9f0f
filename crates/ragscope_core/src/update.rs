use console_logging::{console_debug, console_warn};

use crate::state::{UPLOAD_FAILED, UPLOAD_SUCCEEDED};
use crate::{AppState, Effect, Lifecycle, Msg, StepKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // After teardown the timelines are gone as far as the user is concerned;
    // late timer or network messages are dropped here.
    if state.lifecycle() == Lifecycle::TornDown {
        if !matches!(msg, Msg::Tick | Msg::NoOp) {
            console_debug!("Ignoring {:?} after teardown", msg);
        }
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.lifecycle() == Lifecycle::Mounted {
                return (state, Vec::new());
            }
            state.set_lifecycle(Lifecycle::Mounted);
            vec![Effect::StartSimulation]
        }
        Msg::Unmounted => {
            state.set_lifecycle(Lifecycle::TornDown);
            vec![Effect::Teardown]
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::MessageSubmitted => match state.submit_input() {
            Ok((request_id, text)) => vec![Effect::Query { request_id, text }],
            Err(err) => {
                console_debug!("Submit ignored: {}", err);
                Vec::new()
            }
        },
        Msg::FileSelected { file, at } => {
            state.select_file(&file.name, at);
            vec![Effect::Upload { file }]
        }
        Msg::UploadSucceeded { at } => {
            state.append_log(StepKind::Success, UPLOAD_SUCCEEDED, at);
            Vec::new()
        }
        Msg::UploadFailed { at } => {
            state.append_log(StepKind::Error, UPLOAD_FAILED, at);
            Vec::new()
        }
        Msg::QueryResolved {
            request_id,
            answer,
            steps,
        } => {
            if !state.finish_request(request_id) {
                console_warn!("Resolution for unknown request {} dropped", request_id);
                return (state, Vec::new());
            }
            state.messages_mut().on_resolved(answer);
            if steps.is_empty() {
                Vec::new()
            } else {
                vec![Effect::RevealSteps { steps }]
            }
        }
        Msg::QueryFailed { request_id } => {
            if !state.finish_request(request_id) {
                console_warn!("Failure for unknown request {} dropped", request_id);
                return (state, Vec::new());
            }
            state.messages_mut().on_failed();
            Vec::new()
        }
        Msg::StepRevealed { text, at } => {
            state.append_log(StepKind::Router, text, at);
            Vec::new()
        }
        Msg::SimulationTick => {
            state.advance_scenario();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
