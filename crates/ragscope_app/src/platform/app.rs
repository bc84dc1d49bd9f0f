use std::io::Write;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use console_logging::{console_debug, console_info};
use ragscope_core::{update, AppState, Lifecycle, Msg};
use ragscope_engine::{ClientSettings, EngineHandle, TimingSettings};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui;

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::from_env());

    let settings = ClientSettings::from_env().context("reading pipeline address")?;
    console_info!("Pipeline at {}", settings.base_url);
    let engine = EngineHandle::new(settings, TimingSettings::default())
        .context("building pipeline client")?;

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(engine, msg_tx.clone());
    effects.check_health();

    println!("{}", ui::render::BADGE);
    println!("{}", ui::input::HELP);
    ui::input::spawn_reader(msg_tx.clone());

    // Background tick to coalesce rendering of bursts of updates.
    let tick_tx = msg_tx.clone();
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while tick_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let _ = msg_tx.send(Msg::Mounted);
    drop(msg_tx);

    let mut app = App::new(effects);
    while let Ok(msg) = msg_rx.recv() {
        app.dispatch(msg);
        if app.state.lifecycle() == Lifecycle::TornDown {
            break;
        }
    }
    console_info!("View unmounted");
    Ok(())
}

struct App {
    state: AppState,
    effects: EffectRunner,
    renderer: ui::render::Renderer,
    needs_render: bool,
}

impl App {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer: ui::render::Renderer::new(),
            needs_render: true,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let is_tick = msg == Msg::Tick;
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.needs_render = true;
        }
        self.state = state;
        self.effects.enqueue(effects);

        // Render on the tick, or immediately once the view is gone so the
        // last lines are not lost.
        if self.needs_render && (is_tick || self.state.lifecycle() == Lifecycle::TornDown) {
            self.render();
        }
    }

    fn render(&mut self) {
        self.needs_render = false;
        let lines = self.renderer.render(&self.state.view());
        if lines.is_empty() {
            return;
        }
        console_debug!("Rendering {} lines", lines.len());
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    }
}
