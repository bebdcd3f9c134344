use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use reports_core::{update, AppState, Msg};
use reports_engine::{resolve_reference, EngineHandle};
use reports_logging::{report_info, report_warn};

use super::effects::EffectRunner;
use super::ui::commands::{self, Command, HELP};
use super::ui::render;
use crate::cli::Cli;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Input(String),
    InputClosed,
    Msg(Msg),
}

pub fn run_app(cli: &Cli) -> anyhow::Result<()> {
    let engine = EngineHandle::new(cli.engine_config()).context("starting report engine")?;
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(engine, event_tx.clone());
    spawn_input_reader(event_tx);

    let mut app = App {
        state: AppState::new(),
        effects,
        previews: PreviewLauncher::new(cli.base_url.clone(), cli.open_previews),
    };

    println!("{}", HELP);
    app.dispatch(Msg::Started);

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Input(line) => {
                if !app.handle_line(&line) {
                    break;
                }
            }
            AppEvent::InputClosed => break,
        }
    }

    report_info!("Shutting down");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if event_tx.send(AppEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

struct App {
    state: AppState,
    effects: EffectRunner,
    previews: PreviewLauncher,
}

impl App {
    /// Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(err) => {
                println!("{}", err);
                return true;
            }
        };

        match command {
            Command::Quit => return false,
            Command::Help => println!("{}", HELP),
            Command::Show => self.render(),
            command => match command.into_msg(&self.state.view()) {
                Ok(Some(msg)) => self.dispatch(msg),
                Ok(None) => {}
                Err(err) => println!("{}", err),
            },
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        if matches!(msg, Msg::GenerateClicked) {
            if let Err(reason) = self.state.can_generate() {
                println!("Cannot generate: {}", reason);
            }
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.run(effects);

        if self.state.consume_dirty() {
            self.render();
        }
    }

    fn render(&mut self) {
        let view = self.state.view();
        self.previews.sync(view.preview.as_deref());
        print!("{}", render::render(&view));
        print!("> ");
        let _ = io::stdout().flush();
    }
}

/// Prints the absolute address of a newly shown preview and, when enabled,
/// hands it to the system viewer.
struct PreviewLauncher {
    base_url: String,
    open: bool,
    shown: Option<String>,
}

impl PreviewLauncher {
    fn new(base_url: String, open: bool) -> Self {
        Self {
            base_url,
            open,
            shown: None,
        }
    }

    fn sync(&mut self, preview: Option<&str>) {
        if self.shown.as_deref() == preview {
            return;
        }
        self.shown = preview.map(ToOwned::to_owned);
        let Some(reference) = preview else {
            return;
        };

        let url = match resolve_reference(&self.base_url, reference) {
            Ok(url) => url,
            Err(err) => {
                report_warn!("Preview reference {} is unusable: {}", reference, err);
                return;
            }
        };
        println!("Preview URL: {}", url);
        if self.open {
            if let Err(err) = open::that(url.as_str()) {
                report_warn!("Could not open preview {}: {}", url, err);
            }
        }
    }
}
