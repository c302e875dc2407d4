use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use newsfeed_core::{update, AppState, Effect, Msg};
use newsfeed_engine::{EngineHandle, GNewsSource};
use newsfeed_logging::{news_error, news_info, news_warn, parse_level, LevelFilter};

use super::config::{NewsConfig, API_KEY_ENV, DEFAULT_CONFIG_PATH};
use super::effects::EffectRunner;
use super::input::{parse_line, Input, HELP};
use super::logging::{self, LogDestination};
use super::render::TerminalView;

/// How long the dispatcher waits for input before polling the engine again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let loaded = NewsConfig::load(&config_path)
        .map(|config| config.with_api_key_override(std::env::var(API_KEY_ENV).ok()));

    let (destination, level) = match &loaded {
        Ok(config) => (
            LogDestination::from_file_flag(config.log_to_file),
            parse_level(&config.log_level).unwrap_or(LevelFilter::Info),
        ),
        Err(_) => (LogDestination::File, LevelFilter::Info),
    };
    logging::initialize(destination, level);

    let mut terminal = TerminalView::new(io::stdout().lock());

    let config = match loaded.and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => config,
        Err(err) => {
            news_error!("Configuration error: {}", err);
            // Shown as a critical error before any fetch is attempted.
            let msg = Msg::ConfigurationInvalid(err.to_string());
            let (state, effects) = update(AppState::new(), msg);
            let view = state.view();
            for effect in effects {
                if let Effect::Display(command) = effect {
                    terminal.apply(command, &view)?;
                }
            }
            return Ok(());
        }
    };

    let source = GNewsSource::new(config.source_settings()).context("building HTTP client")?;
    let source = Arc::new(source);
    let probe = config.probe();
    let online = probe.as_ref().map_or(true, |probe| probe.check_blocking());
    news_info!("Starting newsfeed: online={} page_size={}", online, config.page_size);

    let engine = match probe {
        Some(probe) => EngineHandle::with_connectivity(source, probe, online),
        None => EngineHandle::new(source),
    };

    let state = AppState::with_settings(
        config.default_category.clone(),
        config.page_size,
        config.escalation_policy(),
    );
    let mut dispatcher = Dispatcher {
        state,
        runner: EffectRunner::new(engine),
        terminal,
    };

    let input_rx = spawn_input_reader();
    dispatcher.terminal.notice("Type 'help' for commands.")?;
    dispatcher.dispatch(Msg::Startup { online })?;

    loop {
        for msg in dispatcher.runner.pending_messages() {
            dispatcher.dispatch(msg)?;
        }

        match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Input::Intent(msg)) => dispatcher.dispatch(msg)?,
            Ok(Input::Help) => dispatcher.terminal.notice(HELP)?,
            Ok(Input::Unknown(line)) => dispatcher
                .terminal
                .notice(&format!("Unknown command: {line} (try 'help')"))?,
            Ok(Input::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    if dispatcher.terminal.is_loading() {
        news_warn!("Exiting with a fetch still in flight");
    }
    news_info!("Newsfeed stopped");
    Ok(())
}

/// Single dispatcher: every message is applied to the state here, one at a time.
struct Dispatcher<W: Write> {
    state: AppState,
    runner: EffectRunner,
    terminal: TerminalView<W>,
}

impl<W: Write> Dispatcher<W> {
    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;

        self.runner.run(effects, &mut self.terminal, &view)?;
        if was_dirty && !view.in_flight {
            self.terminal.status(&view)?;
        }
        Ok(())
    }
}

fn spawn_input_reader() -> mpsc::Receiver<Input> {
    let (input_tx, input_rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    news_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            if let Some(input) = parse_line(&line) {
                if input_tx.send(input).is_err() {
                    break;
                }
            }
        }
    });
    input_rx
}
