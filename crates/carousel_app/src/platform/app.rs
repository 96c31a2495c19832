use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use carousel_core::{update, CarouselState, Msg};
use carousel_engine::{EngineHandle, NewsNormalizer, SharePointSource};
use engine_logging::{engine_debug, engine_info, LogDestination};
use log::LevelFilter;

use super::config::AppConfig;
use super::effects::{engine_event_to_msg, EffectRunner};
use super::render::render;
use crate::Args;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const HELP: &str = "n = weiter, p = zurück, 1-9 = springen, s/Leertaste = Pause, o = öffnen, r = neu laden, q = beenden";

pub enum HostEvent {
    Core(Msg),
    OpenCurrent,
    Refresh,
    Quit,
}

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let loaded = AppConfig::load(&args.config)
        .with_context(|| format!("loading configuration {:?}", args.config))?;
    let found_config = loaded.is_some();
    let config = loaded.unwrap_or_default().with_site_url(args.site_url);

    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(engine_logging::DEFAULT_LOG_FILE));
    let destination = if args.verbose {
        LogDestination::Both(log_file)
    } else {
        LogDestination::File(log_file)
    };
    engine_logging::initialize(destination, LevelFilter::Debug);
    if !found_config {
        engine_info!("No configuration at {:?}, using defaults", args.config);
    }

    let site_url = config.site_url()?.to_string();
    let view_all_url = config.view_all_url()?;
    let source = SharePointSource::new(&site_url, config.fetch_settings())?;
    let normalizer = NewsNormalizer::new(config.normalizer_settings()?);
    let engine = EngineHandle::new(Arc::new(source), normalizer)
        .context("starting the news engine")?;
    engine_info!("News carousel started for {}", site_url);

    let (events_tx, events_rx) = mpsc::channel::<HostEvent>();
    spawn_input_reader(events_tx.clone());
    let mut runner = EffectRunner::new(events_tx);
    let mut state = CarouselState::new(config.carousel.clone());

    println!("{HELP}");
    println!("{}", render(&state.view(), &view_all_url));
    engine.refresh();

    loop {
        while let Some(event) = engine.try_recv() {
            state = dispatch(state, engine_event_to_msg(event), &mut runner, &view_all_url);
        }
        match events_rx.recv_timeout(POLL_INTERVAL) {
            Ok(HostEvent::Core(msg)) => {
                state = dispatch(state, msg, &mut runner, &view_all_url);
            }
            Ok(HostEvent::OpenCurrent) => {
                let index = state.current_index();
                state = dispatch(state, Msg::SlideClicked(index), &mut runner, &view_all_url);
            }
            Ok(HostEvent::Refresh) => {
                engine_debug!("Refresh requested");
                engine.refresh();
            }
            Ok(HostEvent::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
    }

    dispatch(state, Msg::Teardown, &mut runner, &view_all_url);
    engine_info!("News carousel stopped");
    Ok(())
}

fn dispatch(
    state: CarouselState,
    msg: Msg,
    runner: &mut EffectRunner,
    view_all_url: &str,
) -> CarouselState {
    let (mut state, effects) = update(state, msg);
    runner.apply(effects);
    if state.consume_dirty() && !state.is_disposed() {
        println!("{}", render(&state.view(), view_all_url));
    }
    state
}

fn spawn_input_reader(events_tx: mpsc::Sender<HostEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(event) => {
                    if events_tx.send(event).is_err() {
                        return;
                    }
                }
                None => println!("{HELP}"),
            }
        }
        let _ = events_tx.send(HostEvent::Quit);
    });
}

/// Maps one input line to a host event. Slide numbers are one-based.
fn parse_command(line: &str) -> Option<HostEvent> {
    let command = line.trim();
    if command.is_empty() {
        return line.contains(' ').then_some(HostEvent::Core(Msg::TogglePauseClicked));
    }
    let event = match command.to_lowercase().as_str() {
        "n" => HostEvent::Core(Msg::NextClicked),
        "p" => HostEvent::Core(Msg::PrevClicked),
        "s" => HostEvent::Core(Msg::TogglePauseClicked),
        "o" => HostEvent::OpenCurrent,
        "r" => HostEvent::Refresh,
        "q" => HostEvent::Quit,
        number => {
            let slide: usize = number.parse().ok()?;
            HostEvent::Core(Msg::DotClicked(slide.checked_sub(1)?))
        }
    };
    Some(event)
}
