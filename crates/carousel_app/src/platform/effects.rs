use std::sync::mpsc;

use carousel_core::{Effect, Msg};
use carousel_engine::EngineEvent;
use engine_logging::{engine_info, engine_warn};

use super::app::HostEvent;
use super::timer::AutoPlayTimer;

/// Executes core effects against the terminal host.
pub struct EffectRunner {
    events_tx: mpsc::Sender<HostEvent>,
    timer: Option<AutoPlayTimer>,
}

impl EffectRunner {
    pub fn new(events_tx: mpsc::Sender<HostEvent>) -> Self {
        Self {
            events_tx,
            timer: None,
        }
    }

    pub fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmTimer { interval } => {
                    // At most one timer runs; re-arming restarts the period.
                    self.disarm();
                    let events_tx = self.events_tx.clone();
                    self.timer = Some(AutoPlayTimer::start(interval, move || {
                        events_tx.send(HostEvent::Core(Msg::TimerFired)).is_ok()
                    }));
                }
                Effect::DisarmTimer => self.disarm(),
                Effect::OpenPage { url } => {
                    engine_info!("Opening {}", url);
                    println!("Öffnen: {url}");
                }
            }
        }
    }

    #[cfg(test)]
    fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

/// Translates an engine result into the message the core expects.
pub fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ItemsReady(items) => Msg::ItemsLoaded(items),
        EngineEvent::SourceUnavailable(err) => {
            engine_warn!("News source unavailable: {}", err);
            Msg::LoadFailed(err.user_message().to_string())
        }
    }
}
