use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{CarouselState, Effect, LoadStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: CarouselState, msg: Msg) -> (CarouselState, Vec<Effect>) {
    if state.is_disposed() {
        engine_debug!("Ignoring {:?} after teardown", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::ItemsLoaded(items) => {
            engine_info!("Loaded {} news items", items.len());
            state.load_items(items);
            state.set_load_status(LoadStatus::Ready);
            timer_for_state(&state)
        }
        Msg::LoadFailed(reason) => {
            engine_warn!("News source unavailable: {}", reason);
            state.load_items(Vec::new());
            state.set_load_status(LoadStatus::Failed(reason));
            vec![Effect::DisarmTimer]
        }
        Msg::NextClicked => {
            state.advance();
            Vec::new()
        }
        Msg::PrevClicked => {
            state.retreat();
            Vec::new()
        }
        Msg::DotClicked(index) => {
            if let Err(err) = state.go_to(index) {
                engine_warn!("Dot navigation rejected: {}", err);
            }
            Vec::new()
        }
        Msg::SlideClicked(index) => {
            if index == state.current_index() {
                state
                    .current_item()
                    .map(|item| {
                        vec![Effect::OpenPage {
                            url: item.page_url.clone(),
                        }]
                    })
                    .unwrap_or_default()
            } else {
                if let Err(err) = state.go_to(index) {
                    engine_warn!("Slide navigation rejected: {}", err);
                }
                Vec::new()
            }
        }
        Msg::TogglePauseClicked => {
            state.toggle_pause();
            if state.is_paused() {
                vec![Effect::DisarmTimer]
            } else {
                timer_for_state(&state)
            }
        }
        Msg::TimerFired => {
            if !state.is_paused() {
                state.advance();
            }
            Vec::new()
        }
        Msg::Teardown => {
            state.dispose();
            vec![Effect::DisarmTimer]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Arms the timer while running with items, disarms it otherwise.
fn timer_for_state(state: &CarouselState) -> Vec<Effect> {
    if state.is_paused() || state.items().is_empty() {
        vec![Effect::DisarmTimer]
    } else {
        vec![Effect::ArmTimer {
            interval: state.settings().auto_play_interval(),
        }]
    }
}
