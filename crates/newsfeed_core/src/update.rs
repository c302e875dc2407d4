use newsfeed_logging::news_debug;

use crate::{AppState, Effect, Msg, Settlement, Transition, OFFLINE_MESSAGE};

/// Pure update function: applies a message to state and returns any effects.
///
/// Display effects come first in emission order; a fetch effect, if any, is last.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let before = state.view();

    let ticket = match msg {
        Msg::Startup { online } => {
            if state.started {
                news_debug!("Ignoring repeated startup");
                None
            } else {
                state.started = true;
                if let Some(Transition::StartedOffline) = state.connectivity.initialize(online) {
                    state.presenter.on_error(OFFLINE_MESSAGE, false);
                }
                if online {
                    state.controller.start()
                } else {
                    None
                }
            }
        }
        Msg::ConfigurationInvalid(message) => {
            state.controller.halt();
            state.presenter.on_error(message, true);
            None
        }
        Msg::CategorySelected(category) => state.controller.select_category(&category),
        Msg::SearchSubmitted(text) => state.controller.submit_search(&text),
        Msg::ScrolledNearEnd => state.controller.request_more(),
        Msg::ConnectivityChanged { online } => match state.connectivity.observe(online) {
            Some(Transition::WentOnline) => state.controller.retry_after_reconnect(),
            Some(Transition::WentOffline) => {
                state.presenter.on_error(OFFLINE_MESSAGE, false);
                None
            }
            Some(Transition::StartedOffline) | None => None,
        },
        Msg::FetchCompleted { request_id, result } => {
            if let Some(settlement) = state.controller.settle(request_id, result) {
                match settlement {
                    Settlement::PageReady { articles, append } => {
                        state.presenter.on_page_ready(articles, append);
                    }
                    Settlement::Failed { message, critical } => {
                        state.presenter.on_error(message, critical);
                    }
                }
                state.presenter.on_fetch_settled();
            }
            None
        }
    };

    if let Some(ticket) = &ticket {
        state.presenter.on_fetch_started(ticket.append);
    }

    let mut effects: Vec<Effect> = state
        .presenter
        .take_commands()
        .into_iter()
        .map(Effect::Display)
        .collect();
    if let Some(ticket) = ticket {
        effects.push(Effect::Fetch(ticket));
    }

    if !effects.is_empty() || state.view() != before {
        state.mark_dirty();
    }

    (state, effects)
}
