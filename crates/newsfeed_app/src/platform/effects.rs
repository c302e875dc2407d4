use std::io::{self, Write};

use newsfeed_core::{AppViewModel, Effect, FeedError, Msg};
use newsfeed_engine::{EngineEvent, EngineHandle};
use newsfeed_logging::{news_info, news_warn};

use super::render::TerminalView;

pub struct EffectRunner {
    engine: EngineHandle,
    /// Completions produced locally for tickets the engine never accepted.
    undelivered: Vec<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            undelivered: Vec::new(),
        }
    }

    /// Executes effects in order: display commands go to the terminal, fetches to the engine.
    pub fn run<W: Write>(
        &mut self,
        effects: Vec<Effect>,
        terminal: &mut TerminalView<W>,
        view: &AppViewModel,
    ) -> io::Result<()> {
        for effect in effects {
            match effect {
                Effect::Fetch(ticket) => {
                    news_info!(
                        "Fetch request_id={} mode={:?} page={} append={}",
                        ticket.request_id,
                        ticket.context.mode(),
                        ticket.context.page(),
                        ticket.append
                    );
                    let request_id = ticket.request_id;
                    if let Err(err) = self.engine.fetch(ticket) {
                        news_warn!("Request {} could not be dispatched: {}", request_id, err);
                        self.undelivered.push(map_event(EngineEvent::FetchCompleted {
                            request_id,
                            result: Err(err),
                        }));
                    }
                }
                Effect::Display(command) => terminal.apply(command, view)?,
            }
        }
        Ok(())
    }

    /// Drains engine events that are ready, translated into core messages.
    pub fn pending_messages(&mut self) -> Vec<Msg> {
        let mut inbox = std::mem::take(&mut self.undelivered);
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::FetchCompleted { request_id, result } => Msg::FetchCompleted {
            request_id,
            result: result.map_err(FeedError::from),
        },
        EngineEvent::ConnectivityChanged { online } => Msg::ConnectivityChanged { online },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsfeed_core::FeedPage;
    use newsfeed_engine::{FailureKind, SourceError};

    #[test]
    fn source_errors_become_transport_errors() {
        let msg = map_event(EngineEvent::FetchCompleted {
            request_id: 4,
            result: Err(SourceError::new(FailureKind::HttpStatus(500), "boom")),
        });
        assert_eq!(
            msg,
            Msg::FetchCompleted {
                request_id: 4,
                result: Err(FeedError::Transport("http status 500: boom".to_string())),
            }
        );

        let msg = map_event(EngineEvent::FetchCompleted {
            request_id: 5,
            result: Ok(FeedPage::empty()),
        });
        assert!(matches!(msg, Msg::FetchCompleted { request_id: 5, result: Ok(_) }));
    }

    #[test]
    fn undispatched_fetch_settles_as_transport_failure() {
        let msg = map_event(EngineEvent::FetchCompleted {
            request_id: 6,
            result: Err(SourceError::new(FailureKind::Network, "engine stopped")),
        });
        assert_eq!(
            msg,
            Msg::FetchCompleted {
                request_id: 6,
                result: Err(FeedError::Transport("network error: engine stopped".to_string())),
            }
        );
    }

    #[test]
    fn connectivity_events_pass_through() {
        assert_eq!(
            map_event(EngineEvent::ConnectivityChanged { online: false }),
            Msg::ConnectivityChanged { online: false }
        );
    }
}
