use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use newsfeed_core::FetchTicket;
use newsfeed_logging::{news_error, news_info, news_warn};

use crate::connectivity::{watch, ConnectivityProbe};
use crate::source::{fetch_context, FeedSource};
use crate::{EngineEvent, FailureKind, SourceError};

enum EngineCommand {
    Fetch(FetchTicket),
}

/// Runs feed source calls on a background runtime and reports results as events.
///
/// The engine never decides whether a fetch is allowed; it executes every ticket
/// it is given and reports exactly one `FetchCompleted` per accepted ticket,
/// including when the source panics or the runtime cannot start.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self::spawn(source, None)
    }

    /// Also watches connectivity, starting from the state observed at startup.
    pub fn with_connectivity(
        source: Arc<dyn FeedSource>,
        probe: ConnectivityProbe,
        initially_online: bool,
    ) -> Self {
        Self::spawn(source, Some((probe, initially_online)))
    }

    fn spawn(source: Arc<dyn FeedSource>, probe: Option<(ConnectivityProbe, bool)>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    news_error!("Failed to start engine runtime: {}", err);
                    let reason = format!("engine runtime unavailable: {err}");
                    // Every ticket still settles, as a failure.
                    while let Ok(EngineCommand::Fetch(ticket)) = cmd_rx.recv() {
                        let failure = SourceError::new(FailureKind::Network, reason.clone());
                        if event_tx
                            .send(EngineEvent::FetchCompleted {
                                request_id: ticket.request_id,
                                result: Err(failure),
                            })
                            .is_err()
                        {
                            return;
                        }
                    }
                    return;
                }
            };
            if let Some((probe, initially_online)) = probe {
                runtime.spawn(watch(probe, initially_online, event_tx.clone()));
            }
            while let Ok(command) = cmd_rx.recv() {
                let source = source.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(source.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Hands a ticket to the engine. Fails when the engine thread is gone, in
    /// which case no `FetchCompleted` will ever arrive for it.
    pub fn fetch(&self, ticket: FetchTicket) -> Result<(), SourceError> {
        let request_id = ticket.request_id;
        self.cmd_tx
            .send(EngineCommand::Fetch(ticket))
            .map_err(|_| {
                news_error!("Engine stopped; request {} was not dispatched", request_id);
                SourceError::new(FailureKind::Network, "engine stopped")
            })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    source: &dyn FeedSource,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch(ticket) => {
            let result = AssertUnwindSafe(fetch_context(source, &ticket.context))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    news_error!("Request {} panicked in the feed source", ticket.request_id);
                    Err(SourceError::new(FailureKind::Network, "feed source panicked"))
                });
            match &result {
                Ok(page) => news_info!(
                    "Request {} returned {} articles (total {:?})",
                    ticket.request_id,
                    page.articles.len(),
                    page.total_count
                ),
                Err(err) => news_warn!("Request {} failed: {}", ticket.request_id, err),
            }
            let _ = event_tx.send(EngineEvent::FetchCompleted {
                request_id: ticket.request_id,
                result,
            });
        }
    }
}
