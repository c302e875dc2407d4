use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use newsfeed_core::{Article, FeedPage, FetchTicket, QueryContext, QueryMode};
use newsfeed_engine::{
    ConnectivityProbe, EngineEvent, EngineHandle, FailureKind, FeedSource, SourceError,
};
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct RecordingSource {
    calls: Mutex<Vec<(QueryMode, String, u32, u32)>>,
    fail: bool,
}

impl RecordingSource {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn respond(
        &self,
        mode: QueryMode,
        value: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((mode, value.to_string(), page, page_size));
        if self.fail {
            return Err(SourceError::new(FailureKind::HttpStatus(503), "unavailable"));
        }
        let article = Article {
            url: format!("https://news.example.com/{value}/{page}"),
            title: value.to_string(),
            ..Article::default()
        };
        Ok(FeedPage::new(vec![article], Some(42)))
    }
}

#[async_trait::async_trait]
impl FeedSource for RecordingSource {
    async fn fetch_category(
        &self,
        category: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError> {
        self.respond(QueryMode::Category, category, page, page_size)
    }

    async fn fetch_search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FeedPage, SourceError> {
        self.respond(QueryMode::FreeText, query, page, page_size)
    }
}

struct PanickingSource;

#[async_trait::async_trait]
impl FeedSource for PanickingSource {
    async fn fetch_category(&self, _: &str, _: u32, _: u32) -> Result<FeedPage, SourceError> {
        panic!("source blew up");
    }

    async fn fetch_search(&self, _: &str, _: u32, _: u32) -> Result<FeedPage, SourceError> {
        panic!("source blew up");
    }
}

fn ticket(request_id: u64, context: QueryContext) -> FetchTicket {
    FetchTicket {
        request_id,
        context,
        append: false,
    }
}

#[test]
fn fetch_routes_by_mode_and_reports_completion() {
    newsfeed_logging::initialize_for_tests();
    let source = Arc::new(RecordingSource::default());
    let engine = EngineHandle::new(source.clone());

    engine.fetch(ticket(7, QueryContext::search("mars", 10))).expect("engine running");
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::FetchCompleted { request_id, result }) => {
            assert_eq!(request_id, 7);
            let page = result.expect("page");
            assert_eq!(page.total_count, Some(42));
            assert_eq!(page.articles[0].title, "mars");
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.fetch(ticket(8, QueryContext::category("sports", 20))).expect("engine running");
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::FetchCompleted { request_id: 8, .. })
    ));

    let calls = source.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            (QueryMode::FreeText, "mars".to_string(), 1, 10),
            (QueryMode::Category, "sports".to_string(), 1, 20),
        ]
    );
}

#[test]
fn source_failure_is_reported_as_completion() {
    newsfeed_logging::initialize_for_tests();
    let engine = EngineHandle::new(Arc::new(RecordingSource::failing()));

    engine.fetch(ticket(3, QueryContext::category("general", 10))).expect("engine running");
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::FetchCompleted { request_id, result }) => {
            assert_eq!(request_id, 3);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn panicking_source_still_settles_the_ticket() {
    newsfeed_logging::initialize_for_tests();
    let engine = EngineHandle::new(Arc::new(PanickingSource));

    engine.fetch(ticket(1, QueryContext::category("general", 10))).expect("engine running");
    match engine.recv_timeout(WAIT) {
        Some(EngineEvent::FetchCompleted { request_id, result }) => {
            assert_eq!(request_id, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }

    // The engine keeps serving after a panicked task.
    engine.fetch(ticket(2, QueryContext::search("rust", 10))).expect("engine running");
    assert!(matches!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::FetchCompleted { request_id: 2, result: Err(_) })
    ));
}

#[test]
fn watcher_reports_lost_connectivity() {
    newsfeed_logging::initialize_for_tests();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let probe = ConnectivityProbe {
        host: "127.0.0.1".to_string(),
        port,
        timeout: Duration::from_millis(200),
        interval: Duration::from_millis(20),
    };

    let engine =
        EngineHandle::with_connectivity(Arc::new(RecordingSource::default()), probe, true);
    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::ConnectivityChanged { online: false })
    );
    assert_eq!(engine.try_recv(), None);
}
