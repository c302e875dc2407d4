use std::net::{TcpStream as StdTcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::time::Duration;

use newsfeed_logging::{news_debug, news_info};
use tokio::net::TcpStream;

use crate::EngineEvent;

/// Reachability check: the network counts as online when a TCP connection to
/// `host:port` succeeds within `timeout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityProbe {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub interval: Duration,
}

impl ConnectivityProbe {
    pub async fn check(&self) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), self.port));
        matches!(tokio::time::timeout(self.timeout, connect).await, Ok(Ok(_)))
    }

    /// Synchronous variant for use before any runtime exists.
    pub fn check_blocking(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(err) => {
                news_debug!("Cannot resolve {}: {}", self.host, err);
                return false;
            }
        };
        addrs
            .into_iter()
            .any(|addr| StdTcpStream::connect_timeout(&addr, self.timeout).is_ok())
    }
}

/// Probes periodically and reports every change of the observed state.
pub(crate) async fn watch(
    probe: ConnectivityProbe,
    initially_online: bool,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut online = initially_online;
    loop {
        tokio::time::sleep(probe.interval).await;
        let observed = probe.check().await;
        if observed == online {
            continue;
        }
        online = observed;
        news_info!("Connectivity changed: online={}", online);
        if event_tx
            .send(EngineEvent::ConnectivityChanged { online })
            .is_err()
        {
            return;
        }
    }
}
