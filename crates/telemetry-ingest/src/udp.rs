//! Datagram producer.
//!
//! One tokio task per socket: receive a datagram, ingest it, repeat. Decode
//! errors are logged and counted; only shutdown ends the loop.
//!
//! The receive buffer is one byte longer than `max_datagram`. A datagram
//! that fills it was possibly cut by the OS, so it is dropped and counted as
//! a decode error rather than handed to frame recovery.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use trackside_errors::prelude::*;
use trackside_telemetry_frame::LayoutPolicy;
use trackside_telemetry_state::{
    IngestCounters, IngestObserver, TelemetryAggregator, ingest_buffer_with,
};
use tracing::{debug, info, trace, warn};

use crate::config::UdpConfig;

/// Builder for a UDP ingestion task.
#[derive(Debug, Clone)]
pub struct UdpIngest {
    config: UdpConfig,
    policy: LayoutPolicy,
    aggregator: Arc<TelemetryAggregator>,
    counters: Arc<IngestCounters>,
}

impl UdpIngest {
    /// Producer feeding `aggregator` with automatic layout detection.
    pub fn new(aggregator: Arc<TelemetryAggregator>, config: UdpConfig) -> Self {
        Self {
            config,
            policy: LayoutPolicy::Auto,
            aggregator,
            counters: Arc::new(IngestCounters::new()),
        }
    }

    /// Use a fixed layout policy.
    pub fn with_layout(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Share counters with other producers.
    pub fn with_counters(mut self, counters: Arc<IngestCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Bind the socket and start receiving.
    ///
    /// # Errors
    ///
    /// Fails if the socket cannot be bound.
    pub async fn spawn(self) -> Result<UdpIngestHandle> {
        let socket = UdpSocket::bind(self.config.bind).await.context(
            ErrorContext::new("bind telemetry socket").with("addr", self.config.bind.to_string()),
        )?;
        let local_addr = socket.local_addr()?;
        info!(%local_addr, layout = %self.policy, "Telemetry UDP listener bound");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let counters = Arc::clone(&self.counters);
        let task = tokio::spawn(receive_loop(socket, self, shutdown_rx));

        Ok(UdpIngestHandle {
            local_addr,
            counters,
            shutdown: shutdown_tx,
            task,
        })
    }
}

async fn receive_loop(socket: UdpSocket, ingest: UdpIngest, mut shutdown: watch::Receiver<bool>) {
    let timeout = ingest.config.recv_timeout();
    let limit = ingest.config.max_datagram;
    let mut buf = vec![0u8; limit.saturating_add(1)];

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            received = tokio::time::timeout(timeout, socket.recv_from(&mut buf)) => match received {
                Ok(Ok((len, peer))) => {
                    if len > limit {
                        let error = FrameError::Oversized { limit };
                        ingest.counters.on_buffer(len);
                        ingest.counters.on_decode_error(&error);
                        warn!(%peer, limit, "Dropped datagram: {error}");
                        continue;
                    }
                    let Some(datagram) = buf.get(..len) else {
                        continue;
                    };
                    let report = ingest_buffer_with(
                        &ingest.aggregator,
                        datagram,
                        ingest.policy,
                        ingest.counters.as_ref(),
                    );
                    match report.error {
                        Some(e) => debug!(
                            %peer,
                            frames = report.frames,
                            consumed = report.consumed,
                            "Datagram decode stopped early: {e}"
                        ),
                        None => trace!(%peer, frames = report.frames, "Datagram ingested"),
                    }
                }
                Ok(Err(e)) => warn!("Telemetry UDP receive error: {e}"),
                Err(_) => trace!("No telemetry received (timeout)"),
            }
        }
    }
    info!("Stopped telemetry UDP listener");
}

/// Running UDP ingestion task.
#[derive(Debug)]
pub struct UdpIngestHandle {
    local_addr: SocketAddr,
    counters: Arc<IngestCounters>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl UdpIngestHandle {
    /// Address the socket is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Counters fed by this producer.
    pub fn counters(&self) -> &Arc<IngestCounters> {
        &self.counters
    }

    /// Whether the receive task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal shutdown and wait for the task to exit.
    ///
    /// # Errors
    ///
    /// Fails if the task panicked.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.send_replace(true);
        self.task
            .await
            .map_err(|e| TracksideError::other(format!("telemetry UDP task failed: {e}")))
    }
}
