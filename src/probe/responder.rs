//! Load Responder
//!
//! Runs on every storage node and answers `LoadMessage::Query` datagrams with the node's
//! current load averages.

use super::types::{HostLoad, LoadMessage};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// Where the responder reads the load it reports.
pub trait LoadSource: Send + Sync {
    fn current_load(&self) -> Result<HostLoad>;
}

/// Reads `/proc/loadavg`.
pub struct ProcLoadAvg;

impl LoadSource for ProcLoadAvg {
    fn current_load(&self) -> Result<HostLoad> {
        let contents =
            std::fs::read_to_string("/proc/loadavg").context("failed to read /proc/loadavg")?;
        parse_loadavg(&contents)
    }
}

/// Always reports the same load.
pub struct FixedLoad(pub HostLoad);

impl LoadSource for FixedLoad {
    fn current_load(&self) -> Result<HostLoad> {
        Ok(self.0)
    }
}

/// Parses the first three fields of `/proc/loadavg`, e.g. `0.42 0.30 0.25 1/512 4242`.
pub fn parse_loadavg(contents: &str) -> Result<HostLoad> {
    let mut fields = contents.split_whitespace();
    let mut next = |window: &str| -> Result<f32> {
        fields
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing {} load average", window))?
            .parse::<f32>()
            .with_context(|| format!("malformed {} load average", window))
    };

    Ok(HostLoad {
        loadavg_1min: next("1min")?,
        loadavg_5min: next("5min")?,
        loadavg_15min: next("15min")?,
    })
}

pub struct LoadResponder {
    socket: Arc<UdpSocket>,
    source: Arc<dyn LoadSource>,
}

impl LoadResponder {
    pub async fn bind(bind_addr: SocketAddr, source: Arc<dyn LoadSource>) -> Result<Arc<Self>> {
        let socket = UdpSocket::bind(bind_addr).await?;

        Ok(Arc::new(Self {
            socket: Arc::new(socket),
            source,
        }))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Spawns the receive loop and returns its handle.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tracing::info!("Starting load responder...");

        tokio::spawn(async move {
            self.receive_loop().await;
        })
    }

    async fn receive_loop(self: Arc<Self>) {
        let mut buf = vec![0u8; 512];

        loop {
            let (len, src) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    tracing::error!("Load agent socket receive failed: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    continue;
                }
            };

            let msg = match bincode::deserialize::<LoadMessage>(&buf[..len]) {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("Dropping malformed load datagram from {}: {}", src, e);
                    continue;
                }
            };

            if let Err(e) = self.handle_message(msg, src).await {
                tracing::error!("Load agent failed to answer {}: {:#}", src, e);
            }
        }
    }

    async fn handle_message(&self, msg: LoadMessage, src: SocketAddr) -> Result<()> {
        match msg {
            LoadMessage::Query { nonce } => {
                let load = self.source.current_load()?;
                let reply = bincode::serialize(&LoadMessage::Reply { nonce, load })?;
                self.socket.send_to(&reply, src).await?;

                tracing::debug!(
                    "Answered load query from {} (load={:.2})",
                    src,
                    load.loadavg_1min
                );
            }

            LoadMessage::Reply { .. } => {
                tracing::debug!("Unexpected load reply from {}", src);
            }
        }

        Ok(())
    }
}
