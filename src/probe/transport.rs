//! Load Query Transport
//!
//! `LoadProbeTransport` is the seam between the scheduler and the network. The UDP
//! implementation bounds every query by `ProbeConfig::timeout` per attempt, so a silent
//! host can never stall a search.

use super::types::{HostLoad, LoadMessage};
use crate::config::ProbeConfig;

use anyhow::Result;
use async_trait::async_trait;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

const MAX_DATAGRAM: usize = 512;

#[async_trait]
pub trait LoadProbeTransport: Send + Sync {
    /// Current load of the node whose responder listens on `addr`.
    ///
    /// Must resolve within a bounded time; non-response is reported as an error.
    async fn query(&self, addr: SocketAddr) -> Result<HostLoad>;
}

pub struct UdpLoadTransport {
    config: ProbeConfig,
}

impl UdpLoadTransport {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    async fn await_reply(socket: &UdpSocket, nonce: u64) -> Result<HostLoad> {
        let mut buf = vec![0u8; MAX_DATAGRAM];

        loop {
            let len = socket.recv(&mut buf).await?;
            match bincode::deserialize::<LoadMessage>(&buf[..len]) {
                Ok(LoadMessage::Reply { nonce: echoed, load }) if echoed == nonce => {
                    return Ok(load);
                }
                Ok(other) => {
                    tracing::trace!("Ignoring unexpected load message {:?}", other);
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize load reply: {}", e);
                }
            }
        }
    }
}

impl Default for UdpLoadTransport {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

#[async_trait]
impl LoadProbeTransport for UdpLoadTransport {
    async fn query(&self, addr: SocketAddr) -> Result<HostLoad> {
        let local: SocketAddr = if addr.is_ipv4() {
            "0.0.0.0:0".parse()?
        } else {
            "[::]:0".parse()?
        };

        let socket = UdpSocket::bind(local).await?;
        // A connected socket only delivers datagrams coming from `addr`.
        socket.connect(addr).await?;

        let nonce: u64 = rand::random();
        let request = bincode::serialize(&LoadMessage::Query { nonce })?;
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            socket.send(&request).await?;

            match tokio::time::timeout(self.config.timeout, Self::await_reply(&socket, nonce)).await
            {
                Ok(reply) => return reply,
                Err(_) => {
                    tracing::debug!(
                        "Load query to {} timed out (attempt {}/{})",
                        addr,
                        attempt,
                        attempts
                    );
                }
            }
        }

        Err(anyhow::anyhow!(
            "no load reply from {} after {} attempts",
            addr,
            attempts
        ))
    }
}
