use super::types::{HostDirectory, HostRecord};

use anyhow::Result;
use std::collections::HashMap;
use std::net::SocketAddr;

/// The host table frozen at the start of one scheduling call.
///
/// Later directory mutations are not reflected. Name lookups are case-insensitive,
/// matching how hostnames are compared everywhere else in the scheduler.
#[derive(Debug, Clone, Default)]
pub struct HostSnapshot {
    hosts: Vec<HostRecord>,
    addresses: HashMap<String, SocketAddr>,
}

impl HostSnapshot {
    pub async fn capture(directory: &dyn HostDirectory) -> Result<Self> {
        Ok(Self::from_records(directory.get_all().await?))
    }

    pub fn from_records(hosts: Vec<HostRecord>) -> Self {
        let addresses = hosts
            .iter()
            .map(|host| (host.name.to_ascii_lowercase(), host.address))
            .collect();

        Self { hosts, addresses }
    }

    pub fn hosts(&self) -> &[HostRecord] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Load-responder address of `hostname`, if the host is registered.
    pub fn resolve(&self, hostname: &str) -> Option<SocketAddr> {
        self.addresses.get(&hostname.to_ascii_lowercase()).copied()
    }
}
