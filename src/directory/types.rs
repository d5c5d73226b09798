use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// A registered storage node.
///
/// Owned by the host directory; the scheduler only reads snapshots of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostRecord {
    pub name: String,
    /// Binary architecture tag, e.g. `x86_64-linux`.
    pub architecture: String,
    /// Administrative grouping label used as an affinity hint.
    pub fsngroup: String,
    /// Address the node's load responder listens on.
    pub address: SocketAddr,
}

/// A stored replica of one file section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplicaCopyRecord {
    pub hostname: String,
}

/// One registered binary of a program, tagged by architecture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramSection {
    pub architecture: String,
}

/// Metadata entry of a path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathInfo {
    pub path: String,
    /// Set when the entry is registered as an executable program.
    pub is_program: bool,
}

#[async_trait]
pub trait HostDirectory: Send + Sync {
    /// Every registered storage node.
    async fn get_all(&self) -> Result<Vec<HostRecord>>;

    /// Canonical name of the node this process runs on.
    async fn self_canonical_name(&self) -> Result<String>;
}

#[async_trait]
pub trait ProgramRegistry: Send + Sync {
    /// Returns `Ok(None)` when no such object is registered.
    async fn path_info(&self, path: &str) -> Result<Option<PathInfo>>;

    /// Registered binary sections of the program at `path`.
    async fn sections(&self, path: &str) -> Result<Vec<ProgramSection>>;
}

#[async_trait]
pub trait ReplicaDirectory: Send + Sync {
    /// Replicas of `section` of the file at `path`. An empty list means none were ever stored.
    async fn copies(&self, path: &str, section: &str) -> Result<Vec<ReplicaCopyRecord>>;

    /// Number of fragments the file at `path` is split into.
    async fn fragment_count(&self, path: &str) -> Result<usize>;
}
