//! Distributed Filesystem Host Scheduling Library
//!
//! Decides which storage nodes of the filesystem serve a file fragment or run a program,
//! using live load probes and architecture, domain and group compatibility.
//!
//! ## Architecture Modules
//! - **`directory`**: Read-only views of the metadata server (hosts, programs, replicas)
//!   and an in-memory implementation of them.
//! - **`probe`**: The UDP load query protocol, its transport, and the responder every
//!   storage node runs.
//! - **`schedule`**: The scheduling engine: candidate sources, filters, bounded-concurrency
//!   probing, ranking, cyclic expansion, and the fragment/program schedulers.
//! - **`config`**: Tunables for scheduling and probing.

pub mod config;
pub mod directory;
pub mod probe;
pub mod schedule;
