//! Metadata Directory Module
//!
//! Read-only views of the metadata server that the scheduler consumes.
//!
//! ## Collaborators
//! - **`HostDirectory`**: Registered storage nodes (name, architecture, fsngroup, address)
//!   and the canonical name of the local node.
//! - **`ProgramRegistry`**: Path entries and the per-architecture binary sections of a program.
//! - **`ReplicaDirectory`**: Where the replicas of each file section live.
//!
//! The scheduler never locks or mutates a directory. Callers that need a consistent view
//! across a whole scheduling call must provide one; `HostSnapshot` freezes the host table
//! for the duration of a single call.
//!
//! ## Submodules
//! - **`types`**: Records and the collaborator traits.
//! - **`snapshot`**: Per-call name to address table.
//! - **`memory`**: A concurrent in-memory directory backing all three traits.
//! - **`url`**: Helpers for `dfs:` URLs.

pub mod memory;
pub mod snapshot;
pub mod types;
pub mod url;
