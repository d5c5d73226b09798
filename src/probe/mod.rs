//! Load Probe Module
//!
//! The request/response exchange used to measure how busy a storage node is.
//!
//! ## Overview
//! Before choosing hosts, the scheduler asks each candidate for its load average over UDP.
//! A node that does not answer within the transport's deadline is treated as unavailable.
//!
//! ## Submodules
//! - **`types`**: Wire messages (bincode encoded) and the load triple.
//! - **`transport`**: The `LoadProbeTransport` seam and its UDP implementation.
//! - **`responder`**: The storage-node side that answers load queries.

pub mod responder;
pub mod transport;
pub mod types;
