use serde::{Deserialize, Serialize};

/// System load averages reported by a storage node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HostLoad {
    pub loadavg_1min: f32,
    pub loadavg_5min: f32,
    pub loadavg_15min: f32,
}

impl HostLoad {
    /// Same value for all three windows.
    pub fn flat(load: f32) -> Self {
        Self {
            loadavg_1min: load,
            loadavg_5min: load,
            loadavg_15min: load,
        }
    }
}

/// The wire protocol between the scheduler and load responders.
///
/// - `Query`: Asks for the current load; `nonce` pairs the reply with its request.
/// - `Reply`: Carries the load back, echoing the nonce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadMessage {
    Query { nonce: u64 },

    Reply { nonce: u64, load: HostLoad },
}
