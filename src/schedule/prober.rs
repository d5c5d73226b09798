//! Load Prober
//!
//! Queries candidate hosts for their load with bounded concurrency and stops dispatching
//! once enough idle or semi-idle hosts have answered.
//!
//! ## Dispatch Rules
//! - At most `concurrency` queries are outstanding at once.
//! - Answers already available are collected after every dispatch, so the stop condition
//!   reflects the latest responses.
//! - Queries dispatched before the stop condition is met are always awaited; nothing in
//!   flight is cancelled. Failed or timed out queries simply never count.

use super::candidates::CandidateProvider;
use super::error::{ScheduleError, ScheduleResult};
use super::filter::HostFilter;
use crate::directory::snapshot::HostSnapshot;
use crate::probe::transport::LoadProbeTransport;
use crate::probe::types::HostLoad;

use anyhow::Result;
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use std::net::SocketAddr;

/// A host that answered, with its 1-minute load average.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub hostname: String,
    pub load_average: f32,
}

/// Response counters of one probe round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    pub available: usize,
    pub idle: usize,
    pub semi_idle: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeLimits {
    pub concurrency: usize,
    /// Stop once this many semi-idle hosts answered.
    pub enough_semi_idle: usize,
    /// Stop once this many idle hosts answered.
    pub desired_idle: usize,
}

impl SearchState {
    fn is_enough(&self, limits: &ProbeLimits) -> bool {
        self.idle >= limits.desired_idle || self.semi_idle >= limits.enough_semi_idle
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub state: SearchState,
    /// Answers in arrival order.
    pub results: Vec<ProbeResult>,
}

pub struct LoadProber<'a> {
    transport: &'a dyn LoadProbeTransport,
    snapshot: &'a HostSnapshot,
    idle_load: f32,
    semi_idle_load: f32,
}

impl<'a> LoadProber<'a> {
    pub fn new(
        transport: &'a dyn LoadProbeTransport,
        snapshot: &'a HostSnapshot,
        idle_load: f32,
        semi_idle_load: f32,
    ) -> Self {
        Self {
            transport,
            snapshot,
            idle_load,
            semi_idle_load,
        }
    }

    /// Probes the candidates `filter` accepts.
    ///
    /// Fails with `NoHost` when the provider is empty or no host answered.
    pub async fn probe(
        &self,
        candidates: CandidateProvider<'_>,
        filter: &HostFilter,
        limits: ProbeLimits,
    ) -> ScheduleResult<ProbeOutcome> {
        if candidates.is_empty() {
            return Err(ScheduleError::NoHost);
        }

        let concurrency = limits.concurrency.max(1);
        let mut state = SearchState::default();
        let mut results = Vec::new();
        let mut in_flight = FuturesUnordered::new();
        let mut dispatched = 0usize;

        for hostname in candidates.iter() {
            if state.is_enough(&limits) {
                break;
            }

            if !filter.suitable(hostname) {
                tracing::trace!("Host {} rejected by filter", hostname);
                continue;
            }

            let Some(addr) = self.snapshot.resolve(hostname) else {
                tracing::debug!("Cannot resolve address of {}, skipping", hostname);
                continue;
            };

            while in_flight.len() >= concurrency {
                if let Some((host, response)) = in_flight.next().await {
                    self.record(host, response, &mut state, &mut results);
                }
            }
            // The answer that freed the slot may have met the threshold.
            if state.is_enough(&limits) {
                break;
            }

            tracing::debug!("Querying load of {} at {}", hostname, addr);
            in_flight.push(self.query(hostname, addr));
            dispatched += 1;

            while let Some(Some((host, response))) = in_flight.next().now_or_never() {
                self.record(host, response, &mut state, &mut results);
            }
        }

        if state.is_enough(&limits) {
            tracing::debug!(
                "Enough hosts answered ({} idle, {} semi-idle), stopped dispatching",
                state.idle,
                state.semi_idle
            );
        }

        while let Some((host, response)) = in_flight.next().await {
            self.record(host, response, &mut state, &mut results);
        }

        tracing::debug!(
            "Probe round done: {} dispatched, {} answered",
            dispatched,
            state.available
        );

        if results.is_empty() {
            return Err(ScheduleError::NoHost);
        }

        Ok(ProbeOutcome { state, results })
    }

    fn query(
        &self,
        hostname: &str,
        addr: SocketAddr,
    ) -> impl Future<Output = (String, Result<HostLoad>)> + 'a {
        let transport = self.transport;
        let hostname = hostname.to_string();

        async move {
            let response = transport.query(addr).await;
            (hostname, response)
        }
    }

    fn record(
        &self,
        hostname: String,
        response: Result<HostLoad>,
        state: &mut SearchState,
        results: &mut Vec<ProbeResult>,
    ) {
        match response {
            Ok(load) => {
                let load_average = load.loadavg_1min;
                state.available += 1;
                if load_average <= self.semi_idle_load {
                    state.semi_idle += 1;
                    if load_average <= self.idle_load {
                        state.idle += 1;
                    }
                }

                tracing::debug!("Host {} load={:.2}", hostname, load_average);
                results.push(ProbeResult {
                    hostname,
                    load_average,
                });
            }
            Err(e) => {
                tracing::debug!("No load from {}: {}", hostname, e);
            }
        }
    }
}
