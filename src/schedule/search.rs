//! Idle Host Search
//!
//! Composes candidates, filter, prober, ranking and cyclic expansion into the single
//! "pick N least loaded hosts" operation used by every scheduler entry point.

use super::candidates::CandidateProvider;
use super::error::{ScheduleError, ScheduleResult};
use super::filter::HostFilter;
use super::prober::{LoadProber, ProbeLimits, ProbeResult};
use crate::config::SchedulerConfig;
use crate::directory::snapshot::HostSnapshot;
use crate::probe::transport::LoadProbeTransport;

use rand::seq::SliceRandom;

/// Orders answers by ascending load. The sort is stable: equal loads keep arrival order.
pub fn rank(results: &mut [ProbeResult]) {
    results.sort_by(|a, b| a.load_average.total_cmp(&b.load_average));
}

/// Pads `hosts` to `desired` entries by repeating it from the start.
///
/// `[A, B, C]` expanded to 5 becomes `[A, B, C, A, B]`.
pub fn expand_cyclic(hosts: &mut Vec<String>, desired: usize) -> ScheduleResult<()> {
    let found = hosts.len();
    if found == 0 {
        return Err(ScheduleError::NoHost);
    }

    for i in found..desired {
        let host = hosts[(i - found) % found].clone();
        hosts.push(host);
    }

    Ok(())
}

pub struct IdleHostSearch<'a> {
    transport: &'a dyn LoadProbeTransport,
    snapshot: &'a HostSnapshot,
    config: &'a SchedulerConfig,
}

impl<'a> IdleHostSearch<'a> {
    pub fn new(
        transport: &'a dyn LoadProbeTransport,
        snapshot: &'a HostSnapshot,
        config: &'a SchedulerConfig,
    ) -> Self {
        Self {
            transport,
            snapshot,
            config,
        }
    }

    /// Up to `desired` responding hosts, least loaded first.
    ///
    /// Probing stops early once `desired` idle or `enough_semi_idle` semi-idle hosts answered.
    pub async fn search_idle(
        &self,
        candidates: CandidateProvider<'_>,
        filter: &HostFilter,
        desired: usize,
        enough_semi_idle: usize,
    ) -> ScheduleResult<Vec<String>> {
        let limits = ProbeLimits {
            concurrency: self.config.concurrency,
            enough_semi_idle,
            desired_idle: desired,
        };
        let prober = LoadProber::new(
            self.transport,
            self.snapshot,
            self.config.idle_load,
            self.config.semi_idle_load,
        );

        let mut outcome = if self.config.shuffle_candidates {
            let mut shuffled: Vec<String> = candidates
                .iter()
                .filter(|name| filter.suitable(name))
                .map(str::to_string)
                .collect();
            shuffled.shuffle(&mut rand::thread_rng());

            prober
                .probe(
                    CandidateProvider::Names(&shuffled),
                    &HostFilter::AcceptAll,
                    limits,
                )
                .await?
        } else {
            prober.probe(candidates, filter, limits).await?
        };

        tracing::debug!(
            "{} host(s) answered ({} idle, {} semi-idle)",
            outcome.state.available,
            outcome.state.idle,
            outcome.state.semi_idle
        );
        rank(&mut outcome.results);

        Ok(outcome
            .results
            .into_iter()
            .take(desired)
            .map(|result| result.hostname)
            .collect())
    }

    /// Exactly `desired` hosts, least loaded first, repeated cyclically when fewer answered.
    ///
    /// Fails with `NoHost` when the filter leaves no candidate or no candidate answered.
    pub async fn search_idle_cyclic(
        &self,
        candidates: CandidateProvider<'_>,
        filter: &HostFilter,
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        if desired == 0 {
            return Ok(Vec::new());
        }

        let suitable = candidates.count_suitable(filter);
        if suitable == 0 {
            tracing::debug!(
                "None of {} candidates passes the host filter",
                candidates.len()
            );
            return Err(ScheduleError::NoHost);
        }

        let enough_semi_idle = desired.saturating_mul(self.config.enough_rate);
        let mut hosts = self
            .search_idle(candidates, filter, desired, enough_semi_idle)
            .await?;

        if hosts.len() < desired {
            tracing::debug!(
                "Only {} of {} hosts answered, expanding cyclically",
                hosts.len(),
                desired
            );
            expand_cyclic(&mut hosts, desired)?;
        }

        Ok(hosts)
    }
}
