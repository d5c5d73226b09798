//! Fragment & Program Scheduler
//!
//! Top-level scheduling operations. Every call captures a fresh `HostSnapshot`, builds a
//! candidate provider and filter, and runs one idle host search over them. Nothing is
//! shared between calls, so concurrent callers need no coordination.

use super::arch::ArchitectureResolver;
use super::candidates::CandidateProvider;
use super::error::{ScheduleError, ScheduleResult};
use super::filter::HostFilter;
use super::search::IdleHostSearch;
use crate::config::SchedulerConfig;
use crate::directory::snapshot::HostSnapshot;
use crate::directory::types::{HostDirectory, ProgramRegistry, ReplicaDirectory};
use crate::directory::url::{is_url, url_to_path};
use crate::probe::transport::LoadProbeTransport;

use std::sync::Arc;

/// How `schedule_url_fragments_with_policy` treats sections without any replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentPolicy {
    /// The first section without replicas fails the whole call with `NoReplica`.
    FailFast,
    /// Sections without replicas are reported as `FragmentHost::NoReplica`.
    TolerateMissingReplicas,
}

/// Outcome for one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentHost {
    Scheduled(String),
    NoReplica,
}

pub struct Scheduler {
    hosts: Arc<dyn HostDirectory>,
    programs: Arc<dyn ProgramRegistry>,
    replicas: Arc<dyn ReplicaDirectory>,
    transport: Arc<dyn LoadProbeTransport>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        hosts: Arc<dyn HostDirectory>,
        programs: Arc<dyn ProgramRegistry>,
        replicas: Arc<dyn ReplicaDirectory>,
        transport: Arc<dyn LoadProbeTransport>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            hosts,
            programs,
            replicas,
            transport,
            config,
        }
    }

    /// Builds a scheduler over one object serving all three directories.
    pub fn with_directory<D>(
        directory: Arc<D>,
        transport: Arc<dyn LoadProbeTransport>,
        config: SchedulerConfig,
    ) -> Self
    where
        D: HostDirectory + ProgramRegistry + ReplicaDirectory + 'static,
    {
        Self::new(
            directory.clone(),
            directory.clone(),
            directory,
            transport,
            config,
        )
    }

    async fn snapshot(&self) -> ScheduleResult<HostSnapshot> {
        let snapshot = HostSnapshot::capture(self.hosts.as_ref()).await?;
        if snapshot.is_empty() {
            tracing::warn!("Host directory has no registered hosts");
        } else {
            tracing::trace!("Captured {} registered host(s)", snapshot.len());
        }
        Ok(snapshot)
    }

    fn search<'a>(&'a self, snapshot: &'a HostSnapshot) -> IdleHostSearch<'a> {
        IdleHostSearch::new(self.transport.as_ref(), snapshot, &self.config)
    }

    /// Filter restricting hosts to those able to run `program`.
    ///
    /// A program given by plain name rather than URL is not restricted.
    async fn program_filter(
        &self,
        program: &str,
        snapshot: &HostSnapshot,
    ) -> ScheduleResult<HostFilter> {
        if !is_url(program) {
            return Ok(HostFilter::AcceptAll);
        }

        let hosts = ArchitectureResolver::new(self.programs.as_ref())
            .resolve_program_hosts(program, snapshot)
            .await?;
        Ok(HostFilter::name_set(hosts))
    }

    // ============================================================
    // HOST LISTS
    // ============================================================

    /// Selects `desired` hosts among `candidates`, least loaded first, repeating
    /// responders cyclically when fewer answered.
    pub async fn search_idle_hosts(
        &self,
        candidates: &[String],
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        let snapshot = self.snapshot().await?;
        self.search(&snapshot)
            .search_idle_cyclic(
                CandidateProvider::Names(candidates),
                &HostFilter::AcceptAll,
                desired,
            )
            .await
    }

    async fn schedule_hosts_filtered(
        &self,
        snapshot: &HostSnapshot,
        filter: &HostFilter,
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        let hosts = self
            .search(snapshot)
            .search_idle_cyclic(CandidateProvider::Hosts(snapshot.hosts()), filter, desired)
            .await?;

        tracing::info!("Scheduled {} host(s): {:?}", hosts.len(), hosts);
        Ok(hosts)
    }

    pub async fn schedule_hosts_by_all(&self, desired: usize) -> ScheduleResult<Vec<String>> {
        let snapshot = self.snapshot().await?;
        self.schedule_hosts_filtered(&snapshot, &HostFilter::AcceptAll, desired)
            .await
    }

    pub async fn schedule_hosts_by_domain(
        &self,
        domain: &str,
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        let snapshot = self.snapshot().await?;
        self.schedule_hosts_filtered(&snapshot, &HostFilter::domain(domain), desired)
            .await
    }

    pub async fn schedule_hosts_by_program(
        &self,
        program: &str,
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        let snapshot = self.snapshot().await?;
        let filter = self.program_filter(program, &snapshot).await?;
        self.schedule_hosts_filtered(&snapshot, &filter, desired)
            .await
    }

    pub async fn schedule_hosts_by_fsngroup(
        &self,
        fsngroup: &str,
        desired: usize,
    ) -> ScheduleResult<Vec<String>> {
        let snapshot = self.snapshot().await?;
        let filter = HostFilter::name_set(
            snapshot
                .hosts()
                .iter()
                .filter(|host| host.fsngroup == fsngroup)
                .map(|host| host.name.as_str()),
        );
        self.schedule_hosts_filtered(&snapshot, &filter, desired)
            .await
    }

    // ============================================================
    // FILE SECTIONS
    // ============================================================

    /// Least loaded holder of a replica of `section` that `filter` accepts.
    ///
    /// `NoReplica` when no copy exists; `NoHost` when copies exist but none is usable.
    async fn schedule_by_file_section(
        &self,
        snapshot: &HostSnapshot,
        file: &str,
        section: &str,
        filter: &HostFilter,
    ) -> ScheduleResult<String> {
        let copies = self.replicas.copies(file, section).await?;
        if copies.is_empty() {
            return Err(ScheduleError::NoReplica {
                file: file.to_string(),
                section: section.to_string(),
            });
        }

        let hosts = self
            .search(snapshot)
            .search_idle_cyclic(CandidateProvider::Copies(&copies), filter, 1)
            .await?;
        hosts.into_iter().next().ok_or(ScheduleError::NoHost)
    }

    pub async fn schedule_file_section_host(
        &self,
        file: &str,
        section: &str,
    ) -> ScheduleResult<String> {
        let snapshot = self.snapshot().await?;
        let host = self
            .schedule_by_file_section(&snapshot, file, section, &HostFilter::AcceptAll)
            .await?;

        tracing::info!("Section {} of {} scheduled on {}", section, file, host);
        Ok(host)
    }

    /// Schedules `section` on a host able to run `program`.
    ///
    /// When no compatible replica holder answers, any compatible host is chosen instead.
    pub async fn schedule_file_section_host_by_program(
        &self,
        file: &str,
        section: &str,
        program: &str,
    ) -> ScheduleResult<String> {
        if !is_url(program) {
            return self.schedule_file_section_host(file, section).await;
        }

        let snapshot = self.snapshot().await?;
        let filter = self.program_filter(program, &snapshot).await?;

        match self
            .schedule_by_file_section(&snapshot, file, section, &filter)
            .await
        {
            Err(ScheduleError::NoHost) => {
                tracing::warn!(
                    "No replica holder of section {} of {} can run {}, searching all compatible hosts",
                    section,
                    file,
                    program
                );
                let hosts = self
                    .search(&snapshot)
                    .search_idle_cyclic(CandidateProvider::Hosts(snapshot.hosts()), &filter, 1)
                    .await?;
                hosts.into_iter().next().ok_or(ScheduleError::NoHost)
            }
            other => other,
        }
    }

    /// Prefers the local node when it holds a replica, without probing anything.
    pub async fn schedule_file_section_host_local_first(
        &self,
        file: &str,
        section: &str,
    ) -> ScheduleResult<String> {
        let copies = self.replicas.copies(file, section).await?;
        if copies.is_empty() {
            return Err(ScheduleError::NoReplica {
                file: file.to_string(),
                section: section.to_string(),
            });
        }

        match self.hosts.self_canonical_name().await {
            Ok(self_name) => {
                if let Some(local) = copies
                    .iter()
                    .find(|copy| copy.hostname.eq_ignore_ascii_case(&self_name))
                {
                    tracing::debug!("Section {} of {} is local", section, file);
                    return Ok(local.hostname.clone());
                }
            }
            Err(e) => {
                tracing::debug!("Local node name unavailable, skipping locality: {}", e);
            }
        }

        let snapshot = self.snapshot().await?;
        let hosts = self
            .search(&snapshot)
            .search_idle_cyclic(CandidateProvider::Copies(&copies), &HostFilter::AcceptAll, 1)
            .await?;
        hosts.into_iter().next().ok_or(ScheduleError::NoHost)
    }

    // ============================================================
    // WHOLE FILES
    // ============================================================

    /// One host per fragment of the file at `url`.
    ///
    /// Fragments whose replica holders are all unreachable are filled from one combined
    /// search over every registered host. A fragment without any replica fails the call.
    pub async fn schedule_url_fragments(&self, url: &str) -> ScheduleResult<Vec<String>> {
        let fragments = self
            .schedule_url_fragments_with_policy(url, None, FragmentPolicy::FailFast)
            .await?;
        Ok(Self::scheduled_hosts(fragments))
    }

    /// Like `schedule_url_fragments`, restricted to hosts able to run `program`.
    pub async fn schedule_url_fragments_by_program(
        &self,
        url: &str,
        program: &str,
    ) -> ScheduleResult<Vec<String>> {
        let fragments = self
            .schedule_url_fragments_with_policy(url, Some(program), FragmentPolicy::FailFast)
            .await?;
        Ok(Self::scheduled_hosts(fragments))
    }

    fn scheduled_hosts(fragments: Vec<FragmentHost>) -> Vec<String> {
        fragments
            .into_iter()
            .filter_map(|fragment| match fragment {
                FragmentHost::Scheduled(host) => Some(host),
                FragmentHost::NoReplica => None,
            })
            .collect()
    }

    pub async fn schedule_url_fragments_with_policy(
        &self,
        url: &str,
        program: Option<&str>,
        policy: FragmentPolicy,
    ) -> ScheduleResult<Vec<FragmentHost>> {
        let file = url_to_path(url).ok_or_else(|| ScheduleError::InvalidUrl(url.to_string()))?;
        let fragments = self.replicas.fragment_count(&file).await?;

        let snapshot = self.snapshot().await?;
        let filter = match program {
            Some(program) => self.program_filter(program, &snapshot).await?,
            None => HostFilter::AcceptAll,
        };

        let mut hosts: Vec<Option<FragmentHost>> = Vec::with_capacity(fragments);
        let mut shortage = 0usize;

        for index in 0..fragments {
            let section = index.to_string();
            match self
                .schedule_by_file_section(&snapshot, &file, &section, &filter)
                .await
            {
                Ok(host) => hosts.push(Some(FragmentHost::Scheduled(host))),
                Err(ScheduleError::NoHost) => {
                    tracing::debug!("No reachable replica of section {} of {}", section, file);
                    hosts.push(None);
                    shortage += 1;
                }
                Err(ScheduleError::NoReplica { .. })
                    if policy == FragmentPolicy::TolerateMissingReplicas =>
                {
                    tracing::warn!("Section {} of {} has no replica", section, file);
                    hosts.push(Some(FragmentHost::NoReplica));
                }
                Err(e) => return Err(e),
            }
        }

        if shortage > 0 {
            tracing::info!(
                "{} of {} fragment(s) of {} need a fallback host",
                shortage,
                fragments,
                file
            );

            let mut residual = self
                .search(&snapshot)
                .search_idle_cyclic(CandidateProvider::Hosts(snapshot.hosts()), &filter, shortage)
                .await?;

            // Unfilled fragments take the fallback hosts from the back of the list.
            for slot in hosts.iter_mut().filter(|slot| slot.is_none()) {
                *slot = residual.pop().map(FragmentHost::Scheduled);
            }
        }

        hosts
            .into_iter()
            .map(|slot| slot.ok_or(ScheduleError::NoHost))
            .collect()
    }
}
