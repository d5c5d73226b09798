//! Architecture Resolution
//!
//! Maps a registered program to the hosts able to run it: the architectures it has
//! binaries for, intersected with the architectures of the registered hosts.

use super::error::{ScheduleError, ScheduleResult};
use crate::directory::snapshot::HostSnapshot;
use crate::directory::types::ProgramRegistry;
use crate::directory::url::url_to_path;

use std::collections::HashSet;

pub struct ArchitectureResolver<'a> {
    registry: &'a dyn ProgramRegistry,
}

impl<'a> ArchitectureResolver<'a> {
    pub fn new(registry: &'a dyn ProgramRegistry) -> Self {
        Self { registry }
    }

    /// Architectures `program_url` has a registered binary for.
    pub async fn program_architectures(
        &self,
        program_url: &str,
    ) -> ScheduleResult<HashSet<String>> {
        let path = url_to_path(program_url)
            .ok_or_else(|| ScheduleError::InvalidUrl(program_url.to_string()))?;

        let info = self
            .registry
            .path_info(&path)
            .await?
            .ok_or_else(|| ScheduleError::ProgramNotRegistered(program_url.to_string()))?;
        if !info.is_program {
            return Err(ScheduleError::ProgramNotExecutable(program_url.to_string()));
        }

        let architectures: HashSet<String> = self
            .registry
            .sections(&path)
            .await?
            .into_iter()
            .map(|section| section.architecture)
            .collect();
        if architectures.is_empty() {
            return Err(ScheduleError::NoBinaryRegistered(program_url.to_string()));
        }

        tracing::debug!(
            "Program {} is registered for {} architecture(s)",
            info.path,
            architectures.len()
        );
        Ok(architectures)
    }

    /// Names of the hosts in `snapshot` whose architecture `program_url` has a binary for.
    pub async fn resolve_program_hosts(
        &self,
        program_url: &str,
        snapshot: &HostSnapshot,
    ) -> ScheduleResult<HashSet<String>> {
        let architectures = self.program_architectures(program_url).await?;

        let hosts: HashSet<String> = snapshot
            .hosts()
            .iter()
            .filter(|host| architectures.contains(&host.architecture))
            .map(|host| host.name.clone())
            .collect();
        if hosts.is_empty() {
            return Err(ScheduleError::NoCompatibleHost(program_url.to_string()));
        }

        Ok(hosts)
    }
}
