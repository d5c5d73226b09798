//! In-Memory Metadata Directory
//!
//! A `DashMap`-backed implementation of every directory trait. Used by embedders that
//! keep metadata in process and by the test suites.

use super::types::*;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

struct ProgramEntry {
    info: PathInfo,
    sections: Vec<ProgramSection>,
}

struct FileEntry {
    fragments: usize,
    /// Section name -> replica holders.
    copies: DashMap<String, Vec<ReplicaCopyRecord>>,
}

pub struct MemoryDirectory {
    hosts: DashMap<String, HostRecord>,
    programs: DashMap<String, ProgramEntry>,
    files: DashMap<String, FileEntry>,
    self_name: Option<String>,
}

impl MemoryDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A directory that reports `name` as the local node.
    pub fn with_self_name(name: &str) -> Arc<Self> {
        Arc::new(Self {
            self_name: Some(name.to_string()),
            ..Self::default()
        })
    }

    pub fn add_host(&self, host: HostRecord) {
        tracing::debug!("Registered host {} ({})", host.name, host.architecture);
        self.hosts.insert(host.name.clone(), host);
    }

    pub fn remove_host(&self, name: &str) -> Option<HostRecord> {
        self.hosts.remove(name).map(|(_, host)| host)
    }

    /// Registers a path entry without any binary sections.
    pub fn register_path(&self, path: &str, is_program: bool) {
        self.programs.insert(
            path.to_string(),
            ProgramEntry {
                info: PathInfo {
                    path: path.to_string(),
                    is_program,
                },
                sections: Vec::new(),
            },
        );
    }

    /// Registers an executable program with one binary section per architecture.
    pub fn register_program(&self, path: &str, architectures: &[&str]) {
        self.register_path(path, true);
        if let Some(mut entry) = self.programs.get_mut(path) {
            entry.sections = architectures
                .iter()
                .map(|arch| ProgramSection {
                    architecture: arch.to_string(),
                })
                .collect();
        }
    }

    /// Registers a file split into `fragments` sections named `0..fragments`.
    pub fn register_file(&self, path: &str, fragments: usize) {
        self.files.insert(
            path.to_string(),
            FileEntry {
                fragments,
                copies: DashMap::new(),
            },
        );
    }

    /// Records a replica of `section` on `hostname`. Unknown files are registered
    /// with a single fragment.
    pub fn add_copy(&self, path: &str, section: &str, hostname: &str) {
        let file = self.files.entry(path.to_string()).or_insert_with(|| FileEntry {
            fragments: 1,
            copies: DashMap::new(),
        });

        file.copies
            .entry(section.to_string())
            .or_default()
            .push(ReplicaCopyRecord {
                hostname: hostname.to_string(),
            });
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self {
            hosts: DashMap::new(),
            programs: DashMap::new(),
            files: DashMap::new(),
            self_name: None,
        }
    }
}

#[async_trait]
impl HostDirectory for MemoryDirectory {
    /// Hosts ordered by name, so traversal order does not depend on map layout.
    async fn get_all(&self) -> Result<Vec<HostRecord>> {
        let mut hosts: Vec<HostRecord> = self
            .hosts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        hosts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hosts)
    }

    async fn self_canonical_name(&self) -> Result<String> {
        self.self_name
            .clone()
            .ok_or_else(|| anyhow::anyhow!("canonical name of the local node is not determinable"))
    }
}

#[async_trait]
impl ProgramRegistry for MemoryDirectory {
    async fn path_info(&self, path: &str) -> Result<Option<PathInfo>> {
        Ok(self.programs.get(path).map(|entry| entry.info.clone()))
    }

    async fn sections(&self, path: &str) -> Result<Vec<ProgramSection>> {
        Ok(self
            .programs
            .get(path)
            .map(|entry| entry.sections.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl ReplicaDirectory for MemoryDirectory {
    async fn copies(&self, path: &str, section: &str) -> Result<Vec<ReplicaCopyRecord>> {
        let Some(file) = self.files.get(path) else {
            return Ok(Vec::new());
        };
        let copies = file
            .copies
            .get(section)
            .map(|copies| copies.value().clone())
            .unwrap_or_default();
        Ok(copies)
    }

    async fn fragment_count(&self, path: &str) -> Result<usize> {
        self.files
            .get(path)
            .map(|file| file.fragments)
            .ok_or_else(|| anyhow::anyhow!("no such file: {}", path))
    }
}
