use super::filter::HostFilter;
use crate::directory::types::{HostRecord, ReplicaCopyRecord};

/// A fixed-length source of candidate host names.
///
/// A traversal yields every element exactly once and then ends, whatever filter the
/// consumer applies, so a search can never read past the source.
#[derive(Debug, Clone, Copy)]
pub enum CandidateProvider<'a> {
    Names(&'a [String]),
    Hosts(&'a [HostRecord]),
    Copies(&'a [ReplicaCopyRecord]),
}

impl<'a> CandidateProvider<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Names(names) => names.len(),
            Self::Hosts(hosts) => hosts.len(),
            Self::Copies(copies) => copies.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<&'a str> {
        match *self {
            Self::Names(names) => names.get(index).map(String::as_str),
            Self::Hosts(hosts) => hosts.get(index).map(|host| host.name.as_str()),
            Self::Copies(copies) => copies.get(index).map(|copy| copy.hostname.as_str()),
        }
    }

    pub fn iter(&self) -> Candidates<'a> {
        Candidates {
            provider: *self,
            next: 0,
        }
    }

    /// Number of candidates `filter` accepts.
    pub fn count_suitable(&self, filter: &HostFilter) -> usize {
        self.iter().filter(|name| filter.suitable(name)).count()
    }
}

pub struct Candidates<'a> {
    provider: CandidateProvider<'a>,
    next: usize,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.provider.get(self.next)?;
        self.next += 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.provider.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}
