use std::collections::HashSet;

/// Restricts which hosts a search may consider.
///
/// Filters are pure: whether a host passes never depends on its load.
#[derive(Debug, Clone)]
pub enum HostFilter {
    AcceptAll,
    /// Hosts under a DNS domain.
    Domain(String),
    /// Hosts in a precomputed set, stored lowercased.
    NameSet(HashSet<String>),
}

impl HostFilter {
    pub fn domain(domain: &str) -> Self {
        Self::Domain(domain.to_string())
    }

    pub fn name_set<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::NameSet(
            names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    pub fn suitable(&self, hostname: &str) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::Domain(domain) => is_host_in_domain(hostname, domain),
            Self::NameSet(names) => names.contains(&hostname.to_ascii_lowercase()),
        }
    }
}

/// Case-insensitive check that `hostname` equals `domain` or ends with `.domain`.
///
/// The empty domain contains every host.
pub fn is_host_in_domain(hostname: &str, domain: &str) -> bool {
    let host = hostname.as_bytes();
    let domain = domain.as_bytes();

    if host.len() < domain.len() {
        return false;
    }
    if host.len() == domain.len() {
        return host.eq_ignore_ascii_case(domain);
    }
    if domain.is_empty() {
        return true;
    }

    let split = host.len() - domain.len();
    host[split - 1] == b'.' && host[split..].eq_ignore_ascii_case(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_filter() {
        let filter = HostFilter::domain("example.org");

        assert!(filter.suitable("node1.example.org"));
        assert!(filter.suitable("NODE1.Example.ORG"));
        assert!(filter.suitable("a.b.example.org"));
        assert!(!filter.suitable("node1.other.org"));
        // Label boundary, not a plain suffix.
        assert!(!filter.suitable("node1.badexample.org"));
    }

    #[test]
    fn test_domain_edge_cases() {
        assert!(is_host_in_domain("example.org", "example.org"));
        assert!(is_host_in_domain("anything", ""));
        assert!(!is_host_in_domain("org", "example.org"));
    }

    #[test]
    fn test_name_set_is_case_insensitive() {
        let filter = HostFilter::name_set(["Node1", "node2"]);

        assert!(filter.suitable("node1"));
        assert!(filter.suitable("NODE2"));
        assert!(!filter.suitable("node3"));
    }
}
