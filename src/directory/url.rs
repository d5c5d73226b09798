//! `dfs:` URL helpers.

/// Scheme prefix of paths stored in the distributed filesystem.
pub const URL_PREFIX: &str = "dfs:";

pub fn is_url(s: &str) -> bool {
    s.starts_with(URL_PREFIX)
}

/// Canonical metadata path of a `dfs:` URL.
///
/// `dfs:/a/b`, `dfs:a/b` and `dfs://a//b/` all map to `/a/b`.
/// Returns `None` for non-URLs and for URLs without a path.
pub fn url_to_path(url: &str) -> Option<String> {
    let rest = url.strip_prefix(URL_PREFIX)?;

    let components: Vec<&str> = rest.split('/').filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return None;
    }

    Some(format!("/{}", components.join("/")))
}
