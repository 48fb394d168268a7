//! Domain filtering
//!
//! A [`DomainFilter`] restricts which names a provider may list or mutate.
//! A name matches a filter entry when it equals the entry or is a subdomain of
//! it. An empty include list matches everything; exclusions always win.

use serde::{Deserialize, Serialize};

/// Predicate over domain names
///
/// Entries are normalized (trimmed, lower-cased, trailing dot removed) however
/// the filter is built, including when it is deserialized from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDomainFilter")]
pub struct DomainFilter {
    /// Domains (and their subdomains) that are managed
    #[serde(default)]
    pub filters: Vec<String>,
    /// Domains (and their subdomains) that are never managed
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl DomainFilter {
    /// Filter that includes the given domains
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            filters: normalize_all(filters),
            exclusions: Vec::new(),
        }
    }

    /// Add excluded domains
    pub fn with_exclusions<I, S>(mut self, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclusions = normalize_all(exclusions);
        self
    }

    /// Whether the filter is configured at all
    pub fn is_configured(&self) -> bool {
        !self.filters.is_empty() || !self.exclusions.is_empty()
    }

    /// Whether `domain` is managed by this filter
    pub fn matches(&self, domain: &str) -> bool {
        let domain = normalize(domain);

        if self.exclusions.iter().any(|ex| is_within(&domain, ex)) {
            return false;
        }

        self.filters.is_empty() || self.filters.iter().any(|f| is_within(&domain, f))
    }
}

/// Domain filter as written in configuration, before normalization
#[derive(Deserialize)]
struct RawDomainFilter {
    #[serde(default)]
    filters: Vec<String>,
    #[serde(default)]
    exclusions: Vec<String>,
}

impl From<RawDomainFilter> for DomainFilter {
    fn from(raw: RawDomainFilter) -> Self {
        DomainFilter::new(raw.filters).with_exclusions(raw.exclusions)
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn normalize_all<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    domains
        .into_iter()
        .map(|d| normalize(d.as_ref()))
        .filter(|d| !d.is_empty())
        .collect()
}

fn is_within(domain: &str, zone: &str) -> bool {
    // A leading dot (".example.com") only matches strict subdomains
    if let Some(suffix) = zone.strip_prefix('.') {
        return domain.ends_with(zone) && domain.len() > suffix.len();
    }

    domain == zone
        || (domain.len() > zone.len()
            && domain.ends_with(zone)
            && domain.as_bytes()[domain.len() - zone.len() - 1] == b'.')
}
