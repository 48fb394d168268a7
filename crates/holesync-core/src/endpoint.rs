// # Endpoint
//
// The value object exchanged between the reconciling controller and record
// providers: one logical DNS record with every target it resolves to.
//
// ## Record kinds
//
// - `A` / `AAAA`: address records, one or more literal targets
// - `CNAME`: alias record, exactly one domain name target and an optional TTL
// - `Other`: any kind a provider cannot represent (carried through verbatim
//   so providers can report or skip it)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS record kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    Aaaa,
    /// Alias record
    Cname,
    /// Any other kind, kept as written
    Other(String),
}

impl RecordType {
    /// The canonical upper-case name of the record kind
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Other(kind) => kind,
        }
    }

    /// Whether this is an address (A or AAAA) record kind
    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            _ => RecordType::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<RecordType> for String {
    fn from(kind: RecordType) -> Self {
        kind.as_str().to_string()
    }
}

/// A logical DNS record
///
/// `record_ttl` is `None` when no TTL is configured. A present `Some(0)`
/// means "TTL explicitly zero" and is never used as a stand-in for unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Fully qualified name, without trailing dot
    pub dns_name: String,
    /// Targets in the order they were configured or listed
    pub targets: Vec<String>,
    /// Record kind
    pub record_type: RecordType,
    /// Optional time-to-live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_ttl: Option<u32>,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            record_type,
            record_ttl: None,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.record_ttl = Some(ttl);
        self
    }

    /// Whether the name contains a wildcard label
    pub fn is_wildcard(&self) -> bool {
        self.dns_name.split('.').any(|label| label == "*")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.dns_name, self.record_type, self.targets.join(", "))?;
        if let Some(ttl) = self.record_ttl {
            write!(f, " ttl={}", ttl)?;
        }
        Ok(())
    }
}
