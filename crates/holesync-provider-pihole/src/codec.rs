// # Record Text Codec
//
// Pi-hole stores local DNS records as flat strings:
//
// - host entries:  `"<ip> <domain>"`
// - alias entries: `"<source>,<target>[,<ttl>]"`
//
// Decoding aggregates host entries sharing a (domain, address family) into
// one multi-target endpoint, in encounter order. Malformed entries are
// skipped so that one garbled line never aborts a listing.

use crate::validate::{is_valid_ipv4, is_valid_ipv6};
use holesync_core::{Endpoint, Error, RecordType, Result};
use std::collections::HashMap;

/// Backend collection an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `/api/config/dns/hosts`
    Hosts,
    /// `/api/config/dns/cnameRecords`
    CnameRecords,
}

impl EntryKind {
    /// The collection for a record kind, `None` when Pi-hole cannot store it
    pub fn for_record_type(record_type: &RecordType) -> Option<Self> {
        match record_type {
            kind if kind.is_address() => Some(EntryKind::Hosts),
            RecordType::Cname => Some(EntryKind::CnameRecords),
            _ => None,
        }
    }

    /// Final path segment of the collection
    pub fn path_segment(self) -> &'static str {
        match self {
            EntryKind::Hosts => "hosts",
            EntryKind::CnameRecords => "cnameRecords",
        }
    }
}

/// Decode host entries into address endpoints
///
/// Returns both `A` and `AAAA` records; callers filter by kind.
pub fn decode_hosts<S: AsRef<str>>(entries: &[S]) -> Vec<Endpoint> {
    let mut records: Vec<Endpoint> = Vec::new();
    let mut index: HashMap<(String, RecordType), usize> = HashMap::new();

    for entry in entries {
        let entry = entry.as_ref();
        let Some((address, domain)) = split_host_entry(entry) else {
            tracing::debug!("Skipping malformed host entry: {:?}", entry);
            continue;
        };

        let record_type = if is_valid_ipv4(address) {
            RecordType::A
        } else if is_valid_ipv6(address) {
            RecordType::Aaaa
        } else {
            tracing::debug!("Skipping host entry with invalid address: {:?}", entry);
            continue;
        };

        let key = (domain.to_string(), record_type);
        match index.get(&key) {
            Some(&i) => records[i].targets.push(address.to_string()),
            None => {
                index.insert(key.clone(), records.len());
                records.push(Endpoint::new(key.0, key.1, [address]));
            }
        }
    }

    records
}

/// Decode alias entries into `CNAME` endpoints
///
/// A third field that is not an unsigned integer leaves the TTL unset
/// instead of dropping the record.
pub fn decode_cname_records<S: AsRef<str>>(entries: &[S]) -> Vec<Endpoint> {
    let mut records = Vec::with_capacity(entries.len());

    for entry in entries {
        let entry = entry.as_ref();
        let fields: Vec<&str> = entry.split(',').map(str::trim).collect();

        let (source, target, ttl) = match fields.as_slice() {
            [source, target] => (*source, *target, None),
            [source, target, ttl] => (*source, *target, Some(*ttl)),
            _ => {
                tracing::debug!("Skipping malformed alias entry: {:?}", entry);
                continue;
            }
        };

        if source.is_empty() || target.is_empty() || ttl.is_some_and(str::is_empty) {
            tracing::debug!("Skipping alias entry with empty field: {:?}", entry);
            continue;
        }

        let mut record = Endpoint::new(source, RecordType::Cname, [target]);
        if let Some(ttl) = ttl {
            match ttl.parse::<u32>() {
                Ok(ttl) => record.record_ttl = Some(ttl),
                Err(_) => tracing::debug!("Ignoring non-numeric TTL in alias entry: {:?}", entry),
            }
        }
        records.push(record);
    }

    records
}

/// Encode an endpoint into the backend entries it maps to
///
/// Address records expand to one entry per target. Alias records must have
/// at most one target.
pub fn encode(endpoint: &Endpoint) -> Result<Vec<String>> {
    match endpoint.record_type {
        RecordType::A | RecordType::Aaaa => Ok(endpoint
            .targets
            .iter()
            .map(|target| format!("{} {}", target, endpoint.dns_name))
            .collect()),
        RecordType::Cname => match endpoint.targets.as_slice() {
            [] => Ok(Vec::new()),
            [target] => Ok(vec![match endpoint.record_ttl {
                Some(ttl) => format!("{},{},{}", endpoint.dns_name, target, ttl),
                None => format!("{},{}", endpoint.dns_name, target),
            }]),
            _ => Err(Error::invalid_input(format!(
                "Pi-hole CNAME records cannot have multiple targets: {}",
                endpoint.dns_name
            ))),
        },
        RecordType::Other(ref kind) => Err(Error::unsupported_record_type(kind.as_str())),
    }
}

fn split_host_entry(entry: &str) -> Option<(&str, &str)> {
    let mut fields = entry.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(address), Some(domain), None) => Some((address, domain)),
        _ => None,
    }
}
