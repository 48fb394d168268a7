//! Address literal classification
//!
//! Used only to route a raw host entry into the `A` or `AAAA` bucket, never
//! to validate caller-supplied targets.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Whether `s` is a dotted-quad IPv4 literal (no CIDR suffix, no padding)
pub fn is_valid_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// Whether `s` is an IPv6 literal in any RFC 4291 textual form
///
/// Accepts `::` compression and the embedded dual form (`::ffff:a.b.c.d`).
pub fn is_valid_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4() {
        let cases = [
            ("192.168.1.1", true),
            ("255.255.255.255", true),
            ("0.0.0.0", true),
            ("", false),
            ("256.256.256.256", false),
            ("192.168.0.1/22", false),
            ("192.168.1", false),
            ("abc.def.ghi.jkl", false),
            ("::ffff:192.168.20.3", false),
            (" 192.168.1.1", false),
        ];

        for (ip, expected) in cases {
            assert_eq!(is_valid_ipv4(ip), expected, "is_valid_ipv4({:?})", ip);
        }
    }

    #[test]
    fn test_ipv6() {
        let cases = [
            ("2001:0db8:85a3:0000:0000:8a2e:0370:7334", true),
            ("2001:db8:85a3::8a2e:370:7334", true),
            // dual form y:y:y:y:y:y:x.x.x.x
            ("::ffff:192.168.20.3", true),
            ("::1", true),
            ("::", true),
            ("2001:db8::", true),
            ("fc00::1:192:168:1:1", true),
            ("", false),
            (":", false),
            ("::ffff:", false),
            ("192.168.20.3", false),
            ("2001:db8:85a3:0:0:8a2e:370:7334:1234", false),
            ("2001:db8:85a3::8a2e:370g:7334", false),
            ("2001:db8:85a3::8a2e:370:7334::", false),
            ("2001:db8:85a3::8a2e:370:7334::1", false),
            ("::ffff:1.2.3.4:5.6.7.8", false),
        ];

        for (ip, expected) in cases {
            assert_eq!(is_valid_ipv6(ip), expected, "is_valid_ipv6({:?})", ip);
        }
    }
}
