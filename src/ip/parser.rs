//! Textual address grammar
//!
//! IPv4 follows the classic BSD `inet_aton` rules (1 to 4 parts, the last
//! part filling the remaining bytes). IPv6 follows `inet_pton`, including a
//! `%zone` suffix and a trailing dotted quad.

use crate::error::{Result, ZxipError};

use super::address::{Address, INADDR16SZ, INADDR4SZ};

const INT16SZ: usize = 2;
/// Longest canonical dotted quad: `255.255.255.255`
const MAX_DOTTED_QUAD_LEN: usize = 15;
const MAX_HEX_GROUP_DIGITS: usize = 4;

/// Parse an IPv6 or IPv4 literal, trying IPv6 first
pub fn parse_address(src: &str) -> Result<Address> {
    if let Some(octets) = text_to_numeric_v6(src) {
        return Ok(Address::from_octets16(octets));
    }
    if let Some(octets) = text_to_numeric_v4(src) {
        return Ok(Address::from_octets4(octets));
    }
    Err(ZxipError::address(src))
}

/// Convert an IPv4 literal to network-order bytes
///
/// One part is the whole 32-bit value, two parts are `a.b` with `b` 24 bits
/// wide, three parts are `a.b.c` with `c` 16 bits wide, four parts are one
/// byte each.
pub(crate) fn text_to_numeric_v4(src: &str) -> Option<[u8; INADDR4SZ]> {
    let bytes = src.as_bytes();
    if bytes.is_empty() {
        return None;
    }

    let mut res = [0u8; INADDR4SZ];
    let mut value: u64 = 0;
    let mut curr_byte = 0usize;
    let mut new_octet = true;

    for &c in bytes {
        if c == b'.' {
            if new_octet || value > 0xff || curr_byte == 3 {
                return None;
            }
            res[curr_byte] = value as u8;
            curr_byte += 1;
            value = 0;
            new_octet = true;
        } else {
            let digit = (c as char).to_digit(10)?;
            value = value * 10 + u64::from(digit);
            if value > u64::from(u32::MAX) {
                return None;
            }
            new_octet = false;
        }
    }

    if curr_byte == 3 && bytes.len() > MAX_DOTTED_QUAD_LEN {
        return None;
    }
    if new_octet || value >= 1u64 << ((INADDR4SZ - curr_byte) * 8) {
        return None;
    }

    let tail = (value as u32).to_be_bytes();
    res[curr_byte..].copy_from_slice(&tail[curr_byte..]);
    Some(res)
}

/// Convert an IPv6 literal to network-order bytes
///
/// Anything after the first `%` is a zone id and is ignored.
pub(crate) fn text_to_numeric_v6(src: &str) -> Option<[u8; INADDR16SZ]> {
    // Shortest valid string is "::"
    let srcb = src.as_bytes();
    if srcb.len() < 2 {
        return None;
    }

    let mut end = srcb.len();
    if let Some(pc) = src.find('%') {
        if pc == srcb.len() - 1 {
            return None;
        }
        end = pc;
    }

    let mut dst = [0u8; INADDR16SZ];
    let mut colonp: Option<usize> = None;
    let mut i = 0;
    let mut j = 0;

    // Leading "::" needs special handling
    if srcb[0] == b':' {
        i += 1;
        if srcb[i] != b':' {
            return None;
        }
    }

    let mut curtok = i;
    let mut saw_xdigit = false;
    let mut digits = 0;
    let mut val: u32 = 0;

    while i < end {
        let ch = srcb[i];
        i += 1;

        if let Some(d) = (ch as char).to_digit(16) {
            digits += 1;
            if digits > MAX_HEX_GROUP_DIGITS {
                return None;
            }
            val = (val << 4) | d;
            saw_xdigit = true;
            continue;
        }

        if ch == b':' {
            curtok = i;
            if !saw_xdigit {
                if colonp.is_some() {
                    return None;
                }
                colonp = Some(j);
                continue;
            } else if i == end {
                return None;
            }
            if j + INT16SZ > INADDR16SZ {
                return None;
            }
            dst[j] = (val >> 8) as u8;
            dst[j + 1] = val as u8;
            j += INT16SZ;
            saw_xdigit = false;
            digits = 0;
            val = 0;
            continue;
        }

        if ch == b'.' && j + INADDR4SZ <= INADDR16SZ {
            let ia4 = &src[curtok..end];
            // Embedded IPv4 must be a full A.B.C.D
            if ia4.matches('.').count() != 3 {
                return None;
            }
            let v4 = text_to_numeric_v4(ia4)?;
            dst[j..j + INADDR4SZ].copy_from_slice(&v4);
            j += INADDR4SZ;
            saw_xdigit = false;
            break;
        }

        return None;
    }

    if saw_xdigit {
        if j + INT16SZ > INADDR16SZ {
            return None;
        }
        dst[j] = (val >> 8) as u8;
        dst[j + 1] = val as u8;
        j += INT16SZ;
    }

    if let Some(colonp) = colonp {
        // "::" with nothing left to compress
        if j == INADDR16SZ {
            return None;
        }
        let n = j - colonp;
        for k in 1..=n {
            dst[INADDR16SZ - k] = dst[colonp + n - k];
            dst[colonp + n - k] = 0;
        }
        j = INADDR16SZ;
    }

    if j != INADDR16SZ {
        return None;
    }
    Some(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(s: &str) -> Option<String> {
        text_to_numeric_v4(s).map(|o| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3]))
    }

    #[test]
    fn test_dotted_quad() {
        assert_eq!(v4("1.2.3.4").as_deref(), Some("1.2.3.4"));
        assert_eq!(v4("255.255.255.255").as_deref(), Some("255.255.255.255"));
        assert_eq!(v4("01.002.3.4").as_deref(), Some("1.2.3.4"));
        assert_eq!(v4("256.1.1.1"), None);
        assert_eq!(v4("1.2.3.256"), None);
        assert_eq!(v4("1.2.3.4.5"), None);
        assert_eq!(v4("0001.0002.0003.4"), None);
    }

    #[test]
    fn test_shorthand_forms() {
        assert_eq!(v4("1").as_deref(), Some("0.0.0.1"));
        assert_eq!(v4("4294967295").as_deref(), Some("255.255.255.255"));
        assert_eq!(v4("4294967296"), None);
        assert_eq!(v4("127.1").as_deref(), Some("127.0.0.1"));
        assert_eq!(v4("1.16777215").as_deref(), Some("1.255.255.255"));
        assert_eq!(v4("1.16777216"), None);
        assert_eq!(v4("1.2.3").as_deref(), Some("1.2.0.3"));
        assert_eq!(v4("1.2.65536"), None);
        assert_eq!(v4("00000000000000001").as_deref(), Some("0.0.0.1"));
    }

    #[test]
    fn test_malformed_ipv4() {
        assert_eq!(v4(""), None);
        assert_eq!(v4(".1.2.3"), None);
        assert_eq!(v4("1.2.3."), None);
        assert_eq!(v4("1..3.4"), None);
        assert_eq!(v4("1.2.3.x"), None);
        assert_eq!(v4("-1.2.3.4"), None);
    }

    #[test]
    fn test_ipv6_forms() {
        let parse = |s: &str| text_to_numeric_v6(s);

        assert_eq!(parse("::"), Some([0u8; 16]));

        let mut loopback = [0u8; 16];
        loopback[15] = 1;
        assert_eq!(parse("::1"), Some(loopback));

        let mut high = [0u8; 16];
        high[1] = 1;
        assert_eq!(parse("1::"), Some(high));

        let full = parse("1:2:3:4:5:6:7:8").unwrap();
        assert_eq!(full, [0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8]);

        let embedded = parse("1:2:3:4:5:6:1.2.3.4").unwrap();
        assert_eq!(&embedded[12..], &[1, 2, 3, 4]);

        assert!(parse("FE80::Abcd").is_some());
        assert!(parse("fe80::1%eth0").is_some());
    }

    #[test]
    fn test_malformed_ipv6() {
        let parse = |s: &str| text_to_numeric_v6(s);

        assert_eq!(parse(":"), None);
        assert_eq!(parse(":1"), None);
        assert_eq!(parse("1:"), None);
        assert_eq!(parse(":::"), None);
        assert_eq!(parse("1:::2"), None);
        assert_eq!(parse("1::2::3"), None);
        assert_eq!(parse("12345::"), None);
        assert_eq!(parse("g::"), None);
        assert_eq!(parse("fe80::1%"), None);
        assert_eq!(parse("::1.2.3"), None);
        assert_eq!(parse("1:2:3:4:5:6:7"), None);
        assert_eq!(parse("1:2:3:4:5:6:7:8:9"), None);
        // all 16 bytes written, "::" is redundant
        assert_eq!(parse("1:2:3:4:5:6:7::8"), None);
        assert_eq!(parse("1.2.3.4"), None);
    }

    #[test]
    fn test_parse_address_prefers_ipv6() {
        let ip = parse_address("::ffff:1.2.3.4").unwrap();
        assert!(ip.is_ipv4());
        assert!(ip.is_mapped());
        assert_eq!(ip.to_string(), "1.2.3.4");

        let ip = parse_address("::ffff:1111:2222").unwrap();
        assert_eq!(ip.to_string(), "17.17.34.34");

        let ip = parse_address("10.0.0.1").unwrap();
        assert!(ip.is_ipv4());
        assert!(!ip.is_mapped());

        assert!(matches!(
            parse_address("not an address"),
            Err(ZxipError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_dotted_quad_round_trip() {
        for text in ["0.0.0.0", "1.2.3.4", "10.0.0.5", "192.168.100.200", "255.255.255.255"] {
            let ip = parse_address(text).unwrap();
            assert_eq!(parse_address(&ip.to_string()).unwrap(), ip);
            assert_eq!(ip.to_string(), text);
        }
    }
}
