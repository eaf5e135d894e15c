//! Regular expressions for locating IP address literals
//!
//! The patterns only find candidates. Callers confirm each one with the
//! address grammar in `crate::ip`, so loose IPv6 matches such as clock times
//! or MAC addresses are dropped there.

use once_cell::sync::Lazy;
use regex::Regex;

/// IPv4 dotted quad with every part in 0..=255
pub static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)")
        .expect("Failed to compile IPv4 regex")
});

/// IPv6 candidate: colon-separated hex groups, optional trailing dotted
/// quad and `%zone`
pub static IPV6_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[0-9A-Fa-f]{0,4}:){2,7}(?:(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)|[0-9A-Fa-f]{1,4})?(?:%[0-9A-Za-z]+)?",
    )
    .expect("Failed to compile IPv6 regex")
});

/// A literal found in text: byte offsets `start..end` and the matched text
pub type Match = (usize, usize, String);

fn find_all(re: &Regex, text: &str) -> Vec<Match> {
    re.find_iter(text)
        .filter(|m| is_standalone(text, m.start(), m.end()))
        .map(|m| (m.start(), m.end(), m.as_str().to_string()))
        .collect()
}

/// Reject matches glued to surrounding words or numbers (`v1.2.3.4`,
/// `1.2.3.4.5`, `std::vec`)
fn is_standalone(text: &str, start: usize, end: usize) -> bool {
    !is_glued(text[..start].chars().rev()) && !is_glued(text[end..].chars())
}

/// Whether the characters walking away from a match continue a word
fn is_glued(mut side: impl Iterator<Item = char>) -> bool {
    let word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    match side.next() {
        Some(c) if word(c) => true,
        Some('.') => side.next().is_some_and(word),
        _ => false,
    }
}

/// Find all IPv4 addresses in text with their positions
pub fn find_ipv4(text: &str) -> Vec<Match> {
    find_all(&IPV4_RE, text)
}

/// Find all IPv6 address candidates in text with their positions
pub fn find_ipv6(text: &str) -> Vec<Match> {
    find_all(&IPV6_RE, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_regex() {
        let text = "Server IP: 192.168.1.1 and 8.8.8.8.";
        let matches = find_ipv4(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], (11, 22, "192.168.1.1".to_string()));
        assert_eq!(matches[1].2, "8.8.8.8");
    }

    #[test]
    fn test_ipv4_glued_to_text() {
        assert!(find_ipv4("Invalid: 999.999.999.999").is_empty());
        assert!(find_ipv4("version v1.2.3.4 and 1.2.3.4.5").is_empty());
        assert_eq!(find_ipv4("connect 10.0.0.1:8080")[0].2, "10.0.0.1");
    }

    #[test]
    fn test_ipv6_regex() {
        let text = "IPv6: 2001:0db8::1 and ::1, mapped ::ffff:1.2.3.4";
        let found: Vec<String> = find_ipv6(text).into_iter().map(|m| m.2).collect();
        assert_eq!(found, vec!["2001:0db8::1", "::1", "::ffff:1.2.3.4"]);

        let zoned = find_ipv6("ping fe80::1%eth0");
        assert_eq!(zoned[0].2, "fe80::1%eth0");
    }

    #[test]
    fn test_ipv6_skips_paths() {
        assert!(find_ipv6("use std::vec::Vec;").is_empty());
    }
}
