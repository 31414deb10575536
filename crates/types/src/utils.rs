//! Utility functions and helpers

use std::net::{IpAddr, Ipv6Addr};

/// Validate a network host (hostname or IP literal)
pub fn is_valid_host(host: &str) -> bool {
    !host.trim().is_empty() && !host.chars().any(char::is_whitespace)
}

/// Check whether a host refers to the local machine
pub fn is_loopback_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let literal = host.trim_start_matches('[').trim_end_matches(']');
    literal
        .parse::<IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

/// Build the HTTP endpoint for a host and port
pub fn http_endpoint(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("http://[{}]:{}", host, port)
    } else {
        format!("http://{}:{}", host, port)
    }
}

/// Sanitize string for logging (remove sensitive data)
pub fn sanitize_for_logging(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 10 {
        return s.to_string();
    }

    // Show first 6 and last 4 characters for hashes/addresses
    if s.starts_with("0x") && chars.len() > 20 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_validation() {
        assert!(is_valid_host("127.0.0.1"));
        assert!(is_valid_host("localhost"));
        assert!(is_valid_host("::1"));
        assert!(!is_valid_host(""));
        assert!(!is_valid_host("   "));
        assert!(!is_valid_host("local host"));
    }

    #[test]
    fn test_loopback_detection() {
        assert!(is_loopback_host("127.0.0.1"));
        assert!(is_loopback_host("LOCALHOST"));
        assert!(is_loopback_host("::1"));
        assert!(is_loopback_host("[::1]"));
        assert!(!is_loopback_host("10.0.0.5"));
        assert!(!is_loopback_host("ganache.internal"));
    }

    #[test]
    fn test_http_endpoint() {
        assert_eq!(http_endpoint("127.0.0.1", 7545), "http://127.0.0.1:7545");
        assert_eq!(http_endpoint("::1", 8545), "http://[::1]:8545");
        assert_eq!(http_endpoint("localhost", 8545), "http://localhost:8545");
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(
            sanitize_for_logging("0x1234567890123456789012345678901234567890"),
            "0x1234...7890"
        );
        assert_eq!(sanitize_for_logging("short"), "short");
        assert_eq!(sanitize_for_logging("ganache.internal"), "ganache.internal");
    }

    #[test]
    fn test_sanitize_multibyte() {
        assert_eq!(
            sanitize_for_logging("0x1ééééééééééééééééééé"),
            "0x1ééé...éééé"
        );
        assert_eq!(sanitize_for_logging("0xéé"), "0xéé");
        assert_eq!(
            sanitize_for_logging("0x12345678901234567890123456789012345678✓"),
            "0x1234...678✓"
        );
    }
}
