//! URL safety validation for caller-supplied share URLs.
//!
//! The service fetches whatever URL the caller hands it, so the
//! orchestrator refuses targets that would reach internal services:
//! - localhost and loopback addresses
//! - private IP ranges (10.x, 172.16.x, 192.168.x)
//! - cloud metadata services (169.254.x)
//! - non-HTTP(S) schemes

use std::collections::HashSet;
use std::net::IpAddr;

use url::Url;

use crate::error::{ResolveError, Result};

/// Validator applied to every inbound share URL before any fetch.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    /// Allowed URL schemes
    allowed_schemes: HashSet<String>,

    /// Blocked hostnames
    blocked_hosts: HashSet<String>,

    /// Blocked CIDR ranges
    blocked_cidrs: Vec<ipnet::IpNet>,

    /// Additional allowed hosts (bypass normal validation)
    allowed_hosts: HashSet<String>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlValidator {
    /// Create a validator with the default security rules.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"]
                .into_iter()
                .map(String::from)
                .collect(),
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "::1",
                "[::1]",
                "0.0.0.0",
                "metadata.google.internal",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs: vec![
                "10.0.0.0/8".parse().unwrap(),
                "172.16.0.0/12".parse().unwrap(),
                "192.168.0.0/16".parse().unwrap(),
                "169.254.0.0/16".parse().unwrap(), // Link-local / cloud metadata
                "127.0.0.0/8".parse().unwrap(),    // Loopback
                "::1/128".parse().unwrap(),        // IPv6 loopback
                "fc00::/7".parse().unwrap(),       // IPv6 private
                "fe80::/10".parse().unwrap(),      // IPv6 link-local
            ],
            allowed_hosts: HashSet::new(),
        }
    }

    /// Add an allowed host (bypasses validation).
    pub fn allow_host(mut self, host: impl Into<String>) -> Self {
        self.allowed_hosts.insert(host.into());
        self
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into());
        self
    }

    /// Validate a URL for safety.
    pub fn validate(&self, url: &Url) -> Result<()> {
        if !self.allowed_schemes.contains(url.scheme()) {
            return Err(ResolveError::Blocked {
                reason: format!("disallowed scheme: {}", url.scheme()),
            });
        }

        let host = url.host_str().ok_or_else(|| ResolveError::Blocked {
            reason: "URL has no host".to_string(),
        })?;

        // Allowed hosts bypass the remaining checks
        if self.allowed_hosts.contains(host) {
            return Ok(());
        }

        if self.blocked_hosts.contains(host) {
            return Err(ResolveError::Blocked {
                reason: format!("blocked host: {}", host),
            });
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            for cidr in &self.blocked_cidrs {
                if cidr.contains(&ip) {
                    return Err(ResolveError::Blocked {
                        reason: format!("blocked IP range: {}", ip),
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(validator: &UrlValidator, url: &str) -> Result<()> {
        validator.validate(&Url::parse(url).unwrap())
    }

    #[test]
    fn test_blocks_localhost() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://localhost/").is_err());
        assert!(check(&validator, "http://127.0.0.1/").is_err());
        assert!(check(&validator, "http://[::1]/").is_err());
    }

    #[test]
    fn test_blocks_private_ips() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://10.0.0.1/").is_err());
        assert!(check(&validator, "http://172.16.0.1/").is_err());
        assert!(check(&validator, "http://192.168.1.1/").is_err());
    }

    #[test]
    fn test_blocks_metadata_services() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "http://169.254.169.254/").is_err());
        assert!(check(&validator, "http://metadata.google.internal/").is_err());
    }

    #[test]
    fn test_allows_public_urls() {
        let validator = UrlValidator::new();
        assert!(check(&validator, "https://files.example.com/view/abc").is_ok());
    }

    #[test]
    fn test_allowed_hosts_bypass() {
        let validator = UrlValidator::new().allow_host("localhost");
        assert!(check(&validator, "http://localhost/").is_ok());
    }
}
