//! Validation utilities for yadns
//!
//! This module provides validation functions for domain names and the
//! IPv4 strings returned by IP-echo services.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH};
use crate::error::{Error, Result};

lazy_static! {
    /// Dotted-quad IPv4, each octet 0-255 written with at most three digits
    static ref IPV4_PATTERN: Regex = Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$"
    )
    .expect("static IPv4 pattern");
}

/// Validates that a string is a usable zone name for the PDD API
///
/// # Validation Rules
///
/// - total length at most 253 characters (trailing dot ignored)
/// - labels 1-63 characters, separated by single dots
/// - labels made of letters, digits and hyphens, not starting or ending with a hyphen
///
/// Unlike record names, the zone itself cannot be `@` or a wildcard.
///
/// # Examples
///
/// ```
/// use yadns::validation::validate_domain;
///
/// assert!(validate_domain("example.com").is_ok());
/// assert!(validate_domain("xn--80ak6aa92e.com").is_ok());
/// assert!(validate_domain("example..com").is_err());
/// assert!(validate_domain("*.example.com").is_err());
/// ```
pub fn validate_domain(domain: &str) -> Result<()> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::config("Domain cannot be empty"));
    }
    if trimmed.contains(' ') {
        return Err(Error::config("Domain cannot contain spaces"));
    }

    let name = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if name.is_empty() {
        return Err(Error::config("Domain cannot be empty"));
    }
    let name_chars = name.chars().count();
    if name_chars > MAX_DOMAIN_LENGTH {
        return Err(Error::config(format!(
            "Domain too long (max {} characters, got {})",
            MAX_DOMAIN_LENGTH, name_chars
        )));
    }
    if name.starts_with('.') {
        return Err(Error::config("Domain cannot start with a dot"));
    }
    if name.contains("..") {
        return Err(Error::config("Domain cannot contain consecutive dots"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(Error::config("Domain contains empty label"));
        }
        let label_chars = label.chars().count();
        if label_chars > MAX_LABEL_LENGTH {
            return Err(Error::config(format!(
                "Domain label too long (max {} characters, got {})",
                MAX_LABEL_LENGTH, label_chars
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config("Domain label cannot start or end with hyphen"));
        }
        if let Some(ch) = label.chars().find(|c| !c.is_alphanumeric() && *c != '-') {
            return Err(Error::config(format!(
                "Domain contains invalid character: '{}' (allowed: letters, digits, '-')",
                ch
            )));
        }
    }

    Ok(())
}

/// Checks a string against the strict dotted-quad IPv4 pattern
///
/// Leading zeros are tolerated up to three digits per octet (`010.0.0.1`),
/// which is how IP-echo services occasionally pad their answers. Anything
/// with surrounding whitespace, fewer than four octets or an octet above 255
/// is rejected.
///
/// ```
/// use yadns::validation::is_valid_ipv4;
///
/// assert!(is_valid_ipv4("203.0.113.7"));
/// assert!(!is_valid_ipv4("999.1.1.1"));
/// ```
pub fn is_valid_ipv4(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}
