//! Validation utilities for hetzname
//!
//! This module provides validation functions for command-line inputs:
//! zone and record names, provider IDs, TTLs and addresses. All of them run
//! before the first network call.

use std::net::IpAddr;

use crate::constants::{MAX_ID_LENGTH, MAX_LABEL_LENGTH, MAX_RECORD_NAME_LENGTH};
use crate::error::ConfigError;

/// Validates a record name as the Hetzner API expects it
///
/// Record names are relative to their zone, so `dyn`, `@` (the apex),
/// `*.dyn` and `_acme-challenge` are all valid.
///
/// # Validation Rules
///
/// 1. **Length constraints**:
///    - Maximum total length: 253 characters (excluding trailing dot)
///    - Maximum label length: 63 characters
///
/// 2. **Syntax rules**:
///    - Labels are separated by dots and may not be empty
///    - Labels cannot start or end with hyphens
///    - No whitespace
///
/// 3. **Allowed characters**: letters, digits, `-`, `_`, and `*` as a
///    complete label
///
/// # Examples
///
/// ```
/// use hetzname::validation::validate_record_name;
///
/// assert!(validate_record_name("@").is_ok());
/// assert!(validate_record_name("dyn").is_ok());
/// assert!(validate_record_name("*.dyn").is_ok());
/// assert!(validate_record_name("_acme-challenge").is_ok());
///
/// assert!(validate_record_name("").is_err());
/// assert!(validate_record_name("dyn..home").is_err());
/// assert!(validate_record_name("-dyn").is_err());
/// ```
pub fn validate_record_name(record_name: &str) -> Result<(), ConfigError> {
    if record_name == "@" {
        return Ok(());
    }
    validate_dns_name("record name", record_name, true)
}

/// Validates a zone (apex domain) name such as `example.com`
///
/// Zone names follow the same label rules as record names but never
/// contain wildcards and may not be `@`.
pub fn validate_zone_name(zone_name: &str) -> Result<(), ConfigError> {
    validate_dns_name("zone name", zone_name, false)
}

fn validate_dns_name(field: &'static str, value: &str, allow_wildcard: bool) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::invalid(field, value, reason);

    if value.trim().is_empty() {
        return Err(invalid("cannot be empty".to_string()));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid("cannot contain whitespace".to_string()));
    }

    let name = value.strip_suffix('.').unwrap_or(value);
    if name.is_empty() {
        return Err(invalid("cannot be empty".to_string()));
    }
    if name.len() > MAX_RECORD_NAME_LENGTH {
        return Err(invalid(format!(
            "too long (max {} characters, got {})",
            MAX_RECORD_NAME_LENGTH,
            name.len()
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("contains an empty label".to_string()));
        }
        if label == "*" {
            if allow_wildcard {
                continue;
            }
            return Err(invalid("cannot contain a wildcard".to_string()));
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(invalid(format!(
                "label too long (max {} characters, got {})",
                MAX_LABEL_LENGTH,
                label.len()
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label cannot start or end with a hyphen".to_string()));
        }
        if let Some(ch) = label
            .chars()
            .find(|ch| !ch.is_alphanumeric() && *ch != '-' && *ch != '_')
        {
            return Err(invalid(format!("invalid character '{}'", ch)));
        }
    }

    Ok(())
}

/// Validates a zone or record ID
///
/// IDs are opaque alphanumeric tokens issued by the provider. They end up
/// in URL paths, so anything else is rejected up front.
pub fn validate_id(field: &'static str, id: &str) -> Result<(), ConfigError> {
    if id.is_empty() {
        return Err(ConfigError::invalid(field, id, "cannot be empty"));
    }
    if id.len() > MAX_ID_LENGTH {
        return Err(ConfigError::invalid(
            field,
            id,
            format!("too long (max {} characters, got {})", MAX_ID_LENGTH, id.len()),
        ));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::invalid(field, id, "must be alphanumeric"));
    }
    Ok(())
}

/// Parses a TTL given in seconds; it must be a positive integer
pub fn parse_ttl(value: &str) -> Result<u32, ConfigError> {
    let ttl: u32 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid("TTL", value, "must be a positive integer"))?;
    if ttl == 0 {
        return Err(ConfigError::invalid("TTL", value, "must be a positive integer"));
    }
    Ok(ttl)
}

/// Whether an address is worth publishing in a public DNS record
///
/// Rejects addresses that can never reach this host from elsewhere:
/// unspecified, loopback, multicast, link-local and (IPv4) broadcast.
/// Documentation and private ranges are accepted; split-horizon setups
/// publish those on purpose.
pub fn is_publishable_ip(ip: &IpAddr) -> bool {
    if ip.is_unspecified() || ip.is_loopback() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !v4.is_link_local() && !v4.is_broadcast(),
        // Link-local addresses have first 10 bits as 1111111010
        IpAddr::V6(v6) => v6.segments()[0] & 0xffc0 != 0xfe80,
    }
}
