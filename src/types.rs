//! Zone and record types shared by the resolver, reconciler and API client

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

//==============================================================================
// Record Type
//==============================================================================

/// Address record types this client can manage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    #[default]
    A,
    AAAA,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
        }
    }

    /// Whether `ip` is of the address family this record type holds
    pub fn accepts(&self, ip: &IpAddr) -> bool {
        matches!(
            (self, ip),
            (RecordType::A, IpAddr::V4(_)) | (RecordType::AAAA, IpAddr::V6(_))
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("A") {
            Ok(RecordType::A)
        } else if s.eq_ignore_ascii_case("AAAA") {
            Ok(RecordType::AAAA)
        } else {
            Err(ConfigError::invalid(
                "record type",
                s,
                "must be 'A' or 'AAAA'",
            ))
        }
    }
}

//==============================================================================
// User-supplied identifiers
//==============================================================================

/// A zone as identified on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneRef {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// A record as identified on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordRef {
    pub name: Option<String>,
    pub id: Option<String>,
}

/// What the record should look like after the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecord {
    pub record_type: RecordType,
    /// `None` leaves the TTL to the zone default
    pub ttl: Option<u32>,
    pub value: IpAddr,
}

//==============================================================================
// Resolved identifiers
//==============================================================================

/// A zone with both its ID and name known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedZone {
    pub id: String,
    pub name: String,
}

impl From<Zone> for ResolvedZone {
    fn from(zone: Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
        }
    }
}

impl fmt::Display for ResolvedZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// The record handle the reconciler acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Looked up by ID; it exists and belongs to the zone
    Existing(Record),
    /// Only a name is known; it may or may not exist yet
    Named(String),
}

//==============================================================================
// Wire types
//==============================================================================

/// A zone as returned by the Hetzner DNS API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// A record as returned by the Hetzner DNS API
///
/// The type is kept as the provider's string since zone listings also
/// contain MX, TXT and other records this client never touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.record_type, self.name, self.value)?;
        if let Some(ttl) = self.ttl {
            write!(f, " (TTL: {})", ttl)?;
        }
        Ok(())
    }
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl fmt::Display for RecordPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.record_type, self.name, self.value)?;
        match self.ttl {
            Some(ttl) => write!(f, " (TTL: {})", ttl),
            None => write!(f, " (TTL: zone default)"),
        }
    }
}

//==============================================================================
// Tests
//==============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parsing() {
        assert_eq!("A".parse::<RecordType>().unwrap(), RecordType::A);
        assert_eq!("aaaa".parse::<RecordType>().unwrap(), RecordType::AAAA);
        let err = "CNAME".parse::<RecordType>().unwrap_err();
        assert!(err.to_string().contains("CNAME"));
        assert!("".parse::<RecordType>().is_err());
        assert_eq!(RecordType::default(), RecordType::A);
    }

    #[test]
    fn test_record_type_accepts_family() {
        let v4: IpAddr = "203.0.113.7".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(RecordType::A.accepts(&v4));
        assert!(!RecordType::A.accepts(&v6));
        assert!(RecordType::AAAA.accepts(&v6));
        assert!(!RecordType::AAAA.accepts(&v4));
    }

    #[test]
    fn test_payload_omits_missing_ttl() {
        let payload = RecordPayload {
            zone_id: "z1".to_string(),
            record_type: RecordType::AAAA,
            name: "dyn".to_string(),
            value: "2001:db8::1".to_string(),
            ttl: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "zone_id": "z1",
                "type": "AAAA",
                "name": "dyn",
                "value": "2001:db8::1"
            })
        );

        let with_ttl = RecordPayload {
            ttl: Some(500),
            ..payload
        };
        let json = serde_json::to_value(&with_ttl).unwrap();
        assert_eq!(json["ttl"], 500);
    }

    #[test]
    fn test_record_parsing_ignores_extra_fields() {
        let json = r#"{
            "id": "rec1",
            "type": "MX",
            "name": "@",
            "value": "10 mail.example.com.",
            "zone_id": "zone1",
            "created": "2023-01-01 00:00:00 +0000 UTC",
            "modified": "2023-01-01 00:00:00 +0000 UTC"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_type, "MX");
        assert_eq!(record.ttl, None);
    }

    #[test]
    fn test_record_display() {
        let record = Record {
            id: "rec1".to_string(),
            zone_id: "zone1".to_string(),
            record_type: "A".to_string(),
            name: "dyn".to_string(),
            value: "203.0.113.7".to_string(),
            ttl: Some(60),
        };
        assert_eq!(record.to_string(), "A dyn -> 203.0.113.7 (TTL: 60)");
    }
}
