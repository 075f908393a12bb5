//! Error types for hetzname
//!
//! Errors fall into three families, all of them terminal for the run:
//! configuration problems caught before any network call, resolution
//! failures while locating the zone or record, and transport failures
//! talking to an HTTP endpoint.

use std::fmt;

use thiserror::Error;

use crate::types::RecordType;

/// Result type alias for hetzname operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which identifier an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Zone,
    Record,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Zone => f.write_str("zone"),
            TargetKind::Record => f.write_str("record"),
        }
    }
}

/// Top-level error for a single invocation
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Invalid or missing user input
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The API token environment variable is unset or empty
    #[error("no API token provided, set {0} and try again")]
    MissingCredential(&'static str),

    /// A flag, environment variable or file key has an unusable value
    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Both a name and an ID were given for the same target
    #[error("specify the {kind} by name or by ID, not both (got name '{name}' and ID '{id}')")]
    ConflictingIdentifiers {
        kind: TargetKind,
        name: String,
        id: String,
    },

    /// The TOML config file could not be read or parsed
    #[error("{0:#}")]
    File(anyhow::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to turn the user's identifiers into concrete API objects
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("can't find {kind} '{value}'")]
    NotFound { kind: TargetKind, value: String },

    /// Neither a name nor an ID was supplied
    #[error("a {kind} must be specified by name or by ID")]
    AmbiguousTarget { kind: TargetKind },

    /// A record looked up by ID lives in another zone
    #[error("record '{record_id}' belongs to zone '{record_zone}', not to zone '{zone}'")]
    ZoneMismatch {
        record_id: String,
        record_zone: String,
        zone: String,
    },

    /// A record looked up by ID is not an address record
    #[error("record '{record_id}' is a {record_type} record, only A and AAAA records can be updated")]
    UnsupportedType {
        record_id: String,
        record_type: String,
    },

    /// A record looked up by ID has a different type than requested
    #[error("record '{record_id}' is a {existing} record, not {requested}")]
    TypeMismatch {
        record_id: String,
        existing: RecordType,
        requested: RecordType,
    },
}

/// Failure talking to an HTTP endpoint
#[derive(Error, Debug)]
pub enum TransportError {
    /// DNS, connect, TLS, timeout or body-read failure
    #[error("request to {path} failed: {source}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{path} returned HTTP {status}: {message}")]
    Http {
        path: String,
        status: u16,
        message: String,
    },

    /// The body could not be interpreted
    #[error("malformed response from {path}: {reason}")]
    Parse { path: String, reason: String },
}

impl TransportError {
    pub fn parse(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the HTTP status if the server answered with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Replaces every occurrence of the API token with a placeholder
///
/// Diagnostics may quote request paths or provider messages; this keeps the
/// token out of whatever ends up on stderr.
#[must_use]
pub fn redact_secrets(message: &str, api_token: &str) -> String {
    if api_token.is_empty() {
        return message.to_string();
    }
    message.replace(api_token, "***REDACTED***")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_value() {
        let err = Error::from(ResolutionError::NotFound {
            kind: TargetKind::Zone,
            value: "example.com".to_string(),
        });
        assert_eq!(err.to_string(), "can't find zone 'example.com'");
    }

    #[test]
    fn test_conflicting_identifiers_message() {
        let err = ConfigError::ConflictingIdentifiers {
            kind: TargetKind::Record,
            name: "dyn".to_string(),
            id: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("record"));
        assert!(msg.contains("'dyn'"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn test_http_status_accessor() {
        let err = TransportError::Http {
            path: "/zones/x".to_string(),
            status: 404,
            message: "zone not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(TransportError::parse("/zones", "eof").status(), None);
    }

    #[test]
    fn test_redact_secrets() {
        let redacted = redact_secrets("token secret123 leaked", "secret123");
        assert!(!redacted.contains("secret123"));
        assert!(redacted.contains("***REDACTED***"));
        assert_eq!(redact_secrets("nothing here", ""), "nothing here");
    }
}
