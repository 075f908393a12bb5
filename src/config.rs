//! Configuration module for hetzname
//!
//! This module assembles and validates everything a run needs from the
//! command line, environment variables and an optional TOML file. Nothing
//! here touches the network, so every input error surfaces before the first
//! request.

use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;
use zeroize::Zeroizing;

use crate::cli::Args;
use crate::constants::{
    DEFAULT_IPV4_URL, DEFAULT_IPV6_URL, DEFAULT_TIMEOUT_SECS, ENV_API_BASE, ENV_API_TOKEN,
    ENV_TIMEOUT, HETZNER_API_BASE, MAX_TIMEOUT_SECS, MIN_TIMEOUT_SECS,
};
use crate::error::{ConfigError, Result};
use crate::types::{RecordRef, RecordType, ZoneRef};
use crate::validation::{
    is_publishable_ip, parse_ttl, validate_id, validate_record_name, validate_zone_name,
};

//==============================================================================
// Config
//==============================================================================

/// Everything one invocation needs
///
/// # Configuration Loading Priority
///
/// 1. Command-line flags (highest priority)
/// 2. Environment variables
/// 3. Config file (`--config PATH`, skipped if the file does not exist)
/// 4. Defaults (lowest priority)
///
/// The API token is only ever taken from `HETZNAME_API_TOKEN`; the config
/// file refuses an `api_token` key.
#[derive(Clone)]
pub struct Config {
    /// Hetzner DNS API token, cleared from memory on drop
    pub api_token: Zeroizing<String>,
    /// API base URL, overridable for testing against a mock server
    pub api_base: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Echo service used to discover the public IPv4 address
    pub ipv4_url: String,
    /// Echo service used to discover the public IPv6 address
    pub ipv6_url: String,
    pub verbose: bool,
    pub dry_run: bool,
    pub zone: ZoneRef,
    pub record: RecordRef,
    /// `None` when `-T` was not given; see [`Config::requested_type`]
    pub record_type: Option<RecordType>,
    /// `None` leaves the TTL to the zone default
    pub ttl: Option<u32>,
    /// Explicit address; `None` means discover it
    pub ip: Option<IpAddr>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("ipv4_url", &self.ipv4_url)
            .field("ipv6_url", &self.ipv6_url)
            .field("verbose", &self.verbose)
            .field("dry_run", &self.dry_run)
            .field("zone", &self.zone)
            .field("record", &self.record)
            .field("record_type", &self.record_type)
            .field("ttl", &self.ttl)
            .field("ip", &self.ip)
            .finish()
    }
}

impl Config {
    /// Builds the configuration for one run
    ///
    /// Flag values are validated before the token is looked up, so a bad
    /// flag is reported even when the environment is incomplete.
    ///
    /// # Errors
    ///
    /// - `ConfigError::ConflictingIdentifiers` when a zone or record is given
    ///   both by name and by ID
    /// - `ResolutionError::AmbiguousTarget` when a zone or record is missing
    /// - `ConfigError::InvalidValue` for malformed names, IDs, TTL, type,
    ///   address, timeout or URLs
    /// - `ConfigError::MissingCredential` when `HETZNAME_API_TOKEN` is unset
    /// - `ConfigError::File` when the config file cannot be read or parsed
    pub fn load(args: Args) -> Result<Self> {
        let mut config = Self::load_from_file(args.config.as_deref())?;
        Self::override_with_env(&mut config)?;
        config.apply_args(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads settings from a TOML file, falling back to defaults
    fn load_from_file(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self {
            api_token: Zeroizing::new(String::new()),
            api_base: HETZNER_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            ipv4_url: DEFAULT_IPV4_URL.to_string(),
            ipv6_url: DEFAULT_IPV6_URL.to_string(),
            verbose: false,
            dry_run: false,
            zone: ZoneRef::default(),
            record: RecordRef::default(),
            record_type: None,
            ttl: None,
            ip: None,
        };

        if let Some(path) = config_path {
            if path.exists() {
                let toml_config = read_toml_config(path).map_err(ConfigError::File)?;
                if let Some(v) = toml_config.api_base {
                    config.api_base = v;
                }
                if let Some(v) = toml_config.timeout {
                    config.timeout = Duration::from_secs(v);
                }
                if let Some(v) = toml_config.ipv4_url {
                    config.ipv4_url = v;
                }
                if let Some(v) = toml_config.ipv6_url {
                    config.ipv6_url = v;
                }
                config.verbose = toml_config.verbose.unwrap_or(false);
            }
        }

        Ok(config)
    }

    /// Overrides configuration values with non-empty environment variables
    fn override_with_env(config: &mut Self) -> Result<()> {
        if let Ok(v) = env::var(ENV_API_TOKEN) {
            if !v.is_empty() {
                config.api_token = Zeroizing::new(v);
            }
        }
        if let Ok(v) = env::var(ENV_API_BASE) {
            if !v.is_empty() {
                config.api_base = v;
            }
        }
        if let Ok(v) = env::var(ENV_TIMEOUT) {
            if !v.is_empty() {
                let secs: u64 = v.trim().parse().map_err(|_| {
                    ConfigError::invalid(ENV_TIMEOUT, v.as_str(), "expected a number of seconds")
                })?;
                config.timeout = Duration::from_secs(secs);
            }
        }
        Ok(())
    }

    /// Applies command-line flags, parsing the typed ones
    fn apply_args(&mut self, args: Args) -> Result<()> {
        self.zone = ZoneRef {
            name: args.zone_name,
            id: args.zone_id,
        };
        self.record = RecordRef {
            name: args.record_name,
            id: args.record_id,
        };
        if let Some(v) = args.record_type.as_deref() {
            self.record_type = Some(v.parse()?);
        }
        if let Some(v) = args.ttl.as_deref() {
            self.ttl = Some(parse_ttl(v)?);
        }
        if let Some(v) = args.ip.as_deref() {
            let ip: IpAddr = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("IP address", v, "not an IPv4 or IPv6 address"))?;
            self.ip = Some(ip);
        }
        self.dry_run = args.dry_run;
        self.verbose |= args.verbose;
        Ok(())
    }

    /// Record type to use when no existing record dictates one
    pub fn requested_type(&self) -> RecordType {
        self.record_type.unwrap_or_default()
    }

    /// Validates the assembled configuration
    fn validate(&self) -> Result<()> {
        self.zone.handle()?;
        self.record.handle()?;

        if let Some(name) = &self.zone.name {
            validate_zone_name(name)?;
        }
        if let Some(id) = &self.zone.id {
            validate_id("zone ID", id)?;
        }
        if let Some(name) = &self.record.name {
            validate_record_name(name)?;
        }
        if let Some(id) = &self.record.id {
            validate_id("record ID", id)?;
        }

        if let Some(ip) = &self.ip {
            // A record given by ID without -T takes its type from the provider
            let known_type = match self.record.id {
                Some(_) => self.record_type,
                None => Some(self.requested_type()),
            };
            if let Some(record_type) = known_type {
                if !record_type.accepts(ip) {
                    return Err(ConfigError::invalid(
                        "IP address",
                        ip.to_string(),
                        format!("does not fit a {} record", record_type),
                    )
                    .into());
                }
            }
            if !is_publishable_ip(ip) {
                return Err(
                    ConfigError::invalid("IP address", ip.to_string(), "not a public address").into(),
                );
            }
        }

        let timeout_secs = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(ConfigError::invalid(
                "timeout",
                timeout_secs.to_string(),
                format!(
                    "must be between {} and {} seconds",
                    MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS
                ),
            )
            .into());
        }

        validate_url("API base URL", &self.api_base)?;
        validate_url("IPv4 discovery URL", &self.ipv4_url)?;
        validate_url("IPv6 discovery URL", &self.ipv6_url)?;

        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential(ENV_API_TOKEN).into());
        }
        if self.api_token.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ConfigError::invalid(
                ENV_API_TOKEN,
                "<redacted>",
                "contains whitespace or control characters",
            )
            .into());
        }

        Ok(())
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| ConfigError::invalid(field, value, e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::invalid(field, value, "must be an http or https URL").into());
    }
    Ok(())
}

/// TOML configuration file structure
#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    api_base: Option<String>,
    timeout: Option<u64>,
    ipv4_url: Option<String>,
    ipv6_url: Option<String>,
    verbose: Option<bool>,
}

fn read_toml_config(path: &Path) -> anyhow::Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

//==============================================================================
// Tests
//==============================================================================
