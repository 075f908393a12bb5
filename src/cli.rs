//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

const ABOUT: &str = "Dynamic DNS client for Hetzner";

const LONG_ABOUT: &str = "\
Idempotently ensure a Hetzner DNS record is set to this computer's public IP address.
A record will be created if it does not exist. A zone for the record must be
specified either with a ZONE_NAME or a ZONE_ID, and the record either with a
RECORD_NAME or a RECORD_ID.

The API token is read from the HETZNAME_API_TOKEN environment variable.";

const EXAMPLES: &str = "\
Examples:
  hetzname -z example.com -r dyn -T AAAA
      Point the 'dyn' AAAA record of 'example.com' at this computer's current
      public IPv6 address, creating it if needed.

  hetzname -Z fdnjsks2345 -R dnsklfnsfewihf -t 500
      Update a record given by ID in a zone given by ID to this computer's
      public IPv4 address with a time-to-live of 500 seconds.

  hetzname -z example.com -R 2ndjsaff3
      Update a record given by ID in the zone 'example.com'.";

#[derive(Debug, Clone, Parser)]
#[command(name = "hetzname", version, about = ABOUT, long_about = LONG_ABOUT, after_help = EXAMPLES)]
pub struct Args {
    /// Name of the zone to operate in, usually an apex domain
    #[arg(short = 'z', long = "zone-name", value_name = "ZONE_NAME")]
    pub zone_name: Option<String>,

    /// ID of the zone to operate in
    #[arg(short = 'Z', long = "zone-id", value_name = "ZONE_ID")]
    pub zone_id: Option<String>,

    /// Name of the record to update or create, usually a subdomain
    #[arg(short = 'r', long = "record-name", value_name = "RECORD_NAME")]
    pub record_name: Option<String>,

    /// ID of an existing record to update
    #[arg(short = 'R', long = "record-id", value_name = "RECORD_ID")]
    pub record_id: Option<String>,

    /// Time-to-live in seconds; the zone default is used when omitted
    #[arg(short = 't', long = "ttl", value_name = "TTL")]
    pub ttl: Option<String>,

    /// Record type: 'A' for IPv4 or 'AAAA' for IPv6. Defaults to A, or to
    /// the existing record's type when it is given by ID
    #[arg(short = 'T', long = "type", value_name = "TYPE")]
    pub record_type: Option<String>,

    /// Use this address instead of discovering the public one
    #[arg(short = 'i', long = "ip", value_name = "ADDRESS")]
    pub ip: Option<String>,

    /// Resolve everything and report the change without making it
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Optional TOML config file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "hetzname", "-Z", "zone1", "-R", "rec1", "-r", "dyn", "-t", "500", "-T", "AAAA",
        ])
        .unwrap();
        assert_eq!(args.zone_id.as_deref(), Some("zone1"));
        assert_eq!(args.record_id.as_deref(), Some("rec1"));
        assert_eq!(args.record_name.as_deref(), Some("dyn"));
        assert_eq!(args.ttl.as_deref(), Some("500"));
        assert_eq!(args.record_type.as_deref(), Some("AAAA"));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_help_is_a_display_error() {
        let err = Args::try_parse_from(["hetzname", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
