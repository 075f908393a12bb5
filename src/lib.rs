//! hetzname - single-shot dynamic DNS client for Hetzner DNS
//!
//! One invocation points one A or AAAA record at this host's public address:
//! - Zone and record are given by name or by ID
//! - A named record that does not exist yet is created
//! - At most one write request per run; none in dry-run mode
//! - Uses reqwest for HTTP (rustls)

pub mod cli;
pub mod config;
pub mod constants;
pub mod dns_provider;
pub mod error;
pub mod hetzner;
pub mod public_ip;
pub mod reconciler;
pub mod resolver;
pub mod sync;
pub mod types;
pub mod validation;
