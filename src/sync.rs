//! One reconciliation run
//!
//! Resolve the zone, resolve the record, settle its type, learn the address,
//! then reconcile.
//! Each step only starts once the previous one succeeded; the first error
//! ends the run.

use tracing::{debug, info};

use crate::config::Config;
use crate::dns_provider::DnsApi;
use crate::error::{ConfigError, Result};
use crate::hetzner::HetznerClient;
use crate::public_ip::{FixedIp, HttpIpProvider, PublicIpProvider};
use crate::reconciler::{Outcome, Reconciler};
use crate::resolver::{record_type_for, Resolver};
use crate::types::DesiredRecord;

/// Runs against the live Hetzner API
pub async fn run(config: &Config) -> Result<Outcome> {
    let api = HetznerClient::new(config.api_token.as_str(), &config.api_base, config.timeout)?;
    debug!("Using {:?}", api);

    match config.ip {
        Some(ip) => run_with(config, &api, &FixedIp(ip)).await,
        None => {
            let provider = HttpIpProvider::new(&config.ipv4_url, &config.ipv6_url, config.timeout)?;
            run_with(config, &api, &provider).await
        }
    }
}

/// Runs with the given API and address source
pub async fn run_with<A, P>(config: &Config, api: &A, ip_provider: &P) -> Result<Outcome>
where
    A: DnsApi + ?Sized,
    P: PublicIpProvider + ?Sized,
{
    info!(
        "hetzname starting: zone={}, record={}, type={}, ttl={}{}",
        describe(config.zone.name.as_deref(), config.zone.id.as_deref()),
        describe(config.record.name.as_deref(), config.record.id.as_deref()),
        config
            .record_type
            .map_or_else(|| "auto".to_string(), |t| t.to_string()),
        config
            .ttl
            .map_or_else(|| "zone default".to_string(), |t| t.to_string()),
        if config.dry_run { " (dry run)" } else { "" },
    );

    let resolver = Resolver::new(api);
    let zone = resolver.resolve_zone(&config.zone).await?;
    debug!("Resolved zone {}", zone);

    let target = resolver.resolve_record(&zone, &config.record).await?;
    debug!("Resolved record {:?}", target);

    let record_type = record_type_for(&target, config.record_type)?;
    let value = ip_provider.current(record_type).await?;
    if !record_type.accepts(&value) {
        return Err(ConfigError::invalid(
            "IP address",
            value.to_string(),
            format!("does not fit a {} record", record_type),
        )
        .into());
    }
    let desired = DesiredRecord {
        record_type,
        ttl: config.ttl,
        value,
    };

    let outcome = Reconciler::new(api, config.dry_run)
        .reconcile(&zone, target, &desired)
        .await?;
    info!("{}", outcome);
    Ok(outcome)
}

fn describe(name: Option<&str>, id: Option<&str>) -> String {
    match (name, id) {
        (Some(name), _) => format!("'{}'", name),
        (None, Some(id)) => format!("id {}", id),
        (None, None) => "-".to_string(),
    }
}
