//! Record reconciliation
//!
//! Decides between create and update and issues exactly one of them.

use std::fmt;

use tracing::{debug, info};

use crate::dns_provider::DnsApi;
use crate::error::Result;
use crate::resolver::find_record;
use crate::types::{DesiredRecord, Record, RecordPayload, RecordTarget, ResolvedZone};

//==============================================================================
// Outcome
//==============================================================================

/// What a dry run would have done
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    Update { record_id: String },
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record did not exist and was created
    Created(Record),
    /// An existing record was written, possibly with an unchanged value
    Updated { previous_value: String, record: Record },
    /// Dry run: nothing was written
    Planned {
        action: PlannedAction,
        payload: RecordPayload,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(record) => write!(f, "Created {} [{}]", record, record.id),
            Outcome::Updated {
                previous_value,
                record,
            } if *previous_value == record.value => {
                write!(f, "Unchanged {} [{}]", record, record.id)
            }
            Outcome::Updated {
                previous_value,
                record,
            } => write!(
                f,
                "Updated {} [{}], was {}",
                record, record.id, previous_value
            ),
            Outcome::Planned {
                action: PlannedAction::Create,
                payload,
            } => write!(f, "Dry run: would create {}", payload),
            Outcome::Planned {
                action: PlannedAction::Update { record_id },
                payload,
            } => write!(f, "Dry run: would update [{}] to {}", record_id, payload),
        }
    }
}

//==============================================================================
// Reconciler
//==============================================================================

pub struct Reconciler<'a, A: DnsApi + ?Sized> {
    api: &'a A,
    dry_run: bool,
}

impl<'a, A: DnsApi + ?Sized> Reconciler<'a, A> {
    pub fn new(api: &'a A, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Brings the target record to the desired state
    ///
    /// A record known by ID is updated. A record known only by name is
    /// looked up in the zone listing (matching name and type) and updated if
    /// present, created otherwise. At most one write is issued, none in dry
    /// run mode.
    pub async fn reconcile(
        &self,
        zone: &ResolvedZone,
        target: RecordTarget,
        desired: &DesiredRecord,
    ) -> Result<Outcome> {
        let existing = match target {
            RecordTarget::Existing(record) => record,
            RecordTarget::Named(name) => {
                let records = self.api.list_records(&zone.id).await?;
                debug!("Zone {} has {} records", zone, records.len());
                match find_record(&records, &name, desired.record_type) {
                    Some(record) => record.clone(),
                    None => return self.create(zone, name, desired).await,
                }
            }
        };
        self.update(zone, existing, desired).await
    }

    async fn create(
        &self,
        zone: &ResolvedZone,
        name: String,
        desired: &DesiredRecord,
    ) -> Result<Outcome> {
        let payload = RecordPayload {
            zone_id: zone.id.clone(),
            record_type: desired.record_type,
            name,
            value: desired.value.to_string(),
            ttl: desired.ttl,
        };

        if self.dry_run {
            info!("Dry run: not creating {}", payload);
            return Ok(Outcome::Planned {
                action: PlannedAction::Create,
                payload,
            });
        }

        info!("Creating {} in zone {}", payload, zone);
        let record = self.api.create_record(&payload).await?;
        Ok(Outcome::Created(record))
    }

    /// Updates an existing record, keeping its name and, unless a TTL was
    /// asked for, its TTL
    async fn update(
        &self,
        zone: &ResolvedZone,
        existing: Record,
        desired: &DesiredRecord,
    ) -> Result<Outcome> {
        let payload = RecordPayload {
            zone_id: zone.id.clone(),
            record_type: desired.record_type,
            name: existing.name.clone(),
            value: desired.value.to_string(),
            ttl: desired.ttl.or(existing.ttl),
        };

        if self.dry_run {
            info!("Dry run: not updating {} to {}", existing, payload);
            return Ok(Outcome::Planned {
                action: PlannedAction::Update {
                    record_id: existing.id,
                },
                payload,
            });
        }

        if existing.value == payload.value {
            debug!("Record already matches {}", payload.value);
        }
        info!("Updating {} to {}", existing, payload);
        let record = self.api.update_record(&existing.id, &payload).await?;
        Ok(Outcome::Updated {
            previous_value: existing.value,
            record,
        })
    }
}

//==============================================================================
// Tests
//==============================================================================
