//! DNS provider abstraction layer
//!
//! The resolver and reconciler only talk to the provider through this
//! trait, which keeps them testable against an in-memory zone.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{Record, RecordPayload, Zone};

//==============================================================================
// Trait
//==============================================================================

/// Zone and record operations offered by the DNS provider
///
/// Every method performs its HTTP round trips sequentially and surfaces the
/// first failure without retrying. Listing methods return every page.
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Lists every zone visible to the API token, in provider order
    async fn list_zones(&self) -> Result<Vec<Zone>, TransportError>;

    /// Fetches one zone by ID
    async fn get_zone(&self, zone_id: &str) -> Result<Zone, TransportError>;

    /// Lists every record of a zone, in provider order
    async fn list_records(&self, zone_id: &str) -> Result<Vec<Record>, TransportError>;

    /// Fetches one record by ID
    async fn get_record(&self, record_id: &str) -> Result<Record, TransportError>;

    async fn create_record(&self, payload: &RecordPayload) -> Result<Record, TransportError>;

    async fn update_record(
        &self,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<Record, TransportError>;
}

//==============================================================================
// In-memory provider for tests
//==============================================================================
