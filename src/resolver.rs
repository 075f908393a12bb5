//! Identifier resolution
//!
//! Turns the zone and record identifiers given on the command line into
//! concrete API objects. A zone or record may be named or given by ID, never
//! both and never neither.

use tracing::{debug, warn};

use crate::dns_provider::DnsApi;
use crate::error::{ConfigError, Error, ResolutionError, Result, TargetKind, TransportError};
use crate::types::{Record, RecordRef, RecordTarget, RecordType, ResolvedZone, ZoneRef};

//==============================================================================
// Identifier shape
//==============================================================================

/// The single handle a user gave for a zone or record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle<'a> {
    Name(&'a str),
    Id(&'a str),
}

/// Checks that exactly one of `name` and `id` was supplied
///
/// Both at once is refused rather than silently preferring one, since the
/// two could disagree. This is pure and runs before any request is made.
pub fn handle<'a>(
    kind: TargetKind,
    name: Option<&'a str>,
    id: Option<&'a str>,
) -> Result<Handle<'a>> {
    match (name, id) {
        (Some(name), None) => Ok(Handle::Name(name)),
        (None, Some(id)) => Ok(Handle::Id(id)),
        (Some(name), Some(id)) => Err(ConfigError::ConflictingIdentifiers {
            kind,
            name: name.to_string(),
            id: id.to_string(),
        }
        .into()),
        (None, None) => Err(ResolutionError::AmbiguousTarget { kind }.into()),
    }
}

impl ZoneRef {
    pub fn handle(&self) -> Result<Handle<'_>> {
        handle(TargetKind::Zone, self.name.as_deref(), self.id.as_deref())
    }
}

impl RecordRef {
    pub fn handle(&self) -> Result<Handle<'_>> {
        handle(TargetKind::Record, self.name.as_deref(), self.id.as_deref())
    }
}

//==============================================================================
// Resolver
//==============================================================================

pub struct Resolver<'a, A: DnsApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: DnsApi + ?Sized> Resolver<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolves a zone to its ID and name
    ///
    /// By name: scans the full zone listing and takes the first exact,
    /// case-sensitive match. By ID: fetches the zone directly.
    pub async fn resolve_zone(&self, zone: &ZoneRef) -> Result<ResolvedZone> {
        match zone.handle()? {
            Handle::Name(name) => {
                let wanted = name.strip_suffix('.').unwrap_or(name);
                let zones = self.api.list_zones().await?;
                debug!("Scanning {} zones for '{}'", zones.len(), wanted);
                zones
                    .into_iter()
                    .find(|z| z.name == wanted)
                    .map(ResolvedZone::from)
                    .ok_or_else(|| {
                        ResolutionError::NotFound {
                            kind: TargetKind::Zone,
                            value: name.to_string(),
                        }
                        .into()
                    })
            }
            Handle::Id(id) => {
                let zone = self
                    .api
                    .get_zone(id)
                    .await
                    .map_err(|e| not_found_on_404(e, TargetKind::Zone, id))?;
                Ok(zone.into())
            }
        }
    }

    /// Resolves the record handle within an already resolved zone
    ///
    /// A record given by ID is fetched and must belong to `zone`. A record
    /// given by name is passed through, without a trailing dot; whether it
    /// exists is decided during reconciliation, where absence means it gets
    /// created.
    pub async fn resolve_record(
        &self,
        zone: &ResolvedZone,
        record: &RecordRef,
    ) -> Result<RecordTarget> {
        match record.handle()? {
            Handle::Name(name) => {
                let name = name.strip_suffix('.').unwrap_or(name);
                Ok(RecordTarget::Named(name.to_string()))
            }
            Handle::Id(id) => {
                let found = self
                    .api
                    .get_record(id)
                    .await
                    .map_err(|e| not_found_on_404(e, TargetKind::Record, id))?;
                if found.zone_id != zone.id {
                    return Err(ResolutionError::ZoneMismatch {
                        record_id: id.to_string(),
                        record_zone: found.zone_id,
                        zone: zone.name.clone(),
                    }
                    .into());
                }
                Ok(RecordTarget::Existing(found))
            }
        }
    }
}

/// Finds the record with `name` and `record_type` in a zone listing
///
/// The first match in listing order wins. The API allows several records
/// with the same name and type (round-robin sets); that case is logged and
/// the first one is still used.
pub fn find_record<'r>(
    records: &'r [Record],
    name: &str,
    record_type: RecordType,
) -> Option<&'r Record> {
    let mut matches = records
        .iter()
        .filter(|r| r.name == name && r.record_type == record_type.as_str());
    let first = matches.next()?;
    let extra = matches.count();
    if extra > 0 {
        warn!(
            "{} {} records named '{}' exist; using the first ({})",
            extra + 1,
            record_type,
            name,
            first.id
        );
    }
    Some(first)
}

/// Picks the record type a run works with
///
/// An existing record keeps its own type: it must be A or AAAA, and an
/// explicitly requested type must agree with it. A named record uses the
/// requested type, `A` when none was given.
pub fn record_type_for(target: &RecordTarget, requested: Option<RecordType>) -> Result<RecordType> {
    let record = match target {
        RecordTarget::Existing(record) => record,
        RecordTarget::Named(_) => return Ok(requested.unwrap_or_default()),
    };
    let existing: RecordType = record
        .record_type
        .parse()
        .map_err(|_| ResolutionError::UnsupportedType {
            record_id: record.id.clone(),
            record_type: record.record_type.clone(),
        })?;
    match requested {
        Some(requested) if requested != existing => Err(ResolutionError::TypeMismatch {
            record_id: record.id.clone(),
            existing,
            requested,
        }
        .into()),
        _ => Ok(existing),
    }
}

fn not_found_on_404(err: TransportError, kind: TargetKind, value: &str) -> Error {
    if err.status() == Some(404) {
        ResolutionError::NotFound {
            kind,
            value: value.to_string(),
        }
        .into()
    } else {
        err.into()
    }
}

//==============================================================================
// Tests
//==============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns_provider::testing::{record, zone, FakeApi};

    fn zone_ref(name: Option<&str>, id: Option<&str>) -> ZoneRef {
        ZoneRef {
            name: name.map(str::to_string),
            id: id.map(str::to_string),
        }
    }

    fn record_ref(name: Option<&str>, id: Option<&str>) -> RecordRef {
        RecordRef {
            name: name.map(str::to_string),
            id: id.map(str::to_string),
        }
    }

    fn api() -> FakeApi {
        FakeApi::new(
            vec![zone("z1", "example.org"), zone("z2", "example.com")],
            vec![
                record("r1", "z2", "A", "dyn", "198.51.100.1"),
                record("r2", "z1", "A", "dyn", "198.51.100.2"),
            ],
        )
    }

    #[test]
    fn test_handle_shapes() {
        assert_eq!(
            handle(TargetKind::Zone, Some("example.com"), None).unwrap(),
            Handle::Name("example.com")
        );
        assert_eq!(
            handle(TargetKind::Record, None, Some("r1")).unwrap(),
            Handle::Id("r1")
        );
        assert!(matches!(
            handle(TargetKind::Zone, Some("example.com"), Some("z2")),
            Err(Error::Config(ConfigError::ConflictingIdentifiers {
                kind: TargetKind::Zone,
                ..
            }))
        ));
        assert!(matches!(
            handle(TargetKind::Record, None, None),
            Err(Error::Resolution(ResolutionError::AmbiguousTarget {
                kind: TargetKind::Record
            }))
        ));
    }

    #[tokio::test]
    async fn test_resolve_zone_by_name() {
        let api = api();
        let zone = Resolver::new(&api)
            .resolve_zone(&zone_ref(Some("example.com"), None))
            .await
            .unwrap();
        assert_eq!(zone.id, "z2");
        assert_eq!(zone.name, "example.com");
        assert_eq!(api.calls(), vec!["list_zones"]);
    }

    #[tokio::test]
    async fn test_resolve_zone_by_name_accepts_trailing_dot() {
        let api = api();
        let zone = Resolver::new(&api)
            .resolve_zone(&zone_ref(Some("example.com."), None))
            .await
            .unwrap();
        assert_eq!(zone.id, "z2");
    }

    #[tokio::test]
    async fn test_resolve_zone_by_name_is_case_sensitive() {
        let api = api();
        let err = Resolver::new(&api)
            .resolve_zone(&zone_ref(Some("Example.com"), None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::NotFound {
                kind: TargetKind::Zone,
                ref value,
            }) if value == "Example.com"
        ));
    }

    #[tokio::test]
    async fn test_resolve_zone_by_id() {
        let api = api();
        let zone = Resolver::new(&api)
            .resolve_zone(&zone_ref(None, Some("z1")))
            .await
            .unwrap();
        assert_eq!(zone.name, "example.org");
        assert_eq!(api.calls(), vec!["get_zone z1"]);
    }

    #[tokio::test]
    async fn test_resolve_zone_by_unknown_id() {
        let api = api();
        let err = Resolver::new(&api)
            .resolve_zone(&zone_ref(None, Some("nope")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "can't find zone 'nope'");
    }

    #[tokio::test]
    async fn test_resolve_zone_conflict_makes_no_calls() {
        let api = api();
        let err = Resolver::new(&api)
            .resolve_zone(&zone_ref(Some("example.com"), Some("z2")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ConflictingIdentifiers { .. })
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_record_by_name_defers_lookup() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let target = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(Some("dyn"), None))
            .await
            .unwrap();
        assert_eq!(target, RecordTarget::Named("dyn".to_string()));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_record_by_id() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let target = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(None, Some("r1")))
            .await
            .unwrap();
        match target {
            RecordTarget::Existing(r) => assert_eq!(r.name, "dyn"),
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_record_from_other_zone() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let err = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(None, Some("r2")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::ZoneMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_record_by_unknown_id() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let err = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(None, Some("missing")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "can't find record 'missing'");
    }

    #[tokio::test]
    async fn test_resolve_record_conflict() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let err = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(Some("dyn"), Some("r1")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::ConflictingIdentifiers {
                kind: TargetKind::Record,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_resolve_record_by_name_strips_trailing_dot() {
        let api = api();
        let zone = ResolvedZone {
            id: "z2".to_string(),
            name: "example.com".to_string(),
        };
        let target = Resolver::new(&api)
            .resolve_record(&zone, &record_ref(Some("dyn."), None))
            .await
            .unwrap();
        assert_eq!(target, RecordTarget::Named("dyn".to_string()));
    }

    #[test]
    fn test_record_type_for_existing_record() {
        let aaaa = RecordTarget::Existing(record("q1", "z", "AAAA", "dyn", "2001:db8::1"));
        assert_eq!(record_type_for(&aaaa, None).unwrap(), RecordType::AAAA);
        assert_eq!(
            record_type_for(&aaaa, Some(RecordType::AAAA)).unwrap(),
            RecordType::AAAA
        );
        match record_type_for(&aaaa, Some(RecordType::A)).unwrap_err() {
            Error::Resolution(err) => assert_eq!(
                err,
                ResolutionError::TypeMismatch {
                    record_id: "q1".to_string(),
                    existing: RecordType::AAAA,
                    requested: RecordType::A,
                }
            ),
            other => panic!("unexpected error {:?}", other),
        }

        let mx = RecordTarget::Existing(record("m1", "z", "MX", "@", "10 mail.example.com."));
        let err = record_type_for(&mx, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution(ResolutionError::UnsupportedType { ref record_id, ref record_type })
                if record_id == "m1" && record_type == "MX"
        ));
        assert!(err.to_string().contains("'m1' is a MX record"));
    }

    #[test]
    fn test_record_type_for_named_record() {
        let named = RecordTarget::Named("dyn".to_string());
        assert_eq!(record_type_for(&named, None).unwrap(), RecordType::A);
        assert_eq!(
            record_type_for(&named, Some(RecordType::AAAA)).unwrap(),
            RecordType::AAAA
        );
    }

    #[test]
    fn test_find_record_matches_name_and_type() {
        let records = vec![
            record("a1", "z", "A", "dyn", "198.51.100.1"),
            record("t1", "z", "TXT", "dyn", "hello"),
            record("q1", "z", "AAAA", "dyn", "2001:db8::1"),
            record("q2", "z", "AAAA", "dyn", "2001:db8::2"),
        ];
        assert_eq!(find_record(&records, "dyn", RecordType::A).unwrap().id, "a1");
        assert_eq!(
            find_record(&records, "dyn", RecordType::AAAA).unwrap().id,
            "q1"
        );
        assert!(find_record(&records, "Dyn", RecordType::A).is_none());
        assert!(find_record(&records, "home", RecordType::A).is_none());
    }
}
