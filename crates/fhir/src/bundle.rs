//! Hemogram bundle facade: render to JSON and parse back.
//!
//! A bundle is a `collection` holding exactly five entries: the panel observation first, then one
//! measurement observation per [`MeasurementKind`] in [`MeasurementKind::ALL`] order.
//!
//! Notes:
//! - Rendering is pretty-printed with two-space indentation and leaves non-ASCII text unescaped
//! - Parsing is strict: unknown keys fail, with the offending path in the error message
//! - Both directions check that every `hasMember` reference resolves inside the same bundle

use crate::constants::{BUNDLE_IDENTIFIER_SYSTEM, BUNDLE_PROFILE, BUNDLE_TYPE};
use crate::observation::{
    measurement_to_wire, summary_to_wire, wire_to_observation, MeasurementKind, MeasurementRecord,
    ParsedObservation, SummaryRecord,
};
use crate::wire::{BundleWire, EntryWire, IdentifierWire, MetaWire};
use crate::{FhirError, FhirResult};
use hemo_uuid::ResourceUuid;
use std::collections::HashSet;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Domain-level carrier for one generated hemogram.
#[derive(Clone, Debug, PartialEq)]
pub struct HemogramBundleData {
    /// Batch-unique identifier, rendered bare as `identifier.value`.
    pub identifier: ResourceUuid,

    pub summary: SummaryRecord,

    /// One record per measurement kind, in [`MeasurementKind::ALL`] order.
    pub measurements: Vec<MeasurementRecord>,
}

impl HemogramBundleData {
    /// Returns the measurement of the given kind, if present.
    pub fn measurement(&self, kind: MeasurementKind) -> Option<&MeasurementRecord> {
        self.measurements.iter().find(|m| m.kind == kind)
    }

    /// Every entry identifier in the bundle, panel first.
    pub fn full_urls(&self) -> Vec<ResourceUuid> {
        std::iter::once(self.summary.full_url)
            .chain(self.measurements.iter().map(|m| m.full_url))
            .collect()
    }

    /// Checks the structural invariants of a hemogram bundle.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if:
    /// - the measurements are not exactly one per kind, in panel order,
    /// - two entries share an identifier,
    /// - the panel members are not exactly the measurement identifiers in entry order.
    pub fn validate(&self) -> FhirResult<()> {
        let kinds: Vec<_> = self.measurements.iter().map(|m| m.kind).collect();
        if kinds != MeasurementKind::ALL {
            return Err(FhirError::InvalidInput(format!(
                "Expected one measurement per kind in panel order, got {kinds:?}"
            )));
        }

        let full_urls = self.full_urls();
        let unique: HashSet<_> = full_urls.iter().collect();
        if unique.len() != full_urls.len() {
            return Err(FhirError::InvalidInput(
                "Bundle entries must have distinct fullUrl values".into(),
            ));
        }

        let defined: Vec<_> = self.measurements.iter().map(|m| m.full_url).collect();
        if let Some(dangling) = self.summary.members.iter().find(|m| !defined.contains(m)) {
            return Err(FhirError::InvalidInput(format!(
                "hasMember reference {} does not resolve inside the bundle",
                dangling.urn()
            )));
        }
        if self.summary.members != defined {
            return Err(FhirError::InvalidInput(
                "hasMember must list every measurement exactly once, in panel order".into(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Public HemogramBundle operations
// ============================================================================

/// Hemogram bundle operations.
///
/// This is a zero-sized type used for namespacing bundle-related operations.
/// All methods are associated functions.
pub struct HemogramBundle;

impl HemogramBundle {
    /// Render a hemogram bundle as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if the data breaks a bundle invariant (see
    /// [`HemogramBundleData::validate`]), a value is not finite, or serialisation fails.
    pub fn render(data: &HemogramBundleData) -> FhirResult<String> {
        data.validate()?;
        let wire = domain_to_wire(data)?;
        Ok(serde_json::to_string_pretty(&wire)?)
    }

    /// Parse a hemogram bundle from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort path (e.g.
    /// `entry[1].resource.valueQuantity`) to the failing field when the JSON does not match the
    /// wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if:
    /// - the text is not JSON or does not match the wire schema (including unknown keys),
    /// - resourceType is not "Bundle" or type is not "collection",
    /// - the entries are not one panel plus one observation per measurement kind,
    /// - a `hasMember` reference does not resolve to an entry of the same bundle.
    pub fn parse(json_text: &str) -> FhirResult<HemogramBundleData> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let wire = match serde_path_to_error::deserialize::<_, BundleWire>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(FhirError::Translation(format!(
                    "Bundle schema mismatch at {path}: {source}"
                )));
            }
        };
        deserializer.end()?;

        if wire.resource_type != "Bundle" {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Bundle', got '{}'",
                wire.resource_type
            )));
        }

        if wire.bundle_type != BUNDLE_TYPE {
            return Err(FhirError::InvalidInput(format!(
                "Expected bundle type '{BUNDLE_TYPE}', got '{}'",
                wire.bundle_type
            )));
        }

        let data = wire_to_domain(wire)?;
        data.validate()?;
        Ok(data)
    }
}

// ============================================================================
// Helper functions (internal)
// ============================================================================

fn domain_to_wire(data: &HemogramBundleData) -> FhirResult<BundleWire> {
    let mut entry = Vec::with_capacity(data.measurements.len() + 1);

    entry.push(EntryWire {
        full_url: data.summary.full_url.urn(),
        resource: summary_to_wire(&data.summary),
    });

    for measurement in &data.measurements {
        entry.push(EntryWire {
            full_url: measurement.full_url.urn(),
            resource: measurement_to_wire(measurement)?,
        });
    }

    Ok(BundleWire {
        resource_type: "Bundle".to_string(),
        meta: MetaWire::with_profile(BUNDLE_PROFILE),
        identifier: IdentifierWire {
            system: BUNDLE_IDENTIFIER_SYSTEM.to_string(),
            value: data.identifier.to_string(),
        },
        bundle_type: BUNDLE_TYPE.to_string(),
        entry,
    })
}

fn wire_to_domain(wire: BundleWire) -> FhirResult<HemogramBundleData> {
    let identifier = ResourceUuid::parse(&wire.identifier.value)
        .map_err(|e| FhirError::InvalidUuid(e.to_string()))?;

    let mut summary = None;
    let mut measurements = Vec::with_capacity(MeasurementKind::ALL.len());

    for entry in wire.entry {
        match wire_to_observation(&entry.full_url, entry.resource)? {
            ParsedObservation::Summary(record) => {
                if summary.replace(record).is_some() {
                    return Err(FhirError::InvalidInput(
                        "Bundle contains more than one panel observation".into(),
                    ));
                }
            }
            ParsedObservation::Measurement(record) => measurements.push(record),
        }
    }

    let summary = summary.ok_or_else(|| {
        FhirError::InvalidInput("Bundle contains no panel observation".into())
    })?;

    Ok(HemogramBundleData {
        identifier,
        summary,
        measurements,
    })
}
