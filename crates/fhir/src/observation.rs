//! Hemogram observation models and translation helpers.
//!
//! A hemogram bundle carries two kinds of observation:
//! - one **summary** (panel) observation that lists its members via `hasMember`
//! - four **measurement** observations, one per [`MeasurementKind`]
//!
//! Responsibilities:
//! - Define the fixed measurement kinds with their LOINC codes, units and reference ranges
//! - Define public domain-level records for both observation kinds
//! - Translate records to and from the observation wire model

use crate::constants::*;
use crate::wire::{
    CodeableConceptWire, ExtensionWire, IdentifierWire, MetaWire, MethodWire, ObservationWire,
    PerformerWire, QuantityWire, ReferenceRangeWire, ReferenceWire, SpecimenCollectionWire,
    SpecimenWire, SubjectWire,
};
use crate::{FhirError, FhirResult};
use chrono::{DateTime, FixedOffset};
use hemo_uuid::ResourceUuid;
use serde_json::Number;

// ============================================================================
// Measurement kinds
// ============================================================================

/// The four measurements that make up a hemogram panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    /// White-cell count, `/uL`.
    Leukocytes,
    /// Hemoglobin, `g/dL`.
    Hemoglobin,
    /// Platelet count, `/uL`.
    Platelets,
    /// Hematocrit, `%`.
    Hematocrit,
}

impl MeasurementKind {
    /// All kinds, in the order the panel lists its members.
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::Leukocytes,
        MeasurementKind::Hemoglobin,
        MeasurementKind::Platelets,
        MeasurementKind::Hematocrit,
    ];

    pub fn loinc_code(self) -> &'static str {
        match self {
            MeasurementKind::Leukocytes => "33747-0",
            MeasurementKind::Hemoglobin => "718-7",
            MeasurementKind::Platelets => "777-3",
            MeasurementKind::Hematocrit => "4544-3",
        }
    }

    pub fn display(self) -> &'static str {
        match self {
            MeasurementKind::Leukocytes => "Leukocytes [#/volume] in Blood",
            MeasurementKind::Hemoglobin => "Hemoglobin [Mass/volume] in Blood",
            MeasurementKind::Platelets => "Platelets [#/volume] in Blood",
            MeasurementKind::Hematocrit => "Hematocrit [Volume Fraction] of Blood",
        }
    }

    /// UCUM unit code.
    pub fn unit(self) -> &'static str {
        match self {
            MeasurementKind::Leukocytes | MeasurementKind::Platelets => "/uL",
            MeasurementKind::Hemoglobin => "g/dL",
            MeasurementKind::Hematocrit => "%",
        }
    }

    /// Resource `id` of the observation carrying this measurement.
    pub fn resource_id(self) -> &'static str {
        match self {
            MeasurementKind::Leukocytes => "leucocitos",
            MeasurementKind::Hemoglobin => "hemoglobina",
            MeasurementKind::Platelets => "plaquetas",
            MeasurementKind::Hematocrit => "hematocrito",
        }
    }

    /// Short label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            MeasurementKind::Leukocytes => "Leuc",
            MeasurementKind::Hemoglobin => "Hb",
            MeasurementKind::Platelets => "Plaq",
            MeasurementKind::Hematocrit => "Ht",
        }
    }

    /// Number of decimal places values of this kind are rounded to.
    ///
    /// Counts are whole numbers; concentrations and fractions carry one decimal place.
    pub fn decimal_places(self) -> u32 {
        match self {
            MeasurementKind::Leukocytes | MeasurementKind::Platelets => 0,
            MeasurementKind::Hemoglobin | MeasurementKind::Hematocrit => 1,
        }
    }

    /// Normal population range for this kind. Independent of any scenario.
    pub fn reference_range(self) -> ReferenceRange {
        match self {
            MeasurementKind::Leukocytes => ReferenceRange::new(4000.0, 11000.0),
            MeasurementKind::Hemoglobin => ReferenceRange::new(12.0, 17.5),
            MeasurementKind::Platelets => ReferenceRange::new(150000.0, 450000.0),
            MeasurementKind::Hematocrit => ReferenceRange::new(36.0, 52.0),
        }
    }

    /// Looks a kind up by its LOINC code.
    pub fn from_loinc(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.loinc_code() == code)
    }

    /// Rounds `value` to this kind's precision.
    pub fn round(self, value: f64) -> f64 {
        let scale = 10f64.powi(self.decimal_places() as i32);
        (value * scale).round() / scale
    }
}

/// Inclusive low/high bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
}

impl ReferenceRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Classifies `value` against the range. Values on either bound are normal.
    pub fn interpret(&self, value: f64) -> Interpretation {
        if value < self.low {
            Interpretation::Low
        } else if value > self.high {
            Interpretation::High
        } else {
            Interpretation::Normal
        }
    }
}

/// Position of a value relative to its reference range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpretation {
    Low,
    Normal,
    High,
}

// ============================================================================
// Public domain-level types
// ============================================================================

/// One coded numeric observation.
///
/// Code, display text, unit and reference range are derived from [`MeasurementRecord::kind`].
#[derive(Clone, Debug, PartialEq)]
pub struct MeasurementRecord {
    /// Identifier used as the entry `fullUrl` and in the panel's `hasMember`.
    pub full_url: ResourceUuid,

    pub kind: MeasurementKind,

    /// Measured value, already rounded to the kind's precision.
    pub value: f64,

    /// Synthetic CPF of the subject.
    pub subject_id: String,

    pub collected_at: DateTime<FixedOffset>,

    pub issued_at: DateTime<FixedOffset>,

    /// Free-text neighbourhood the sample came from.
    pub location: Option<String>,
}

impl MeasurementRecord {
    pub fn code(&self) -> &'static str {
        self.kind.loinc_code()
    }

    pub fn display(&self) -> &'static str {
        self.kind.display()
    }

    pub fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    pub fn reference_range(&self) -> ReferenceRange {
        self.kind.reference_range()
    }

    pub fn interpretation(&self) -> Interpretation {
        self.reference_range().interpret(self.value)
    }
}

/// The panel observation aggregating the four measurements of one hemogram.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRecord {
    pub full_url: ResourceUuid,

    pub subject_id: String,

    pub collected_at: DateTime<FixedOffset>,

    pub issued_at: DateTime<FixedOffset>,

    /// Identifiers of the member measurements, in [`MeasurementKind::ALL`] order.
    pub members: Vec<ResourceUuid>,
}

/// Renders a timestamp in the fixed `YYYY-MM-DDTHH:MM:SS±HH:MM` form.
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(field: &str, value: &str) -> FhirResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| FhirError::Translation(format!("Invalid {field} timestamp '{value}': {e}")))
}

// ============================================================================
// Domain to wire
// ============================================================================

fn quantity_number(value: f64, decimal_places: u32) -> FhirResult<Number> {
    if !value.is_finite() {
        return Err(FhirError::InvalidInput(format!(
            "Quantity value must be finite, got {value}"
        )));
    }

    if decimal_places == 0 {
        return Ok(Number::from(value.round() as i64));
    }

    Number::from_f64(value)
        .ok_or_else(|| FhirError::InvalidInput(format!("Quantity value {value} is not finite")))
}

fn quantity(value: f64, kind: MeasurementKind) -> FhirResult<QuantityWire> {
    Ok(QuantityWire {
        value: quantity_number(value, kind.decimal_places())?,
        system: UCUM_SYSTEM.to_string(),
        code: kind.unit().to_string(),
    })
}

fn specimen(collected_at: &DateTime<FixedOffset>) -> SpecimenWire {
    SpecimenWire {
        resource_type: SPECIMEN_RESOURCE_TYPE.to_string(),
        id: SPECIMEN_ID.to_string(),
        specimen_type: CodeableConceptWire::single(SPECIMEN_TYPE_SYSTEM, SPECIMEN_TYPE_CODE, None),
        collection: SpecimenCollectionWire {
            collected_date_time: format_timestamp(collected_at),
        },
    }
}

/// Builds the members every observation shares, leaving kind-specific ones empty.
fn observation_shell(
    id: &str,
    profile: &str,
    code: CodeableConceptWire,
    subject_id: &str,
    collected_at: &DateTime<FixedOffset>,
    issued_at: &DateTime<FixedOffset>,
) -> ObservationWire {
    ObservationWire {
        resource_type: "Observation".to_string(),
        id: id.to_string(),
        meta: MetaWire::with_profile(profile),
        contained: vec![specimen(collected_at)],
        status: OBSERVATION_STATUS.to_string(),
        category: vec![CodeableConceptWire::single(
            CATEGORY_SYSTEM,
            CATEGORY_CODE,
            None,
        )],
        code,
        subject: SubjectWire {
            identifier: IdentifierWire {
                system: CPF_SYSTEM.to_string(),
                value: subject_id.to_string(),
            },
        },
        issued: format_timestamp(issued_at),
        performer: vec![PerformerWire {
            id: PERFORMER_ID.to_string(),
            identifier: IdentifierWire {
                system: CNES_SYSTEM.to_string(),
                value: FACILITY_CNES.to_string(),
            },
        }],
        value_quantity: None,
        method: None,
        specimen: ReferenceWire {
            reference: format!("#{SPECIMEN_ID}"),
        },
        reference_range: Vec::new(),
        has_member: Vec::new(),
        extension: Vec::new(),
    }
}

pub(crate) fn measurement_to_wire(record: &MeasurementRecord) -> FhirResult<ObservationWire> {
    let kind = record.kind;
    let range = kind.reference_range();

    let mut wire = observation_shell(
        kind.resource_id(),
        SIMPLE_EXAM_PROFILE,
        CodeableConceptWire::single(LOINC_SYSTEM, kind.loinc_code(), Some(kind.display())),
        &record.subject_id,
        &record.collected_at,
        &record.issued_at,
    );

    wire.value_quantity = Some(quantity(record.value, kind)?);
    wire.method = Some(MethodWire {
        text: METHOD_TEXT.to_string(),
    });
    wire.reference_range = vec![ReferenceRangeWire {
        low: quantity(range.low, kind)?,
        high: quantity(range.high, kind)?,
        range_type: CodeableConceptWire::single(
            REFERENCE_RANGE_MEANING_SYSTEM,
            REFERENCE_RANGE_MEANING_NORMAL,
            None,
        ),
    }];
    wire.extension = record
        .location
        .iter()
        .map(|location| ExtensionWire {
            url: NEIGHBOURHOOD_EXTENSION_URL.to_string(),
            value_string: location.clone(),
        })
        .collect();

    Ok(wire)
}

pub(crate) fn summary_to_wire(record: &SummaryRecord) -> ObservationWire {
    let mut wire = observation_shell(
        COMPOSITE_EXAM_ID,
        COMPOSITE_EXAM_PROFILE,
        CodeableConceptWire::single(LOINC_SYSTEM, CBC_PANEL_CODE, Some(CBC_PANEL_DISPLAY)),
        &record.subject_id,
        &record.collected_at,
        &record.issued_at,
    );

    wire.has_member = record
        .members
        .iter()
        .map(|member| ReferenceWire {
            reference: member.urn(),
        })
        .collect();

    wire
}

// ============================================================================
// Wire to domain
// ============================================================================

/// What an observation on the wire turned out to be.
pub(crate) enum ParsedObservation {
    Summary(SummaryRecord),
    Measurement(MeasurementRecord),
}

/// Subject and timestamps common to both observation kinds.
struct SharedFields {
    subject_id: String,
    collected_at: DateTime<FixedOffset>,
    issued_at: DateTime<FixedOffset>,
}

fn shared_fields(wire: &ObservationWire) -> FhirResult<SharedFields> {
    if wire.resource_type != "Observation" {
        return Err(FhirError::InvalidInput(format!(
            "Expected resourceType 'Observation', got '{}'",
            wire.resource_type
        )));
    }

    if wire.subject.identifier.system != CPF_SYSTEM {
        return Err(FhirError::Translation(format!(
            "Observation '{}' has subject system '{}', expected '{CPF_SYSTEM}'",
            wire.id, wire.subject.identifier.system
        )));
    }

    let specimen = wire
        .contained
        .iter()
        .find(|s| s.id == SPECIMEN_ID)
        .ok_or_else(|| {
            FhirError::Translation(format!(
                "Observation '{}' has no contained specimen '{SPECIMEN_ID}'",
                wire.id
            ))
        })?;

    Ok(SharedFields {
        subject_id: wire.subject.identifier.value.clone(),
        collected_at: parse_timestamp(
            "collectedDateTime",
            &specimen.collection.collected_date_time,
        )?,
        issued_at: parse_timestamp("issued", &wire.issued)?,
    })
}

/// Value of `quantity`, which must be a UCUM quantity in the unit of `kind`.
fn checked_quantity(
    observation_id: &str,
    field: &str,
    quantity: &QuantityWire,
    kind: MeasurementKind,
) -> FhirResult<f64> {
    if quantity.system != UCUM_SYSTEM || quantity.code != kind.unit() {
        return Err(FhirError::Translation(format!(
            "Observation '{observation_id}' {field} is '{}' in '{}', expected '{}' in '{UCUM_SYSTEM}'",
            quantity.code,
            quantity.system,
            kind.unit()
        )));
    }

    quantity.value.as_f64().ok_or_else(|| {
        FhirError::Translation(format!(
            "Observation '{observation_id}' {field} is not numeric"
        ))
    })
}

fn check_reference_range(
    observation_id: &str,
    ranges: &[ReferenceRangeWire],
    kind: MeasurementKind,
) -> FhirResult<()> {
    let [range] = ranges else {
        return Err(FhirError::Translation(format!(
            "Observation '{observation_id}' must have exactly one referenceRange, got {}",
            ranges.len()
        )));
    };

    let low = checked_quantity(observation_id, "referenceRange.low", &range.low, kind)?;
    let high = checked_quantity(observation_id, "referenceRange.high", &range.high, kind)?;
    let expected = kind.reference_range();

    if ReferenceRange::new(low, high) != expected {
        return Err(FhirError::Translation(format!(
            "Observation '{observation_id}' referenceRange {low}-{high} does not match {}-{}",
            expected.low, expected.high
        )));
    }

    let meaning = range.range_type.code_in(REFERENCE_RANGE_MEANING_SYSTEM);
    if meaning != Some(REFERENCE_RANGE_MEANING_NORMAL) {
        return Err(FhirError::Translation(format!(
            "Observation '{observation_id}' referenceRange type is not '{REFERENCE_RANGE_MEANING_NORMAL}'"
        )));
    }

    Ok(())
}

fn parse_full_url(full_url: &str) -> FhirResult<ResourceUuid> {
    ResourceUuid::parse_urn(full_url).map_err(|e| FhirError::InvalidUuid(e.to_string()))
}

pub(crate) fn wire_to_observation(
    full_url: &str,
    wire: ObservationWire,
) -> FhirResult<ParsedObservation> {
    let full_url = parse_full_url(full_url)?;
    let shared = shared_fields(&wire)?;

    let code = wire.code.code_in(LOINC_SYSTEM).ok_or_else(|| {
        FhirError::Translation(format!("Observation '{}' has no LOINC code", wire.id))
    })?;

    if code == CBC_PANEL_CODE {
        let members = wire
            .has_member
            .iter()
            .map(|m| parse_full_url(&m.reference))
            .collect::<FhirResult<Vec<_>>>()?;

        return Ok(ParsedObservation::Summary(SummaryRecord {
            full_url,
            subject_id: shared.subject_id,
            collected_at: shared.collected_at,
            issued_at: shared.issued_at,
            members,
        }));
    }

    let kind = MeasurementKind::from_loinc(code).ok_or_else(|| {
        FhirError::Translation(format!("Unsupported LOINC code '{code}' in '{}'", wire.id))
    })?;

    let quantity = wire.value_quantity.as_ref().ok_or_else(|| {
        FhirError::Translation(format!("Observation '{}' has no valueQuantity", wire.id))
    })?;
    let value = checked_quantity(&wire.id, "valueQuantity", quantity, kind)?;
    check_reference_range(&wire.id, &wire.reference_range, kind)?;

    let location = wire
        .extension
        .into_iter()
        .find(|e| e.url == NEIGHBOURHOOD_EXTENSION_URL)
        .map(|e| e.value_string);

    Ok(ParsedObservation::Measurement(MeasurementRecord {
        full_url,
        kind,
        value,
        subject_id: shared.subject_id,
        collected_at: shared.collected_at,
        issued_at: shared.issued_at,
        location,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).expect("valid timestamp")
    }

    fn sample_measurement(kind: MeasurementKind, value: f64) -> MeasurementRecord {
        MeasurementRecord {
            full_url: ResourceUuid::parse("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            kind,
            value,
            subject_id: "12345678901".into(),
            collected_at: ts("2026-03-02T09:15:00-03:00"),
            issued_at: ts("2026-03-03T09:15:00-03:00"),
            location: Some("Jardim Goiás".into()),
        }
    }

    #[test]
    fn kinds_are_listed_in_panel_order() {
        let codes: Vec<_> = MeasurementKind::ALL.iter().map(|k| k.loinc_code()).collect();
        assert_eq!(codes, vec!["33747-0", "718-7", "777-3", "4544-3"]);
    }

    #[test]
    fn from_loinc_finds_every_kind() {
        for kind in MeasurementKind::ALL {
            assert_eq!(MeasurementKind::from_loinc(kind.loinc_code()), Some(kind));
        }
        assert_eq!(MeasurementKind::from_loinc("58410-2"), None);
    }

    #[test]
    fn round_applies_kind_precision() {
        assert_eq!(MeasurementKind::Leukocytes.round(5432.6), 5433.0);
        assert_eq!(MeasurementKind::Platelets.round(149999.4), 149999.0);
        assert_eq!(MeasurementKind::Hemoglobin.round(13.26), 13.3);
        assert_eq!(MeasurementKind::Hematocrit.round(41.04), 41.0);
    }

    #[test]
    fn reference_range_bounds_are_normal() {
        let range = MeasurementKind::Platelets.reference_range();
        assert_eq!(range.interpret(150000.0), Interpretation::Normal);
        assert_eq!(range.interpret(450000.0), Interpretation::Normal);
        assert_eq!(range.interpret(149999.0), Interpretation::Low);
        assert_eq!(range.interpret(450001.0), Interpretation::High);
    }

    #[test]
    fn low_platelets_are_flagged() {
        let record = sample_measurement(MeasurementKind::Platelets, 42000.0);
        assert_eq!(record.interpretation(), Interpretation::Low);
    }

    #[test]
    fn measurement_wire_carries_fixed_reference_range() {
        let wire = measurement_to_wire(&sample_measurement(MeasurementKind::Platelets, 210000.0))
            .expect("render measurement");

        let range = &wire.reference_range[0];
        assert_eq!(range.low.value, Number::from(150000));
        assert_eq!(range.high.value, Number::from(450000));
        assert_eq!(range.low.code, "/uL");
        assert_eq!(wire.id, "plaquetas");
        assert_eq!(wire.specimen.reference, "#amostra");
    }

    #[test]
    fn whole_unit_values_render_as_integers() {
        let wire = measurement_to_wire(&sample_measurement(MeasurementKind::Leukocytes, 7431.0))
            .expect("render measurement");
        let json = serde_json::to_string(&wire.value_quantity).unwrap();
        assert!(json.contains("\"value\":7431,"), "{json}");
    }

    #[test]
    fn decimal_values_keep_one_place() {
        let wire = measurement_to_wire(&sample_measurement(MeasurementKind::Hemoglobin, 14.0))
            .expect("render measurement");
        let json = serde_json::to_string(&wire.value_quantity).unwrap();
        assert!(json.contains("\"value\":14.0,"), "{json}");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = measurement_to_wire(&sample_measurement(MeasurementKind::Hematocrit, f64::NAN))
            .expect_err("NaN should not render");
        match err {
            FhirError::InvalidInput(msg) => assert!(msg.contains("finite")),
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn location_becomes_extension() {
        let wire = measurement_to_wire(&sample_measurement(MeasurementKind::Hematocrit, 40.2))
            .expect("render measurement");
        assert_eq!(wire.extension.len(), 1);
        assert_eq!(wire.extension[0].url, NEIGHBOURHOOD_EXTENSION_URL);
        assert_eq!(wire.extension[0].value_string, "Jardim Goiás");

        let mut no_location = sample_measurement(MeasurementKind::Hematocrit, 40.2);
        no_location.location = None;
        let wire = measurement_to_wire(&no_location).expect("render measurement");
        assert!(wire.extension.is_empty());
    }

    #[test]
    fn timestamps_use_fixed_offset_format() {
        let formatted = format_timestamp(&ts("2026-03-02T09:15:07-03:00"));
        assert_eq!(formatted, "2026-03-02T09:15:07-03:00");
    }

    #[test]
    fn measurement_survives_wire_translation() {
        let record = sample_measurement(MeasurementKind::Hemoglobin, 13.7);
        let wire = measurement_to_wire(&record).expect("render measurement");

        match wire_to_observation(&record.full_url.urn(), wire).expect("parse measurement") {
            ParsedObservation::Measurement(parsed) => assert_eq!(parsed, record),
            ParsedObservation::Summary(_) => panic!("expected a measurement"),
        }
    }

    #[test]
    fn rejects_unknown_loinc_code() {
        let mut wire = measurement_to_wire(&sample_measurement(MeasurementKind::Hemoglobin, 13.7))
            .expect("render measurement");
        wire.code = CodeableConceptWire::single(LOINC_SYSTEM, "2345-7", Some("Glucose"));

        let err = wire_to_observation("urn:uuid:550e8400-e29b-41d4-a716-446655440000", wire)
            .err()
            .expect("unknown code should fail");
        match err {
            FhirError::Translation(msg) => assert!(msg.contains("2345-7")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }
}
