//! Record builders.
//!
//! Pure functions that turn already-drawn values into fully formed, immutable records. Nothing
//! here touches the random number generator.

use chrono::{DateTime, FixedOffset};
use fhir::{MeasurementKind, MeasurementRecord, ResourceUuid, SummaryRecord};

/// Fields shared by every record of one hemogram.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleContext {
    pub subject_id: String,
    pub collected_at: DateTime<FixedOffset>,
    pub issued_at: DateTime<FixedOffset>,
    /// Neighbourhood the sample came from.
    pub location: String,
}

/// Builds one measurement record.
///
/// Code, display, unit and reference range come from `kind`; `value` is taken as given.
pub fn build_measurement(
    full_url: ResourceUuid,
    kind: MeasurementKind,
    value: f64,
    ctx: &SampleContext,
) -> MeasurementRecord {
    MeasurementRecord {
        full_url,
        kind,
        value,
        subject_id: ctx.subject_id.clone(),
        collected_at: ctx.collected_at,
        issued_at: ctx.issued_at,
        location: Some(ctx.location.clone()),
    }
}

/// Builds the panel record.
///
/// `members` is indexed like [`MeasurementKind::ALL`]: white-cell, hemoglobin, platelets,
/// hematocrit.
pub fn build_summary(
    full_url: ResourceUuid,
    members: [ResourceUuid; 4],
    ctx: &SampleContext,
) -> SummaryRecord {
    SummaryRecord {
        full_url,
        subject_id: ctx.subject_id.clone(),
        collected_at: ctx.collected_at,
        issued_at: ctx.issued_at,
        members: members.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhir::ReferenceRange;

    fn ctx() -> SampleContext {
        SampleContext {
            subject_id: "98765432100".into(),
            collected_at: DateTime::parse_from_rfc3339("2026-05-10T08:00:00-03:00").unwrap(),
            issued_at: DateTime::parse_from_rfc3339("2026-05-11T08:00:00-03:00").unwrap(),
            location: "Parque Amazônia".into(),
        }
    }

    fn id(n: u8) -> ResourceUuid {
        ResourceUuid::parse(&format!("11111111-2222-4333-8444-5555555555{n:02x}")).unwrap()
    }

    #[test]
    fn measurement_takes_shared_fields_from_context() {
        let record = build_measurement(id(1), MeasurementKind::Hematocrit, 39.5, &ctx());

        assert_eq!(record.full_url, id(1));
        assert_eq!(record.code(), "4544-3");
        assert_eq!(record.unit(), "%");
        assert_eq!(record.value, 39.5);
        assert_eq!(record.subject_id, "98765432100");
        assert_eq!(record.location.as_deref(), Some("Parque Amazônia"));
        assert_eq!(record.issued_at, ctx().issued_at);
    }

    #[test]
    fn reference_range_does_not_depend_on_value() {
        let low = build_measurement(id(1), MeasurementKind::Platelets, 31000.0, &ctx());
        let high = build_measurement(id(2), MeasurementKind::Platelets, 349000.0, &ctx());

        assert_eq!(low.reference_range(), ReferenceRange::new(150000.0, 450000.0));
        assert_eq!(low.reference_range(), high.reference_range());
    }

    #[test]
    fn summary_keeps_member_order() {
        let members = [id(4), id(3), id(2), id(1)];
        let summary = build_summary(id(9), members, &ctx());

        assert_eq!(summary.full_url, id(9));
        assert_eq!(summary.members, members.to_vec());
        assert_eq!(summary.collected_at, ctx().collected_at);
    }
}
