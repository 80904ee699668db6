//! Synthetic identifiers and timestamps.
//!
//! Everything here draws from a caller-supplied random number generator and, for timestamps,
//! from a caller-supplied reference instant, so seeded runs are reproducible.

use crate::constants::{
    ISSUE_DELAY_DAYS, LOCAL_UTC_OFFSET_SECONDS, MAX_DAYS_AGO, SUBJECT_ID_MAX, SUBJECT_ID_MIN,
};
use chrono::{DateTime, Duration, FixedOffset, Offset, SubsecRound, Utc};
use hemo_uuid::ResourceUuid;
use rand::Rng;

/// Fresh resource identifier. Render with [`ResourceUuid::urn`] for the `urn:uuid:` form.
pub fn new_identifier<R: Rng + ?Sized>(rng: &mut R) -> ResourceUuid {
    ResourceUuid::from_rng(rng)
}

/// An 11-digit numeric subject identifier.
///
/// Shaped like a CPF but never passes its checksum on purpose; it is not validated at all.
pub fn synthetic_subject_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(SUBJECT_ID_MIN..=SUBJECT_ID_MAX).to_string()
}

/// Number of days before the reference instant a sample was collected, uniform in `[0, 7]`.
pub fn draw_days_ago<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(0..=MAX_DAYS_AGO)
}

/// The fixed offset every timestamp is rendered in.
pub fn local_offset() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_UTC_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Collection time: `days_ago` days before `reference`, in local offset, whole seconds.
pub fn collection_timestamp(reference: DateTime<Utc>, days_ago: i64) -> DateTime<FixedOffset> {
    (reference - Duration::days(days_ago))
        .with_timezone(&local_offset())
        .trunc_subsecs(0)
}

/// Issue time: always one day after [`collection_timestamp`] for the same arguments.
pub fn issue_timestamp(reference: DateTime<Utc>, days_ago: i64) -> DateTime<FixedOffset> {
    collection_timestamp(reference, days_ago) + Duration::days(ISSUE_DELAY_DAYS)
}
