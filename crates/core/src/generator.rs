//! Bundle assembly.
//!
//! [`HemogramGenerator`] owns the random number generator and the reference instant of a run.
//! Each call to [`HemogramGenerator::assemble_bundle`] draws a subject, timestamps, identifiers
//! and four values, then builds one self-contained bundle from them.

use crate::builder::{build_measurement, build_summary, SampleContext};
use crate::identifiers::{
    collection_timestamp, draw_days_ago, issue_timestamp, new_identifier, synthetic_subject_id,
};
use crate::scenario::{pick_random, ScenarioProfile, LOCATIONS, SCENARIOS};
use chrono::{DateTime, Utc};
use fhir::{HemogramBundleData, MeasurementKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates hemogram bundles from an injected random source.
#[derive(Debug)]
pub struct HemogramGenerator<R> {
    rng: R,
    reference_time: DateTime<Utc>,
}

impl HemogramGenerator<StdRng> {
    /// Reproducible generator: the same seed and reference time give the same bundles.
    pub fn seeded(seed: u64, reference_time: DateTime<Utc>) -> Self {
        Self::new(StdRng::seed_from_u64(seed), reference_time)
    }

    /// Generator seeded from operating system entropy.
    pub fn from_entropy(reference_time: DateTime<Utc>) -> Self {
        Self::new(StdRng::from_entropy(), reference_time)
    }
}

impl<R: Rng> HemogramGenerator<R> {
    pub fn new(rng: R, reference_time: DateTime<Utc>) -> Self {
        Self {
            rng,
            reference_time,
        }
    }

    pub fn pick_scenario(&mut self) -> &'static ScenarioProfile {
        pick_random(&SCENARIOS, &mut self.rng)
    }

    pub fn pick_location(&mut self) -> &'static str {
        *pick_random(&LOCATIONS, &mut self.rng)
    }

    /// Draws one value per kind from `scenario`, indexed like [`MeasurementKind::ALL`].
    pub fn sample_values(&mut self, scenario: &ScenarioProfile) -> [f64; 4] {
        MeasurementKind::ALL.map(|kind| scenario.range_for(kind).sample(&mut self.rng, kind))
    }

    /// Builds one bundle for `scenario` at `location`.
    ///
    /// Subject and timestamps are drawn once and shared by all five records.
    pub fn assemble_bundle(
        &mut self,
        sequence: u32,
        scenario: &ScenarioProfile,
        location: &str,
    ) -> HemogramBundleData {
        let identifier = new_identifier(&mut self.rng);
        let days_ago = draw_days_ago(&mut self.rng);

        let ctx = SampleContext {
            subject_id: synthetic_subject_id(&mut self.rng),
            collected_at: collection_timestamp(self.reference_time, days_ago),
            issued_at: issue_timestamp(self.reference_time, days_ago),
            location: location.to_string(),
        };

        let summary_url = new_identifier(&mut self.rng);
        let member_urls = MeasurementKind::ALL.map(|_| new_identifier(&mut self.rng));
        let values = self.sample_values(scenario);

        let measurements: Vec<_> = MeasurementKind::ALL
            .iter()
            .zip(member_urls)
            .zip(values)
            .map(|((kind, full_url), value)| build_measurement(full_url, *kind, value, &ctx))
            .collect();

        tracing::debug!(
            sequence,
            scenario = scenario.name,
            location,
            days_ago,
            bundle = %identifier,
            "assembled hemogram bundle"
        );

        HemogramBundleData {
            identifier,
            summary: build_summary(summary_url, member_urls, &ctx),
            measurements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::local_offset;
    use chrono::Duration;
    use fhir::HemogramBundle;
    use std::collections::HashSet;

    fn reference() -> DateTime<Utc> {
        "2026-10-19T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn bundle_has_panel_and_four_members() {
        let mut generator = HemogramGenerator::seeded(1, reference());
        let scenario = ScenarioProfile::find("normal").unwrap();
        let bundle = generator.assemble_bundle(1, scenario, "Setor Bueno");

        assert_eq!(bundle.measurements.len(), 4);
        assert_eq!(
            bundle.summary.members,
            bundle.measurements.iter().map(|m| m.full_url).collect::<Vec<_>>()
        );
        bundle.validate().expect("assembled bundle is valid");
    }

    #[test]
    fn values_follow_the_scenario() {
        let mut generator = HemogramGenerator::seeded(77, reference());

        for scenario in &SCENARIOS {
            for sequence in 1..=25 {
                let bundle = generator.assemble_bundle(sequence, scenario, "Centro");
                for record in &bundle.measurements {
                    let range = scenario.range_for(record.kind);
                    assert!(
                        range.contains(record.value),
                        "{} {:?} {}",
                        scenario.name,
                        record.kind,
                        record.value
                    );
                }
            }
        }
    }

    #[test]
    fn records_share_subject_and_timestamps() {
        let mut generator = HemogramGenerator::seeded(5, reference());
        let scenario = ScenarioProfile::find("dengue").unwrap();
        let bundle = generator.assemble_bundle(3, scenario, "Vila Nova");

        for record in &bundle.measurements {
            assert_eq!(record.subject_id, bundle.summary.subject_id);
            assert_eq!(record.collected_at, bundle.summary.collected_at);
            assert_eq!(record.issued_at, bundle.summary.issued_at);
            assert_eq!(record.location.as_deref(), Some("Vila Nova"));
        }
        assert_eq!(
            bundle.summary.issued_at - bundle.summary.collected_at,
            Duration::days(1)
        );
        let reference_local = reference().with_timezone(&local_offset());
        assert!(bundle.summary.collected_at <= reference_local);
        assert!(reference_local - bundle.summary.collected_at <= Duration::days(7));
    }

    #[test]
    fn identifiers_are_distinct_across_bundles() {
        let mut generator = HemogramGenerator::seeded(8, reference());
        let mut seen = HashSet::new();

        for sequence in 1..=50 {
            let scenario = generator.pick_scenario();
            let location = generator.pick_location();
            let bundle = generator.assemble_bundle(sequence, scenario, location);

            assert!(seen.insert(bundle.identifier));
            for url in bundle.full_urls() {
                assert!(seen.insert(url));
            }
        }
    }

    #[test]
    fn same_seed_renders_identical_documents() {
        let render = |seed| {
            let mut generator = HemogramGenerator::seeded(seed, reference());
            let scenario = generator.pick_scenario();
            let location = generator.pick_location();
            HemogramBundle::render(&generator.assemble_bundle(1, scenario, location)).unwrap()
        };

        assert_eq!(render(42), render(42));
        assert_ne!(render(42), render(43));
    }
}
