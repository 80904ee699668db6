//! Batch driver.
//!
//! Repeats scenario/location selection and bundle assembly `bundle_count` times, rendering each
//! bundle and handing it to a [`BundleSink`] under a descriptive filename.
//!
//! A failure stops the batch immediately. Bundles written before the failure stay where they are;
//! nothing is rolled back.

use crate::constants::{BUNDLE_FILENAME_EXTENSION, BUNDLE_FILENAME_PREFIX};
use crate::generator::HemogramGenerator;
use crate::scenario::ScenarioProfile;
use crate::sink::BundleSink;
use crate::GeneratorResult;
use fhir::{HemogramBundle, HemogramBundleData, Interpretation, MeasurementKind, ResourceUuid};
use rand::Rng;
use std::path::PathBuf;

/// Filename for one bundle: `hemograma-<NN>-<scenario>-<location>.json`.
///
/// `NN` is zero-padded to two digits and spaces in the location become underscores.
pub fn bundle_filename(sequence: u32, scenario: &str, location: &str) -> String {
    format!(
        "{BUNDLE_FILENAME_PREFIX}-{sequence:02}-{scenario}-{}.{BUNDLE_FILENAME_EXTENSION}",
        location.replace(' ', "_")
    )
}

/// One bundle the driver wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct WrittenBundle {
    pub sequence: u32,
    pub filename: String,
    pub path: PathBuf,
    pub scenario: &'static str,
    pub location: &'static str,
    pub identifier: ResourceUuid,
}

/// Outcome of a completed batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub bundles: Vec<WrittenBundle>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

/// `Leuc=7431, Plaq=231877, Hb=14.2, Ht=43.9`
fn describe_values(bundle: &HemogramBundleData) -> String {
    [
        MeasurementKind::Leukocytes,
        MeasurementKind::Platelets,
        MeasurementKind::Hemoglobin,
        MeasurementKind::Hematocrit,
    ]
    .iter()
    .filter_map(|kind| bundle.measurement(*kind))
    .map(|m| {
        format!(
            "{}={:.*}",
            m.kind.label(),
            m.kind.decimal_places() as usize,
            m.value
        )
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Values outside their reference range, e.g. `Plaq low`. Empty when everything is normal.
fn describe_flags(bundle: &HemogramBundleData) -> String {
    bundle
        .measurements
        .iter()
        .filter_map(|m| match m.interpretation() {
            Interpretation::Low => Some(format!("{} low", m.kind.label())),
            Interpretation::High => Some(format!("{} high", m.kind.label())),
            Interpretation::Normal => None,
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Drives one batch run.
pub struct BatchDriver<R, S> {
    generator: HemogramGenerator<R>,
    sink: S,
    bundle_count: u32,
    scenario: Option<&'static ScenarioProfile>,
}

impl<R: Rng, S: BundleSink> BatchDriver<R, S> {
    pub fn new(generator: HemogramGenerator<R>, sink: S, bundle_count: u32) -> Self {
        Self {
            generator,
            sink,
            bundle_count,
            scenario: None,
        }
    }

    /// Uses `scenario` for every bundle instead of picking one at random.
    pub fn with_scenario(mut self, scenario: Option<&'static ScenarioProfile>) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Generates and writes every bundle of the batch, numbered from 1.
    ///
    /// # Errors
    ///
    /// Returns the first rendering or sink error. Earlier bundles remain written.
    pub fn run(&mut self) -> GeneratorResult<BatchReport> {
        let mut report = BatchReport::default();

        for sequence in 1..=self.bundle_count {
            let scenario = match self.scenario {
                Some(fixed) => fixed,
                None => self.generator.pick_scenario(),
            };
            let location = self.generator.pick_location();

            let bundle = self.generator.assemble_bundle(sequence, scenario, location);
            let contents = HemogramBundle::render(&bundle)?;
            let filename = bundle_filename(sequence, scenario.name, location);
            let path = self.sink.write_bundle(&filename, &contents)?;

            tracing::info!(
                sequence,
                file = %filename,
                scenario = scenario.name,
                location,
                values = %describe_values(&bundle),
                flags = %describe_flags(&bundle),
                "generated hemogram bundle"
            );

            report.bundles.push(WrittenBundle {
                sequence,
                filename,
                path,
                scenario: scenario.name,
                location,
                identifier: bundle.identifier,
            });
        }

        Ok(report)
    }
}
