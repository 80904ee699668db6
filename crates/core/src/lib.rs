//! # Hemogram generator core
//!
//! Business logic for producing sample hemogram bundles:
//! - static scenario and location tables
//! - synthetic identifiers and timestamps
//! - record builders and bundle assembly
//! - the batch driver and its file-system sink
//!
//! **No FHIR wire concerns**: JSON layout, rendering and parsing live in the `fhir` crate.
//! **No CLI concerns**: argument parsing and logging setup belong to the binary.

pub mod batch;
pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod identifiers;
pub mod scenario;
pub mod sink;

pub use batch::{bundle_filename, BatchDriver, BatchReport, WrittenBundle};
pub use config::{resolve_output_dir, GeneratorConfig};
pub use error::{GeneratorError, GeneratorResult};
pub use generator::HemogramGenerator;
pub use scenario::{ScenarioProfile, ValueRange, LOCATIONS, SCENARIOS};
pub use sink::{BundleSink, DirectorySink};

use chrono::{DateTime, Utc};

/// Runs one batch as described by `cfg`, writing into its output directory.
///
/// Timestamps are placed relative to `reference_time`. With a seed in `cfg`, the same seed and
/// reference time produce byte-identical files.
///
/// # Errors
///
/// Returns a [`GeneratorError`] if the output directory cannot be created or any bundle cannot
/// be rendered or written. Files written before the failure are kept.
pub fn generate_batch(
    cfg: &GeneratorConfig,
    reference_time: DateTime<Utc>,
) -> GeneratorResult<BatchReport> {
    let sink = DirectorySink::create(cfg.output_dir())?;

    let generator = match cfg.seed() {
        Some(seed) => HemogramGenerator::seeded(seed, reference_time),
        None => HemogramGenerator::from_entropy(reference_time),
    };

    BatchDriver::new(generator, sink, cfg.bundle_count())
        .with_scenario(cfg.scenario())
        .run()
}
