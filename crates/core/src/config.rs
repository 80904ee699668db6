//! Generator runtime configuration.
//!
//! This module defines configuration that is resolved once at process startup (from command-line
//! arguments) and then passed into the batch run. Validation happens in the constructor so a
//! bad value is reported before any file is written.

use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::scenario::ScenarioProfile;
use crate::{GeneratorError, GeneratorResult};
use std::path::{Path, PathBuf};

/// Generator configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    output_dir: PathBuf,
    bundle_count: u32,
    seed: Option<u64>,
    scenario: Option<&'static ScenarioProfile>,
}

impl GeneratorConfig {
    /// Create a new `GeneratorConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidInput`] if `bundle_count` is zero or `scenario` does not
    /// name a known scenario.
    pub fn new(
        output_dir: PathBuf,
        bundle_count: u32,
        seed: Option<u64>,
        scenario: Option<&str>,
    ) -> GeneratorResult<Self> {
        if bundle_count == 0 {
            return Err(GeneratorError::InvalidInput(
                "bundle count must be at least 1".into(),
            ));
        }

        let scenario = scenario
            .map(|name| {
                ScenarioProfile::find(name).ok_or_else(|| {
                    GeneratorError::InvalidInput(format!(
                        "unknown scenario '{}' (expected one of: {})",
                        name,
                        ScenarioProfile::names().join(", ")
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            output_dir,
            bundle_count,
            seed,
            scenario,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn bundle_count(&self) -> u32 {
        self.bundle_count
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn scenario(&self) -> Option<&'static ScenarioProfile> {
        self.scenario
    }
}

/// Resolve the output directory.
///
/// An explicit `override_dir` wins; otherwise the default directory under `base_dir`.
pub fn resolve_output_dir(override_dir: Option<PathBuf>, base_dir: &Path) -> PathBuf {
    override_dir.unwrap_or_else(|| base_dir.join(DEFAULT_OUTPUT_DIR))
}
