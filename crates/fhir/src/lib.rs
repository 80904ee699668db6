//! FHIR wire/boundary support for generated hemogram bundles.
//!
//! This crate provides **domain records** and **wire models** for the blood-count documents the
//! generator emits:
//! - domain-level records ([`MeasurementRecord`], [`SummaryRecord`], [`HemogramBundleData`])
//! - strict wire structs matching the FHIR R4 JSON layout
//! - translation between the two, rendering to JSON and parsing back
//!
//! The crate knows nothing about scenarios or randomness. It only guarantees that whatever it
//! renders is a self-contained bundle whose internal references resolve.

pub mod bundle;
pub mod constants;
pub mod observation;
mod wire;

// Re-export facades
pub use bundle::HemogramBundle;

// Re-export public domain-level types
pub use bundle::HemogramBundleData;
pub use observation::{
    format_timestamp, Interpretation, MeasurementKind, MeasurementRecord, ReferenceRange,
    SummaryRecord,
};

// Re-export ResourceUuid from hemo_uuid crate
pub use hemo_uuid::ResourceUuid;

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
