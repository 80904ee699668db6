//! Resource identifier utilities.
//!
//! Every resource inside a generated hemogram bundle is addressed by a random (version 4) UUID.
//! Two renderings are used on the wire:
//!
//! - **URN form** for `fullUrl` and `hasMember` references: `urn:uuid:<hyphenated>`
//! - **Bare form** for the bundle `identifier.value`: `<hyphenated>`
//!
//! The hyphenated form is always lowercase, for example
//! `550e8400-e29b-41d4-a716-446655440000`.
//!
//! Identifiers can be drawn from an injected random number generator
//! ([`ResourceUuid::from_rng`]) so that a seeded run produces the same identifiers every time,
//! or from operating system entropy ([`ResourceUuid::new`]).

mod service;

// Re-export public types
pub use service::{ResourceUuid, Uuid, URN_UUID_PREFIX};

/// Error type for UUID operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for UUID operations.
pub type UuidResult<T> = Result<T, UuidError>;
