//! Internal implementation of resource identifiers.

use crate::{UuidError, UuidResult};
use rand::RngCore;
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Namespace prefix used for `fullUrl` values and internal references.
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// A version 4 UUID identifying one resource (or one bundle) in a generated document.
///
/// Once constructed the identifier always renders in lowercase hyphenated form. Use
/// [`ResourceUuid::urn`] for the `urn:uuid:` form used by bundle entries.
///
/// # Construction
/// - [`ResourceUuid::new`] draws from operating system entropy.
/// - [`ResourceUuid::from_rng`] draws from a caller-supplied generator.
/// - [`ResourceUuid::parse`] / [`ResourceUuid::parse_urn`] validate rendered identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceUuid(Uuid);

impl Default for ResourceUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceUuid {
    /// Generates a new identifier from operating system entropy.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Generates a new identifier from the given random number generator.
    ///
    /// The version and variant bits are set as for any v4 UUID, so the result is
    /// indistinguishable from [`ResourceUuid::new`] apart from where the randomness came from.
    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        Self(::uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Validates and parses an identifier in lowercase hyphenated form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not a lowercase hyphenated UUID.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 36 lowercase hyphenated hex characters, got: '{}'",
                input
            )));
        }

        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("Invalid UUID '{}': {}", input, e)))
    }

    /// Validates and parses an identifier in `urn:uuid:` form.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if the prefix is missing or the remainder is not a
    /// lowercase hyphenated UUID.
    pub fn parse_urn(input: &str) -> UuidResult<Self> {
        let rest = input.strip_prefix(URN_UUID_PREFIX).ok_or_else(|| {
            UuidError::InvalidInput(format!(
                "Reference must start with '{}', got: '{}'",
                URN_UUID_PREFIX, input
            ))
        })?;
        Self::parse(rest)
    }

    /// Returns true if `input` is a lowercase hyphenated UUID (`8-4-4-4-12`).
    ///
    /// This is a purely syntactic check.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns the `urn:uuid:` form of this identifier.
    pub fn urn(&self) -> String {
        format!("{}{}", URN_UUID_PREFIX, self.0.hyphenated())
    }
}

impl fmt::Display for ResourceUuid {
    /// Formats the identifier in lowercase hyphenated form, without the URN prefix.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceUuid {
    type Err = UuidError;

    /// Accepts either the bare hyphenated form or the `urn:uuid:` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(URN_UUID_PREFIX) {
            Self::parse_urn(s)
        } else {
            Self::parse(s)
        }
    }
}
