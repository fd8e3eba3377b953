//! Core domain types for cepfetch.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

use serde::{Serialize, Serializer};
use std::fmt;

// ============================================================================
// Lookup Key
// ============================================================================

/// The postal code (CEP) a caller wants resolved.
///
/// Opaque: no format validation happens here. Fetchers receive it exactly as
/// the caller supplied it and are responsible for encoding it into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LookupKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LookupKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Source
// ============================================================================

/// Which provider produced an [`AddressResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    ViaCep,
    BrasilApi,
    /// A provider registered outside the built-in set.
    Custom(&'static str),
}

impl Source {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Source::ViaCep => "ViaCEP",
            Source::BrasilApi => "BrasilAPI",
            Source::Custom(name) => name,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Address Result
// ============================================================================

/// Provider-agnostic address record.
///
/// Fields are plain text and may be empty; providers are trusted to echo what
/// they know. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressResult {
    source: Source,
    state: String,
    city: String,
    street: String,
    zip_code: String,
    neighborhood: String,
}

impl AddressResult {
    #[must_use]
    pub fn builder(source: Source) -> AddressResultBuilder {
        AddressResultBuilder {
            source,
            state: String::new(),
            city: String::new(),
            street: String::new(),
            zip_code: String::new(),
            neighborhood: String::new(),
        }
    }

    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    #[must_use]
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    #[must_use]
    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    /// Field label/value pairs in display order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("source", self.source.as_str()),
            ("state", &self.state),
            ("city", &self.city),
            ("street", &self.street),
            ("zip_code", &self.zip_code),
            ("neighborhood", &self.neighborhood),
        ]
    }
}

impl fmt::Display for AddressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} - {}/{}, {} [{}]",
            self.street, self.neighborhood, self.city, self.state, self.zip_code, self.source
        )
    }
}

/// Builder for [`AddressResult`]. Unset fields stay empty.
#[derive(Debug, Clone)]
pub struct AddressResultBuilder {
    source: Source,
    state: String,
    city: String,
    street: String,
    zip_code: String,
    neighborhood: String,
}

impl AddressResultBuilder {
    #[must_use]
    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = value.into();
        self
    }

    #[must_use]
    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.city = value.into();
        self
    }

    #[must_use]
    pub fn street(mut self, value: impl Into<String>) -> Self {
        self.street = value.into();
        self
    }

    #[must_use]
    pub fn zip_code(mut self, value: impl Into<String>) -> Self {
        self.zip_code = value.into();
        self
    }

    #[must_use]
    pub fn neighborhood(mut self, value: impl Into<String>) -> Self {
        self.neighborhood = value.into();
        self
    }

    #[must_use]
    pub fn build(self) -> AddressResult {
        AddressResult {
            source: self.source,
            state: self.state,
            city: self.city,
            street: self.street,
            zip_code: self.zip_code,
            neighborhood: self.neighborhood,
        }
    }
}
