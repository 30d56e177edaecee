//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical employee record handled by repository and service.
//! - Provide value-style reconstruction helpers (`with_*`) for updates.
//!
//! # Invariants
//! - `person_id` is assigned once at creation and never changes.
//! - A `Person` is never mutated in place; updates build a new value.
//! - `kind` decides the storage partition and is not stored inside the file.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Storage partition of a person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonType {
    /// Staff employed directly.
    Internal,
    /// Contractors and other external collaborators.
    External,
}

impl PersonType {
    /// Every variant, in lookup order.
    pub const ALL: [PersonType; 2] = [PersonType::Internal, PersonType::External];

    /// Name of the subdirectory holding records of this type.
    pub fn directory_name(self) -> &'static str {
        match self {
            Self::Internal => "Internal",
            Self::External => "External",
        }
    }

    /// Maps a directory name back to its type.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for anything that is not one of the two known names.
    pub fn from_directory_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "internal" => Some(Self::Internal),
            "external" => Some(Self::External),
            _ => None,
        }
    }

    /// Upper-case label used by interactive prompts and listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
        }
    }
}

impl Display for PersonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a type label cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPersonType(pub String);

impl Display for UnknownPersonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown person type `{}`; expected INTERNAL|EXTERNAL",
            self.0
        )
    }
}

impl std::error::Error for UnknownPersonType {}

impl FromStr for PersonType {
    type Err = UnknownPersonType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_directory_name(value).ok_or_else(|| UnknownPersonType(value.to_string()))
    }
}

/// One employee record.
///
/// Contact fields are optional at the storage layer; validation requires
/// them before a record may be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    person_id: String,
    #[serde(rename = "type")]
    kind: PersonType,
    first_name: String,
    last_name: String,
    mobile: Option<String>,
    email: Option<String>,
    pesel: Option<String>,
}

impl Person {
    /// Creates a record with the given identity and names, without contact data.
    pub fn new(
        person_id: impl Into<String>,
        kind: PersonType,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            kind,
            first_name: first_name.into(),
            last_name: last_name.into(),
            mobile: None,
            email: None,
            pesel: None,
        }
    }

    /// Mints a fresh random identifier for a new record.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn kind(&self) -> PersonType {
        self.kind
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn mobile(&self) -> Option<&str> {
        self.mobile.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn pesel(&self) -> Option<&str> {
        self.pesel.as_deref()
    }

    pub fn with_type(self, kind: PersonType) -> Self {
        Self { kind, ..self }
    }

    pub fn with_first_name(self, first_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            ..self
        }
    }

    pub fn with_last_name(self, last_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            ..self
        }
    }

    pub fn with_mobile(self, mobile: impl Into<String>) -> Self {
        Self {
            mobile: Some(mobile.into()),
            ..self
        }
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..self
        }
    }

    pub fn with_pesel(self, pesel: impl Into<String>) -> Self {
        Self {
            pesel: Some(pesel.into()),
            ..self
        }
    }

    /// Replaces all three optional contact fields at once.
    ///
    /// Used by the decoder, where empty on-disk values map to `None`.
    pub fn with_contact(
        self,
        mobile: Option<String>,
        email: Option<String>,
        pesel: Option<String>,
    ) -> Self {
        Self {
            mobile,
            email,
            pesel,
            ..self
        }
    }
}
