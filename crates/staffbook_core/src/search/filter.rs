//! Field filter for person queries.
//!
//! # Responsibility
//! - Describe a query as data: one optional value per record field.
//! - Evaluate that description against a record without any I/O.
//!
//! # Invariants
//! - An absent field never restricts the result.
//! - Names and email compare case-insensitively; id, mobile and pesel exactly.

use crate::model::person::{Person, PersonType};

/// Query over person records.
///
/// Every `Some` field must match for a record to be selected. The default
/// value selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub person_id: Option<String>,
    pub kind: Option<PersonType>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub pesel: Option<String>,
    pub email: Option<String>,
}

impl PersonFilter {
    /// Filter selecting exactly one id.
    pub fn by_id(person_id: impl Into<String>) -> Self {
        Self {
            person_id: Some(person_id.into()),
            ..Self::default()
        }
    }

    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns whether `person` satisfies every supplied field.
    pub fn matches(&self, person: &Person) -> bool {
        exact(&self.person_id, Some(person.person_id()))
            && self.kind.map_or(true, |kind| kind == person.kind())
            && ignore_case(&self.first_name, Some(person.first_name()))
            && ignore_case(&self.last_name, Some(person.last_name()))
            && exact(&self.mobile, person.mobile())
            && ignore_case(&self.email, person.email())
            && exact(&self.pesel, person.pesel())
    }
}

fn exact(expected: &Option<String>, actual: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => actual == Some(expected.as_str()),
    }
}

fn ignore_case(expected: &Option<String>, actual: Option<&str>) -> bool {
    match (expected, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(expected), Some(actual)) => expected.to_lowercase() == actual.to_lowercase(),
    }
}
