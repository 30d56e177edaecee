//! Field-level validation for person records.
//!
//! # Responsibility
//! - Reject records whose fields do not match the accepted formats.
//! - Keep rules pure: no I/O, no repository access.
//!
//! # Invariants
//! - Fields are checked in a fixed order and the first failure wins:
//!   id, type, first name, last name, mobile, email, pesel.
//! - Create and update flows apply identical rules; only the id message differs.

mod pesel;

use crate::model::person::Person;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use pesel::is_pesel_checksum_valid;

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-ZĄĆĘŁŃÓŚŹŻ][a-ząćęłńóśźż]+$").expect("valid name regex")
});
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+48[0-9]{9}$").expect("valid mobile regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PESEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{11}$").expect("valid pesel regex"));

/// Flow a record is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFlow {
    Create,
    Update,
}

/// Rule violation reported by person validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    MissingId(ValidationFlow),
    MissingField(&'static str),
    InvalidName(&'static str),
    InvalidMobile,
    InvalidEmail,
    PeselNotElevenDigits,
    PeselChecksum,
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId(ValidationFlow::Create) => write!(f, "personId is required"),
            Self::MissingId(ValidationFlow::Update) => {
                write!(f, "personId is required for update")
            }
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidName(field) => write!(
                f,
                "{field} must start with uppercase and then lowercase letters only"
            ),
            Self::InvalidMobile => write!(f, "mobile must match format +48XXXXXXXXX"),
            Self::InvalidEmail => write!(f, "email is invalid"),
            Self::PeselNotElevenDigits => write!(f, "pesel must be 11 digits"),
            Self::PeselChecksum => write!(f, "pesel checksum invalid"),
        }
    }
}

impl Error for PersonValidationError {}

/// Validates a record about to be created.
pub fn validate_new(person: &Person) -> Result<(), PersonValidationError> {
    validate(person, ValidationFlow::Create)
}

/// Validates a reconstructed record about to replace a stored one.
pub fn validate_update(person: &Person) -> Result<(), PersonValidationError> {
    validate(person, ValidationFlow::Update)
}

/// Runs every rule for the given flow.
pub fn validate(person: &Person, flow: ValidationFlow) -> Result<(), PersonValidationError> {
    if person.person_id().trim().is_empty() {
        return Err(PersonValidationError::MissingId(flow));
    }
    // `kind` is a required enum field, so the type rule holds by construction.

    check_name(person.first_name(), "firstName")?;
    check_name(person.last_name(), "lastName")?;

    let mobile = required(person.mobile(), "mobile")?;
    if !MOBILE_RE.is_match(mobile) {
        return Err(PersonValidationError::InvalidMobile);
    }

    let email = required(person.email(), "email")?;
    if !EMAIL_RE.is_match(email) {
        return Err(PersonValidationError::InvalidEmail);
    }

    let pesel = required(person.pesel(), "pesel")?;
    if !PESEL_RE.is_match(pesel) {
        return Err(PersonValidationError::PeselNotElevenDigits);
    }
    if !is_pesel_checksum_valid(pesel) {
        return Err(PersonValidationError::PeselChecksum);
    }

    Ok(())
}

fn check_name(value: &str, field: &'static str) -> Result<(), PersonValidationError> {
    let value = required(Some(value), field)?;
    if !NAME_RE.is_match(value) {
        return Err(PersonValidationError::InvalidName(field));
    }
    Ok(())
}

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, PersonValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PersonValidationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_new, validate_update, PersonValidationError, ValidationFlow};
    use crate::model::person::{Person, PersonType};

    fn base_valid_person() -> Person {
        Person::new("ID-123", PersonType::Internal, "Jan", "Kowalski")
            .with_mobile("+48123456789")
            .with_email("jan.kowalski@example.com")
            .with_pesel("72030663621")
    }

    fn assert_rejected(person: Person) -> PersonValidationError {
        let err = validate_update(&person).expect_err("record should be rejected");
        assert_eq!(validate_new(&person).unwrap_err(), err);
        err
    }

    #[test]
    fn valid_person_passes_both_flows() {
        let person = base_valid_person();
        validate_new(&person).expect("create flow should accept");
        validate_update(&person).expect("update flow should accept");
    }

    #[test]
    fn first_name_format() {
        for bad in ["jan", "JAN", "J", "Nowak-Kowalski", " Jan", "Jan ", "Jan Maria"] {
            assert_eq!(
                assert_rejected(base_valid_person().with_first_name(bad)),
                PersonValidationError::InvalidName("firstName"),
                "{bad:?} should be rejected"
            );
        }
        validate_update(&base_valid_person().with_first_name("Łukasz")).unwrap();
    }

    #[test]
    fn last_name_format() {
        for bad in ["kowalski", "KOWALSKI", "K"] {
            assert_eq!(
                assert_rejected(base_valid_person().with_last_name(bad)),
                PersonValidationError::InvalidName("lastName")
            );
        }
        validate_update(&base_valid_person().with_last_name("Żurawski")).unwrap();
    }

    #[test]
    fn blank_names_report_missing_field() {
        assert_eq!(
            assert_rejected(base_valid_person().with_first_name("   ")),
            PersonValidationError::MissingField("firstName")
        );
    }

    #[test]
    fn mobile_format() {
        for bad in ["+48 123456789", "123456789", "+4812345678", "+49123456789"] {
            assert_eq!(
                assert_rejected(base_valid_person().with_mobile(bad)),
                PersonValidationError::InvalidMobile,
                "{bad:?} should be rejected"
            );
        }
        validate_update(&base_valid_person().with_mobile("+48987654321")).unwrap();
    }

    #[test]
    fn missing_mobile_is_reported_before_email() {
        let person = Person::new("ID-1", PersonType::External, "Jan", "Kowalski");
        assert_eq!(
            validate_new(&person).unwrap_err(),
            PersonValidationError::MissingField("mobile")
        );
    }

    #[test]
    fn email_format() {
        for bad in ["jk@", "@example.com", "jk example.com", "jk@example", "a@@b.com"] {
            assert_eq!(
                assert_rejected(base_valid_person().with_email(bad)),
                PersonValidationError::InvalidEmail,
                "{bad:?} should be rejected"
            );
        }
        validate_update(&base_valid_person().with_email("jk@example.co.uk")).unwrap();
    }

    #[test]
    fn pesel_length_and_digits() {
        for bad in ["123", "abcdefghijk", "720306636211"] {
            assert_eq!(
                assert_rejected(base_valid_person().with_pesel(bad)),
                PersonValidationError::PeselNotElevenDigits
            );
        }
        assert_eq!(
            assert_rejected(base_valid_person().with_pesel("12345678901")),
            PersonValidationError::PeselChecksum
        );
    }

    #[test]
    fn pesel_checksum() {
        assert_eq!(
            assert_rejected(base_valid_person().with_pesel("72030663622")),
            PersonValidationError::PeselChecksum
        );
        validate_update(&base_valid_person().with_pesel("72030663621")).unwrap();
    }

    #[test]
    fn id_message_depends_on_flow() {
        let person = Person::new("  ", PersonType::Internal, "Jan", "Kowalski");
        let create = validate_new(&person).unwrap_err();
        let update = validate_update(&person).unwrap_err();
        assert_eq!(create, PersonValidationError::MissingId(ValidationFlow::Create));
        assert_eq!(create.to_string(), "personId is required");
        assert_eq!(update.to_string(), "personId is required for update");
    }
}
