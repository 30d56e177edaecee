use staffbook_core::{Person, PersonType};
use uuid::Uuid;

#[test]
fn person_new_sets_defaults() {
    let person = Person::new("ID-1", PersonType::Internal, "Jan", "Kowalski");

    assert_eq!(person.person_id(), "ID-1");
    assert_eq!(person.kind(), PersonType::Internal);
    assert_eq!(person.first_name(), "Jan");
    assert_eq!(person.last_name(), "Kowalski");
    assert_eq!(person.mobile(), None);
    assert_eq!(person.email(), None);
    assert_eq!(person.pesel(), None);
}

#[test]
fn generated_id_is_a_v4_uuid() {
    let id = Person::generate_id();
    let parsed = Uuid::parse_str(&id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
}

#[test]
fn with_helpers_build_new_values() {
    let original = Person::new("ID-1", PersonType::Internal, "Jan", "Kowalski");
    let updated = original
        .clone()
        .with_first_name("Łukasz")
        .with_last_name("Żurawski")
        .with_mobile("+48123456789")
        .with_email("l.z@example.com")
        .with_pesel("72030663621")
        .with_type(PersonType::External);

    assert_eq!(original.first_name(), "Jan");
    assert_eq!(updated.person_id(), original.person_id());
    assert_eq!(updated.first_name(), "Łukasz");
    assert_eq!(updated.last_name(), "Żurawski");
    assert_eq!(updated.pesel(), Some("72030663621"));
    assert_eq!(updated.kind(), PersonType::External);
}

#[test]
fn person_serialization_uses_expected_fields() {
    let person = Person::new("ID-7", PersonType::External, "Anna", "Nowak")
        .with_email("anna.nowak@example.com");

    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(json["person_id"], "ID-7");
    assert_eq!(json["type"], "external");
    assert_eq!(json["email"], "anna.nowak@example.com");
    assert!(json["mobile"].is_null());

    let decoded: Person = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn type_labels_parse_case_insensitively() {
    assert_eq!("INTERNAL".parse::<PersonType>().unwrap(), PersonType::Internal);
    assert_eq!(" external ".parse::<PersonType>().unwrap(), PersonType::External);
    assert!("".parse::<PersonType>().is_err());
    assert_eq!(PersonType::External.to_string(), "EXTERNAL");
    assert_eq!(PersonType::Internal.directory_name(), "Internal");
}
