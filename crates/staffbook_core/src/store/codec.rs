//! XML document codec for person records.
//!
//! # Responsibility
//! - Encode a `Person` into the `<person>` document stored on disk.
//! - Decode that document back, with the type supplied by the caller.
//!
//! # Invariants
//! - The type is never written into the document.
//! - Absent optional fields encode as empty elements; empty elements decode
//!   back to `None`.
//! - Document type declarations are rejected. External entities and DTDs are
//!   never resolved; only predefined entities and character references expand.

use crate::model::person::{Person, PersonType};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ROOT_TAG: &str = "person";
const TAG_PERSON_ID: &str = "personId";
const TAG_FIRST_NAME: &str = "firstName";
const TAG_LAST_NAME: &str = "lastName";
const TAG_MOBILE: &str = "mobile";
const TAG_EMAIL: &str = "email";
const TAG_PESEL: &str = "pesel";

const FIELD_TAGS: [&str; 6] = [
    TAG_PERSON_ID,
    TAG_FIRST_NAME,
    TAG_LAST_NAME,
    TAG_MOBILE,
    TAG_EMAIL,
    TAG_PESEL,
];

/// Failure while encoding or decoding a person document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The document declares a DTD, which is never accepted.
    DoctypeForbidden,
    /// The XML itself is not well formed.
    Malformed(String),
    /// The document parsed but does not have the expected shape.
    InvalidShape(String),
    /// Writing the document failed.
    Write(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DoctypeForbidden => write!(f, "document type declarations are not allowed"),
            Self::Malformed(message) => write!(f, "malformed xml: {message}"),
            Self::InvalidShape(message) => write!(f, "unexpected document shape: {message}"),
            Self::Write(message) => write!(f, "failed to write xml: {message}"),
        }
    }
}

impl Error for CodecError {}

/// Serializes one record into an indented UTF-8 XML document.
pub fn encode_person(person: &Person) -> Result<Vec<u8>, CodecError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))),
    )?;
    write_event(&mut writer, Event::Start(BytesStart::new(ROOT_TAG)))?;

    let fields = [
        (TAG_PERSON_ID, person.person_id()),
        (TAG_FIRST_NAME, person.first_name()),
        (TAG_LAST_NAME, person.last_name()),
        (TAG_MOBILE, person.mobile().unwrap_or("")),
        (TAG_EMAIL, person.email().unwrap_or("")),
        (TAG_PESEL, person.pesel().unwrap_or("")),
    ];
    for (tag, value) in fields {
        if value.is_empty() {
            write_event(&mut writer, Event::Empty(BytesStart::new(tag)))?;
            continue;
        }
        write_event(&mut writer, Event::Start(BytesStart::new(tag)))?;
        write_event(&mut writer, Event::Text(BytesText::new(value)))?;
        write_event(&mut writer, Event::End(BytesEnd::new(tag)))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(ROOT_TAG)))?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parses one record document.
///
/// `kind` comes from the directory the file was found in.
pub fn decode_person(xml: &str, kind: PersonType) -> Result<Person, CodecError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut values: [Option<String>; 6] = Default::default();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<usize> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| CodecError::Malformed(err.to_string()))?;
        match event {
            Event::DocType(_) => return Err(CodecError::DoctypeForbidden),
            Event::Start(start) => {
                let name = tag_name(start.name().as_ref())?;
                depth += 1;
                match depth {
                    1 => {
                        if name != ROOT_TAG {
                            return Err(CodecError::InvalidShape(format!(
                                "root element is `{name}`, expected `{ROOT_TAG}`"
                            )));
                        }
                        saw_root = true;
                    }
                    2 => {
                        current = field_index(&name);
                        if let Some(index) = current {
                            if values[index].is_some() {
                                return Err(CodecError::InvalidShape(format!(
                                    "element `{name}` appears more than once"
                                )));
                            }
                            values[index] = Some(String::new());
                        }
                    }
                    _ => {
                        if current.is_some() {
                            return Err(CodecError::InvalidShape(format!(
                                "unexpected nested element `{name}`"
                            )));
                        }
                    }
                }
            }
            Event::Empty(start) => {
                let name = tag_name(start.name().as_ref())?;
                if depth == 0 {
                    return Err(CodecError::InvalidShape(format!(
                        "root element `{name}` has no fields"
                    )));
                }
                if depth == 1 {
                    if let Some(index) = field_index(&name) {
                        if values[index].replace(String::new()).is_some() {
                            return Err(CodecError::InvalidShape(format!(
                                "element `{name}` appears more than once"
                            )));
                        }
                    }
                } else if current.is_some() {
                    return Err(CodecError::InvalidShape(format!(
                        "unexpected nested element `{name}`"
                    )));
                }
            }
            Event::Text(text) => {
                if let Some(index) = current.filter(|_| depth == 2) {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| CodecError::Malformed(err.to_string()))?;
                    if let Some(value) = values[index].as_mut() {
                        value.push_str(&unescaped);
                    }
                }
            }
            Event::CData(data) => {
                if let Some(index) = current.filter(|_| depth == 2) {
                    let raw = data.into_inner();
                    let raw = std::str::from_utf8(&raw)
                        .map_err(|err| CodecError::Malformed(err.to_string()))?;
                    if let Some(value) = values[index].as_mut() {
                        value.push_str(raw);
                    }
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    current = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                if depth != 0 {
                    return Err(CodecError::Malformed(
                        "document ends inside an open element".to_string(),
                    ));
                }
                break;
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
        }
    }

    if !saw_root {
        return Err(CodecError::InvalidShape(format!(
            "missing `{ROOT_TAG}` root element"
        )));
    }

    let [person_id, first_name, last_name, mobile, email, pesel] = values;
    let person_id = person_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| CodecError::InvalidShape(format!("missing `{TAG_PERSON_ID}` value")))?;

    Ok(Person::new(
        person_id,
        kind,
        first_name.unwrap_or_default(),
        last_name.unwrap_or_default(),
    )
    .with_contact(empty_to_none(mobile), empty_to_none(email), empty_to_none(pesel)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), CodecError> {
    writer
        .write_event(event)
        .map_err(|err| CodecError::Write(err.to_string()))
}

fn tag_name(raw: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| CodecError::Malformed(err.to_string()))
}

fn field_index(name: &str) -> Option<usize> {
    FIELD_TAGS.iter().position(|tag| *tag == name)
}

fn empty_to_none(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{decode_person, encode_person, CodecError};
    use crate::model::person::{Person, PersonType};

    fn sample() -> Person {
        Person::new("P-1", PersonType::Internal, "Anna", "Nowak")
            .with_mobile("+48500500500")
            .with_email("anna.nowak@example.com")
            .with_pesel("02270803624")
    }

    #[test]
    fn encoded_document_has_expected_tags_and_no_type() {
        let xml = String::from_utf8(encode_person(&sample()).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<personId>P-1</personId>"));
        assert!(xml.contains("<firstName>Anna</firstName>"));
        assert!(xml.contains("<mobile>+48500500500</mobile>"));
        assert!(xml.contains("<pesel>02270803624</pesel>"));
        assert!(!xml.to_ascii_lowercase().contains("internal"));
    }

    #[test]
    fn decode_takes_type_from_caller() {
        let xml = String::from_utf8(encode_person(&sample()).unwrap()).unwrap();
        let decoded = decode_person(&xml, PersonType::External).unwrap();
        assert_eq!(decoded, sample().with_type(PersonType::External));
    }

    #[test]
    fn absent_fields_become_empty_and_decode_to_none() {
        let person = Person::new("P-2", PersonType::External, "Jan", "Kowalski");
        let xml = String::from_utf8(encode_person(&person).unwrap()).unwrap();
        assert!(xml.contains("<mobile/>"));

        let decoded = decode_person(&xml, PersonType::External).unwrap();
        assert_eq!(decoded.mobile(), None);
        assert_eq!(decoded.email(), None);
        assert_eq!(decoded.pesel(), None);
    }

    #[test]
    fn self_closing_fields_decode_to_none() {
        let xml = "<person><personId>X</personId><firstName>Jan</firstName>\
                   <lastName>Nowak</lastName><mobile/><email/><pesel/></person>";
        let decoded = decode_person(xml, PersonType::Internal).unwrap();
        assert_eq!(decoded.person_id(), "X");
        assert_eq!(decoded.mobile(), None);
    }

    #[test]
    fn special_characters_are_escaped() {
        let person = sample().with_email("a&b<c>@example.com");
        let xml = String::from_utf8(encode_person(&person).unwrap()).unwrap();
        assert!(xml.contains("a&amp;b&lt;c&gt;@example.com"));
        let decoded = decode_person(&xml, PersonType::Internal).unwrap();
        assert_eq!(decoded.email(), Some("a&b<c>@example.com"));
    }

    #[test]
    fn doctype_is_rejected() {
        let xml = r#"<?xml version="1.0"?>
<!DOCTYPE person [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<person><personId>&xxe;</personId></person>"#;
        assert_eq!(
            decode_person(xml, PersonType::Internal).unwrap_err(),
            CodecError::DoctypeForbidden
        );
    }

    #[test]
    fn undefined_entity_is_malformed() {
        let xml = "<person><personId>&xxe;</personId></person>";
        assert!(matches!(
            decode_person(xml, PersonType::Internal),
            Err(CodecError::Malformed(_))
        ));
    }

    #[test]
    fn missing_id_or_wrong_root_is_rejected() {
        assert!(matches!(
            decode_person("<person><firstName>Jan</firstName></person>", PersonType::Internal),
            Err(CodecError::InvalidShape(_))
        ));
        assert!(matches!(
            decode_person("<employee><personId>X</personId></employee>", PersonType::Internal),
            Err(CodecError::InvalidShape(_))
        ));
        assert!(decode_person("", PersonType::Internal).is_err());
    }

    #[test]
    fn truncated_document_is_malformed() {
        assert!(matches!(
            decode_person("<person><personId>X</personId>", PersonType::Internal),
            Err(CodecError::Malformed(_))
        ));
        assert!(decode_person("<person><personId>X</personId><first", PersonType::Internal).is_err());
    }
}
