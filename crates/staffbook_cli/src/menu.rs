//! Interactive record menu.
//!
//! # Responsibility
//! - Translate line-oriented prompts into service calls.
//! - Print outcomes; domain failures never end the session.
//!
//! # Invariants
//! - Only terminal I/O errors and end of input stop the loop.

use staffbook_core::{
    Person, PersonFilter, PersonRepository, PersonService, PersonType, ServiceError,
};
use std::io::{self, BufRead, Write};

const SEPARATOR: &str = "-------------------------------------------------";

/// Drives the menu until the user exits or input ends.
pub fn run_menu<R, In, Out>(
    service: &PersonService<R>,
    input: &mut In,
    out: &mut Out,
) -> io::Result<()>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    let mut session = Session { input, out };
    loop {
        writeln!(session.out, "\n=== MENU ===")?;
        writeln!(session.out, "1. Add person")?;
        writeln!(session.out, "2. Find persons")?;
        writeln!(session.out, "3. Remove person")?;
        writeln!(session.out, "4. Modify person")?;
        writeln!(session.out, "5. List all")?;
        writeln!(session.out, "0. Exit")?;

        let Some(choice) = session.ask("Choose an option: ")? else {
            return Ok(());
        };
        let outcome = match choice.trim() {
            "1" => add_person(service, &mut session),
            "2" => find_persons(service, &mut session),
            "3" => remove_person(service, &mut session),
            "4" => modify_person(service, &mut session),
            "5" => list_all(service, &mut session),
            "0" => {
                writeln!(session.out, "Bye.")?;
                return Ok(());
            }
            _ => {
                writeln!(session.out, "Unknown option.")?;
                Ok(Step::Continue)
            }
        };
        match outcome? {
            Step::Continue => {}
            Step::EndOfInput => return Ok(()),
        }
    }
}

enum Step {
    Continue,
    EndOfInput,
}

struct Session<'a, In, Out> {
    input: &'a mut In,
    out: &'a mut Out,
}

impl<In: BufRead, Out: Write> Session<'_, In, Out> {
    /// Prints `label` and reads one line; `None` at end of input.
    fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like `ask`, but blank answers become `None` and values are trimmed.
    fn ask_optional(&mut self, label: &str) -> io::Result<Option<Option<String>>> {
        Ok(self.ask(label)?.map(|value| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }))
    }

    fn report(&mut self, err: &ServiceError) -> io::Result<()> {
        match err {
            ServiceError::Validation(reason) => writeln!(self.out, "Validation error: {reason}"),
            other => writeln!(self.out, "Error: {other}"),
        }
    }
}

macro_rules! answer {
    ($value:expr) => {
        match $value? {
            Some(value) => value,
            None => return Ok(Step::EndOfInput),
        }
    };
}

fn parse_type<Out: Write>(raw: &str, out: &mut Out) -> io::Result<Option<PersonType>> {
    match raw.parse::<PersonType>() {
        Ok(kind) => Ok(Some(kind)),
        Err(_) => {
            writeln!(out, "Error: invalid type (INTERNAL/EXTERNAL).")?;
            Ok(None)
        }
    }
}

fn add_person<R, In, Out>(
    service: &PersonService<R>,
    session: &mut Session<'_, In, Out>,
) -> io::Result<Step>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    let first = answer!(session.ask("First name: "));
    let last = answer!(session.ask("Last name: "));
    let mobile = answer!(session.ask("Mobile: "));
    let email = answer!(session.ask("Email: "));
    let pesel = answer!(session.ask("PESEL: "));
    let raw_type = answer!(session.ask("Type (INTERNAL/EXTERNAL): "));
    let Some(kind) = parse_type(&raw_type, session.out)? else {
        return Ok(Step::Continue);
    };

    let person = Person::new(PersonService::<R>::new_id(), kind, first, last)
        .with_mobile(mobile)
        .with_email(email)
        .with_pesel(pesel);

    match service.create(&person) {
        Ok(()) => {
            writeln!(session.out, "Added:")?;
            print_persons(session.out, std::slice::from_ref(&person))?;
        }
        Err(err) => session.report(&err)?,
    }
    Ok(Step::Continue)
}

fn find_persons<R, In, Out>(
    service: &PersonService<R>,
    session: &mut Session<'_, In, Out>,
) -> io::Result<Step>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    let person_id = answer!(session.ask_optional("Id (Enter = skip): "));
    let raw_type = answer!(session.ask_optional("Type (INTERNAL/EXTERNAL/Enter): "));
    let kind = match raw_type {
        Some(raw) => match parse_type(&raw, session.out)? {
            Some(kind) => Some(kind),
            None => return Ok(Step::Continue),
        },
        None => None,
    };
    let first_name = answer!(session.ask_optional("First name (Enter = skip): "));
    let last_name = answer!(session.ask_optional("Last name (Enter = skip): "));
    let mobile = answer!(session.ask_optional("Mobile (Enter = skip): "));
    let pesel = answer!(session.ask_optional("PESEL (Enter = skip): "));
    let email = answer!(session.ask_optional("Email (Enter = skip): "));

    let filter = PersonFilter {
        person_id,
        kind,
        first_name,
        last_name,
        mobile,
        pesel,
        email,
    };
    if filter.is_empty() {
        writeln!(session.out, "No filters given; listing all persons.")?;
    }
    match service.find_all_by(&filter) {
        Ok(found) if found.is_empty() => writeln!(session.out, "No results.")?,
        Ok(found) => print_persons(session.out, &found)?,
        Err(err) => session.report(&err)?,
    }
    Ok(Step::Continue)
}

fn remove_person<R, In, Out>(
    service: &PersonService<R>,
    session: &mut Session<'_, In, Out>,
) -> io::Result<Step>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    let person_id = answer!(session.ask("Id to remove: "));
    match service.remove(person_id.trim()) {
        Ok(true) => writeln!(session.out, "Removed.")?,
        Ok(false) => writeln!(session.out, "Not found.")?,
        Err(err) => session.report(&err)?,
    }
    Ok(Step::Continue)
}

fn modify_person<R, In, Out>(
    service: &PersonService<R>,
    session: &mut Session<'_, In, Out>,
) -> io::Result<Step>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    let person_id = answer!(session.ask("Id to modify: "));
    let mut person = match service.find(&PersonFilter::by_id(person_id.trim())) {
        Ok(Some(person)) => person,
        Ok(None) => {
            writeln!(session.out, "Not found.")?;
            return Ok(Step::Continue);
        }
        Err(err) => {
            session.report(&err)?;
            return Ok(Step::Continue);
        }
    };

    writeln!(session.out, "Current data:")?;
    print_persons(session.out, std::slice::from_ref(&person))?;
    writeln!(session.out, "Enter a new value or press Enter to keep it.")?;

    if let Some(value) = answer!(session.ask_optional("New first name: ")) {
        person = person.with_first_name(value);
    }
    if let Some(value) = answer!(session.ask_optional("New last name: ")) {
        person = person.with_last_name(value);
    }
    if let Some(value) = answer!(session.ask_optional("New mobile: ")) {
        person = person.with_mobile(value);
    }
    if let Some(value) = answer!(session.ask_optional("New email: ")) {
        person = person.with_email(value);
    }
    if let Some(value) = answer!(session.ask_optional("New PESEL: ")) {
        person = person.with_pesel(value);
    }
    if let Some(raw) = answer!(session.ask_optional("New type (INTERNAL/EXTERNAL/Enter): ")) {
        match parse_type(&raw, session.out)? {
            Some(kind) => person = person.with_type(kind),
            None => return Ok(Step::Continue),
        }
    }

    match service.modify(&person) {
        Ok(()) => {
            writeln!(session.out, "Updated:")?;
            print_persons(session.out, std::slice::from_ref(&person))?;
        }
        Err(err) => session.report(&err)?,
    }
    Ok(Step::Continue)
}

fn list_all<R, In, Out>(
    service: &PersonService<R>,
    session: &mut Session<'_, In, Out>,
) -> io::Result<Step>
where
    R: PersonRepository,
    In: BufRead,
    Out: Write,
{
    match service.find_all_by(&PersonFilter::default()) {
        Ok(all) if all.is_empty() => writeln!(session.out, "No persons stored.")?,
        Ok(all) => print_persons(session.out, &all)?,
        Err(err) => session.report(&err)?,
    }
    Ok(Step::Continue)
}

fn print_persons<Out: Write>(out: &mut Out, persons: &[Person]) -> io::Result<()> {
    for person in persons {
        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "ID:         {}", person.person_id())?;
        writeln!(out, "Type:       {}", person.kind())?;
        writeln!(out, "First name: {}", person.first_name())?;
        writeln!(out, "Last name:  {}", person.last_name())?;
        writeln!(out, "Mobile:     {}", person.mobile().unwrap_or("-"))?;
        writeln!(out, "Email:      {}", person.email().unwrap_or("-"))?;
        writeln!(out, "PESEL:      {}", person.pesel().unwrap_or("-"))?;
    }
    writeln!(out, "{SEPARATOR}")
}
