//! Field and cross-field rules for commands.
//!
//! Every function evaluates the whole command and reports all violated rules
//! at once as [`Error::Validation`]. Derived constraints (the TIN length
//! depends on the client type) are computed from the command itself.

use chrono::NaiveDate;

use crate::{
  Error, FieldError, Result,
  command::{CreateClient, CreateFounder, CreatePerson, UpdateClient, UpdateFounder, UpdatePerson},
  entity::ClientType,
};

pub const MAX_PERSON_NAME:    usize = 30;
pub const MAX_PERSON_SURNAME: usize = 50;
pub const MAX_PATRONYMIC:     usize = 50;
pub const MAX_CLIENT_NAME:    usize = 50;

/// Accumulates violations for one command.
#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
  fn push(&mut self, property: &str, message: impl Into<String>) {
    self.0.push(FieldError::new(property, message));
  }

  fn required(&mut self, property: &str, value: &str) -> bool {
    if value.trim().is_empty() {
      self.push(property, format!("'{property}' must not be empty."));
      return false;
    }
    true
  }

  fn max_len(&mut self, property: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
      self.push(
        property,
        format!("The length of '{property}' must be {max} characters or fewer. You entered {len} characters."),
      );
    }
  }

  fn before(&mut self, property: &str, value: NaiveDate, today: NaiveDate) {
    if value >= today {
      self.push(property, format!("'{property}' must be less than '{today}'."));
    }
  }

  fn finish(self) -> Result<()> {
    if self.0.is_empty() { Ok(()) } else { Err(Error::Validation(self.0)) }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

pub fn create_person(cmd: &CreatePerson, today: NaiveDate) -> Result<()> {
  let mut v = Violations::default();

  if v.required("Name", &cmd.name) {
    v.max_len("Name", &cmd.name, MAX_PERSON_NAME);
  }
  if v.required("Surname", &cmd.surname) {
    v.max_len("Surname", &cmd.surname, MAX_PERSON_SURNAME);
  }
  if let Some(p) = &cmd.patronymic {
    v.max_len("Patronymic", p, MAX_PATRONYMIC);
  }
  match cmd.birthday {
    Some(b) => v.before("Birthday", b, today),
    None => v.push("Birthday", "'Birthday' must not be empty."),
  }

  v.finish()
}

/// Rules for the fields an update actually supplies. Empty names mean "keep".
pub fn update_person(cmd: &UpdatePerson, today: NaiveDate) -> Result<()> {
  let mut v = Violations::default();

  if let Some(name) = &cmd.name {
    v.max_len("Name", name, MAX_PERSON_NAME);
  }
  if let Some(surname) = &cmd.surname {
    v.max_len("Surname", surname, MAX_PERSON_SURNAME);
  }
  if let Some(p) = cmd.patronymic.as_value() {
    v.max_len("Patronymic", p, MAX_PATRONYMIC);
  }
  if let Some(b) = cmd.birthday {
    v.before("Birthday", b, today);
  }

  v.finish()
}

// ─── Founder ─────────────────────────────────────────────────────────────────

pub fn create_founder(cmd: &CreateFounder) -> Result<()> {
  let mut v = Violations::default();
  if cmd.person_id == 0 {
    v.push("PersonId", "'PersonId' must not be empty.");
  }
  v.finish()
}

pub fn update_founder(cmd: &UpdateFounder) -> Result<()> {
  let mut v = Violations::default();
  if cmd.person_id == Some(0) {
    v.push("PersonId", "'PersonId' must not be empty.");
  }
  v.finish()
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Expected TIN length for a raw type discriminant, or `None` when the
/// discriminant is out of range.
pub fn expected_tin_length(kind: i64) -> Option<usize> {
  ClientType::from_discriminant(kind).map(ClientType::tin_length)
}

fn check_type(v: &mut Violations, kind: i64) -> Option<ClientType> {
  let parsed = ClientType::from_discriminant(kind);
  if parsed.is_none() {
    v.push(
      "Type",
      format!("'Type' must be in range [0, {}). You entered {kind}.", ClientType::count()),
    );
  }
  parsed
}

fn check_tin(v: &mut Violations, tin: &str, kind: ClientType) {
  let expected = kind.tin_length();
  if tin.len() != expected || !tin.bytes().all(|b| b.is_ascii_digit()) {
    v.push("TIN", format!("'TIN' must consist of exactly {expected} digits."));
  }
}

pub fn create_client(cmd: &CreateClient) -> Result<()> {
  let mut v = Violations::default();

  if v.required("Name", &cmd.name) {
    v.max_len("Name", &cmd.name, MAX_CLIENT_NAME);
  }
  let kind = match cmd.kind {
    Some(k) => check_type(&mut v, k),
    None => {
      v.push("Type", "'Type' must not be empty.");
      None
    }
  };
  if let Some(kind) = kind {
    check_tin(&mut v, &cmd.tin, kind);
  }

  v.finish()
}

/// Rules for the supplied fields of a client update, before merging.
pub fn update_client(cmd: &UpdateClient) -> Result<()> {
  let mut v = Violations::default();
  if let Some(name) = &cmd.name {
    v.max_len("Name", name, MAX_CLIENT_NAME);
  }
  if let Some(k) = cmd.kind {
    check_type(&mut v, k);
  }
  v.finish()
}

/// Rules for a client record after an update has been merged into it.
pub fn client_record(name: &str, kind: ClientType, tin: &str) -> Result<()> {
  let mut v = Violations::default();
  if v.required("Name", name) {
    v.max_len("Name", name, MAX_CLIENT_NAME);
  }
  check_tin(&mut v, tin, kind);
  v.finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::Patch;

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 3, 28).unwrap() }

  fn person() -> CreatePerson {
    CreatePerson {
      name:       "Ivan".into(),
      surname:    "Ivanov".into(),
      patronymic: Some("Petrovich".into()),
      birthday:   NaiveDate::from_ymd_opt(1990, 1, 1),
      address:    None,
    }
  }

  fn client(kind: i64, tin: &str) -> CreateClient {
    CreateClient { name: "Roga i Kopyta".into(), kind: Some(kind), tin: tin.into(), founders: vec![] }
  }

  fn properties(err: Error) -> Vec<String> {
    match err {
      Error::Validation(errs) => errs.into_iter().map(|e| e.property).collect(),
      other => panic!("expected validation error, got {other:?}"),
    }
  }

  #[test]
  fn valid_person_passes() {
    assert!(create_person(&person(), today()).is_ok());
  }

  #[test]
  fn birthday_must_be_strictly_in_the_past() {
    let mut p = person();
    p.birthday = Some(today());
    assert_eq!(properties(create_person(&p, today()).unwrap_err()), vec!["Birthday"]);

    p.birthday = today().succ_opt();
    assert_eq!(properties(create_person(&p, today()).unwrap_err()), vec!["Birthday"]);

    p.birthday = today().pred_opt();
    assert!(create_person(&p, today()).is_ok());
  }

  #[test]
  fn all_person_violations_reported_together() {
    let p = CreatePerson {
      name:       "x".repeat(31),
      surname:    String::new(),
      patronymic: Some("y".repeat(51)),
      birthday:   None,
      address:    None,
    };
    assert_eq!(
      properties(create_person(&p, today()).unwrap_err()),
      vec!["Name", "Surname", "Patronymic", "Birthday"]
    );
  }

  #[test]
  fn name_length_counts_characters_not_bytes() {
    let mut p = person();
    p.name = "Я".repeat(30);
    assert!(create_person(&p, today()).is_ok());
  }

  #[test]
  fn update_checks_only_supplied_fields() {
    let cmd = UpdatePerson { id: 1, ..Default::default() };
    assert!(update_person(&cmd, today()).is_ok());

    let cmd = UpdatePerson {
      id: 1,
      patronymic: Patch::Value("z".repeat(51)),
      birthday: Some(today()),
      ..Default::default()
    };
    assert_eq!(properties(update_person(&cmd, today()).unwrap_err()), vec!["Patronymic", "Birthday"]);
  }

  #[test]
  fn founder_requires_person() {
    assert!(create_founder(&CreateFounder { person_id: 0, clients: vec![] }).is_err());
    assert!(create_founder(&CreateFounder { person_id: 7, clients: vec![] }).is_ok());
    assert!(update_founder(&UpdateFounder { id: 1, person_id: Some(0), clients: vec![] }).is_err());
    assert!(update_founder(&UpdateFounder { id: 1, person_id: None, clients: vec![] }).is_ok());
  }

  #[test]
  fn legal_entity_tin_is_ten_digits() {
    assert_eq!(properties(create_client(&client(1, "123456789")).unwrap_err()), vec!["TIN"]);
    assert!(create_client(&client(1, "1234567890")).is_ok());
  }

  #[test]
  fn entrepreneur_tin_is_twelve_digits() {
    assert!(create_client(&client(0, "123456789012")).is_ok());
    assert_eq!(properties(create_client(&client(0, "1234567890")).unwrap_err()), vec!["TIN"]);
  }

  #[test]
  fn leading_zeros_count_towards_tin_length() {
    assert!(create_client(&client(1, "0012345678")).is_ok());
  }

  #[test]
  fn tin_must_be_digits() {
    assert!(create_client(&client(1, "12345abcde")).is_err());
  }

  #[test]
  fn out_of_range_type_skips_tin_rule() {
    assert_eq!(properties(create_client(&client(2, "1")).unwrap_err()), vec!["Type"]);
    let missing = CreateClient { kind: None, ..client(0, "1") };
    assert_eq!(properties(create_client(&missing).unwrap_err()), vec!["Type"]);
  }

  #[test]
  fn entrepreneur_discriminant_zero_is_a_present_type() {
    assert!(create_client(&client(0, "000000000001")).is_ok());
  }

  #[test]
  fn expected_length_is_pure() {
    assert_eq!(expected_tin_length(0), Some(12));
    assert_eq!(expected_tin_length(1), Some(10));
    assert_eq!(expected_tin_length(5), None);
  }

  #[test]
  fn merged_record_rechecked() {
    assert!(client_record("Name", ClientType::LegalEntity, "1234567890").is_ok());
    assert_eq!(
      properties(client_record("Name", ClientType::IndividualEntrepreneur, "1234567890").unwrap_err()),
      vec!["TIN"]
    );
  }
}
