//! Persisted records: people, founders and clients.
//!
//! Founders reference exactly one person; clients and founders are linked
//! many-to-many. Associations are held as id sets so the merge rules in the
//! store can be expressed as plain set operations.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use strum::{EnumCount, FromRepr};

use crate::{
  Error, Result,
  command::{UpdateClient, UpdatePerson},
  naming, validate,
};

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  pub id:         i64,
  pub name:       String,
  pub surname:    String,
  pub patronymic: Option<String>,
  pub birthday:   NaiveDate,
  pub address:    Option<String>,
}

impl Person {
  pub fn full_name(&self) -> String {
    naming::full_name(&self.surname, &self.name, self.patronymic.as_deref())
  }

  pub fn short_name(&self) -> String {
    naming::short_name(&self.surname, &self.name, self.patronymic.as_deref())
  }

  /// Merge a partial update. Blank `name`/`surname` keep the stored value;
  /// `patronymic` and `address` follow [`Patch`](crate::command::Patch)
  /// semantics.
  pub fn apply_update(&mut self, cmd: UpdatePerson, today: NaiveDate) -> Result<()> {
    validate::update_person(&cmd, today)?;

    if let Some(name) = cmd.name.filter(|n| !n.trim().is_empty()) {
      self.name = name;
    }
    if let Some(surname) = cmd.surname.filter(|s| !s.trim().is_empty()) {
      self.surname = surname;
    }
    cmd.patronymic.apply(&mut self.patronymic);
    if let Some(birthday) = cmd.birthday {
      self.birthday = birthday;
    }
    cmd.address.apply(&mut self.address);
    Ok(())
  }
}

// ─── Founder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Founder {
  pub id:          i64,
  pub person_id:   i64,
  pub added_date:  NaiveDate,
  pub update_date: NaiveDate,
  pub clients:     BTreeSet<i64>,
}

impl Founder {
  /// Re-link the person if one is given and add `clients` to the existing
  /// set. The caller resolves ids against the store first.
  pub fn apply_update(
    &mut self,
    person_id: Option<i64>,
    clients: impl IntoIterator<Item = i64>,
    today: NaiveDate,
  ) {
    if let Some(person_id) = person_id {
      self.person_id = person_id;
    }
    merge_union(&mut self.clients, clients);
    self.update_date = today;
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Legal form of a client. The discriminants are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, FromRepr)]
#[repr(u8)]
pub enum ClientType {
  IndividualEntrepreneur = 0,
  LegalEntity = 1,
}

impl ClientType {
  /// Look up a type by its wire discriminant.
  pub fn from_discriminant(value: i64) -> Option<Self> {
    u8::try_from(value).ok().and_then(Self::from_repr)
  }

  pub fn discriminant(self) -> i64 { self as u8 as i64 }

  /// Number of digits a TIN of this type must have.
  pub fn tin_length(self) -> usize {
    match self {
      Self::IndividualEntrepreneur => 12,
      Self::LegalEntity => 10,
    }
  }

  /// Whether the type admits more than one founder.
  pub fn allows_many_founders(self) -> bool { self == Self::LegalEntity }

  /// Localized display name.
  pub fn description(self) -> &'static str {
    match self {
      Self::IndividualEntrepreneur => "Индивидуальный предприниматель",
      Self::LegalEntity => "Юридическое лицо",
    }
  }

  /// Exclusive upper bound of valid discriminants.
  pub const fn count() -> i64 { Self::COUNT as i64 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
  pub id:          i64,
  pub name:        String,
  pub kind:        ClientType,
  /// Fixed-length digit string; leading zeros are significant.
  pub tin:         String,
  pub added_date:  NaiveDate,
  pub update_date: NaiveDate,
  pub founders:    BTreeSet<i64>,
}

impl Client {
  /// Merge an update, then re-check the merged record: name and TIN must fit
  /// the (possibly new) type, and the founder limit still holds.
  ///
  /// `founders` are the command's founder ids already resolved against the
  /// store; they are added to the existing set.
  pub fn apply_update(
    &mut self,
    cmd: UpdateClient,
    founders: impl IntoIterator<Item = i64>,
    today: NaiveDate,
  ) -> Result<()> {
    validate::update_client(&cmd)?;

    if let Some(name) = cmd.name.filter(|n| !n.is_empty()) {
      self.name = name;
    }
    if let Some(kind) = cmd.kind {
      self.kind = ClientType::from_discriminant(kind).ok_or(Error::UnknownClientType(kind))?;
    }
    if let Some(tin) = cmd.tin.filter(|t| !t.is_empty()) {
      self.tin = tin;
    }
    merge_union(&mut self.founders, founders);

    validate::client_record(&self.name, self.kind, &self.tin)?;
    self.check_founder_limit()?;
    self.update_date = today;
    Ok(())
  }

  /// Check the founder cardinality invariant for individual entrepreneurs.
  pub fn check_founder_limit(&self) -> Result<()> {
    check_founder_limit(self.kind, self.founders.len())
  }
}

pub fn check_founder_limit(kind: ClientType, founders: usize) -> Result<()> {
  if !kind.allows_many_founders() && founders > 1 {
    return Err(Error::LimitExceeded);
  }
  Ok(())
}

/// Add every id in `incoming` to `current`; never removes. Returns how many
/// ids were new.
pub fn merge_union(current: &mut BTreeSet<i64>, incoming: impl IntoIterator<Item = i64>) -> usize {
  incoming.into_iter().filter(|id| current.insert(*id)).count()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::command::Patch;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn ivanov() -> Person {
    Person {
      id:         1,
      name:       "Ivan".into(),
      surname:    "Ivanov".into(),
      patronymic: Some("Petrovich".into()),
      birthday:   date(1990, 1, 1),
      address:    Some("Moscow".into()),
    }
  }

  fn legal_entity(founders: &[i64]) -> Client {
    Client {
      id:          10,
      name:        "Roga i Kopyta".into(),
      kind:        ClientType::LegalEntity,
      tin:         "1234567890".into(),
      added_date:  date(2025, 1, 1),
      update_date: date(2025, 1, 1),
      founders:    founders.iter().copied().collect(),
    }
  }

  #[test]
  fn client_type_discriminants_round_trip() {
    assert_eq!(ClientType::from_discriminant(0), Some(ClientType::IndividualEntrepreneur));
    assert_eq!(ClientType::from_discriminant(1), Some(ClientType::LegalEntity));
    assert_eq!(ClientType::from_discriminant(2), None);
    assert_eq!(ClientType::from_discriminant(-1), None);
    assert_eq!(ClientType::count(), 2);
    assert_eq!(ClientType::LegalEntity.discriminant(), 1);
  }

  #[test]
  fn tin_lengths_by_type() {
    assert_eq!(ClientType::IndividualEntrepreneur.tin_length(), 12);
    assert_eq!(ClientType::LegalEntity.tin_length(), 10);
  }

  #[test]
  fn entrepreneur_limited_to_one_founder() {
    assert!(check_founder_limit(ClientType::IndividualEntrepreneur, 1).is_ok());
    assert!(matches!(
      check_founder_limit(ClientType::IndividualEntrepreneur, 2),
      Err(crate::Error::LimitExceeded)
    ));
    assert!(check_founder_limit(ClientType::LegalEntity, 5).is_ok());
  }

  #[test]
  fn union_merge_only_grows() {
    let mut set: BTreeSet<i64> = [1, 2].into_iter().collect();
    let added = merge_union(&mut set, [1, 2, 3]);
    assert_eq!(added, 1);
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
  }

  #[test]
  fn person_update_leaves_absent_fields() {
    let mut p = ivanov();
    p.apply_update(UpdatePerson { id: 1, name: Some(String::new()), ..Default::default() }, date(2025, 3, 28))
      .unwrap();
    assert_eq!(p, ivanov());
  }

  #[test]
  fn person_update_keeps_names_on_blank_strings() {
    let mut p = ivanov();
    let cmd = UpdatePerson {
      id: 1,
      name: Some("   ".into()),
      surname: Some("\t ".into()),
      ..Default::default()
    };
    p.apply_update(cmd, date(2025, 3, 28)).unwrap();
    assert_eq!(p.name, "Ivan");
    assert_eq!(p.surname, "Ivanov");
    assert_eq!(p, ivanov());
  }

  #[test]
  fn person_update_clears_and_sets() {
    let mut p = ivanov();
    let cmd = UpdatePerson {
      id:         1,
      surname:    Some("Petrov".into()),
      patronymic: Patch::Null,
      address:    Patch::Value("Kazan".into()),
      birthday:   Some(date(1991, 2, 2)),
      ..Default::default()
    };
    p.apply_update(cmd, date(2025, 3, 28)).unwrap();
    assert_eq!(p.surname, "Petrov");
    assert_eq!(p.name, "Ivan");
    assert_eq!(p.patronymic, None);
    assert_eq!(p.address.as_deref(), Some("Kazan"));
    assert_eq!(p.birthday, date(1991, 2, 2));
    assert_eq!(p.full_name(), "Petrov Ivan");
  }

  #[test]
  fn founder_update_is_union_and_touches_date() {
    let mut f = Founder {
      id:          1,
      person_id:   1,
      added_date:  date(2025, 1, 1),
      update_date: date(2025, 1, 1),
      clients:     [1, 2].into_iter().collect(),
    };
    f.apply_update(None, [1, 2, 3], date(2025, 2, 2));
    assert_eq!(f.clients.len(), 3);
    assert_eq!(f.person_id, 1);
    assert_eq!(f.update_date, date(2025, 2, 2));
    assert_eq!(f.added_date, date(2025, 1, 1));
  }

  #[test]
  fn client_update_rechecks_tin_against_new_type() {
    let mut c = legal_entity(&[]);
    let cmd = UpdateClient { id: 10, kind: Some(0), ..Default::default() };
    assert!(matches!(c.apply_update(cmd, [], date(2025, 2, 2)), Err(Error::Validation(_))));

    let mut c = legal_entity(&[]);
    let cmd = UpdateClient { id: 10, kind: Some(0), tin: Some("123456789012".into()), ..Default::default() };
    c.apply_update(cmd, [], date(2025, 2, 2)).unwrap();
    assert_eq!(c.kind, ClientType::IndividualEntrepreneur);
    assert_eq!(c.update_date, date(2025, 2, 2));
  }

  #[test]
  fn client_update_enforces_entrepreneur_limit() {
    let mut c = legal_entity(&[1, 2]);
    let cmd = UpdateClient {
      id: 10,
      kind: Some(0),
      tin: Some("123456789012".into()),
      ..Default::default()
    };
    assert!(matches!(c.apply_update(cmd, [], date(2025, 2, 2)), Err(Error::LimitExceeded)));
  }

  #[test]
  fn client_update_keeps_values_on_empty_strings() {
    let mut c = legal_entity(&[1]);
    let cmd = UpdateClient {
      id: 10,
      name: Some(String::new()),
      tin: Some(String::new()),
      founders: vec![1, 4],
      ..Default::default()
    };
    c.apply_update(cmd, [1, 4], date(2025, 2, 2)).unwrap();
    assert_eq!(c.name, "Roga i Kopyta");
    assert_eq!(c.tin, "1234567890");
    assert_eq!(c.founders.iter().copied().collect::<Vec<_>>(), vec![1, 4]);
  }
}
