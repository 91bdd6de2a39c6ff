//! Write-side command shapes accepted by the store and the HTTP API.
//!
//! Required fields of create commands default to empty values on the wire so
//! that a missing field is reported by validation rather than by the JSON
//! decoder.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Patch ───────────────────────────────────────────────────────────────────

/// A three-state optional field for partial updates.
///
/// Absent from the body leaves the stored value alone, `null` clears it, and
/// a value replaces it. Fields of this type need `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
  Absent,
  Null,
  Value(T),
}

impl<T> Default for Patch<T> {
  fn default() -> Self { Self::Absent }
}

impl<T> Patch<T> {
  pub fn is_absent(&self) -> bool { matches!(self, Self::Absent) }

  /// Apply to a stored optional value.
  pub fn apply(self, target: &mut Option<T>) {
    match self {
      Self::Absent => {}
      Self::Null => *target = None,
      Self::Value(v) => *target = Some(v),
    }
  }

  pub fn as_value(&self) -> Option<&T> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Ok(match Option::<T>::deserialize(deserializer)? {
      Some(v) => Self::Value(v),
      None => Self::Null,
    })
  }
}

impl<T: Serialize> Serialize for Patch<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Value(v) => serializer.serialize_some(v),
      _ => serializer.serialize_none(),
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePerson {
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub surname:    String,
  #[serde(default, alias = "patronomic")]
  pub patronymic: Option<String>,
  #[serde(default)]
  pub birthday:   Option<NaiveDate>,
  #[serde(default)]
  pub address:    Option<String>,
}

/// Partial update of a person. `name`/`surname` are only applied when
/// non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePerson {
  pub id:         i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub surname:    Option<String>,
  #[serde(default, alias = "patronomic", skip_serializing_if = "Patch::is_absent")]
  pub patronymic: Patch<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birthday:   Option<NaiveDate>,
  #[serde(default, skip_serializing_if = "Patch::is_absent")]
  pub address:    Patch<String>,
}

// ─── Founder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFounder {
  #[serde(default)]
  pub person_id: i64,
  /// Client ids to associate; unknown ids are skipped.
  #[serde(default)]
  pub clients:   Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFounder {
  pub id:        i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub person_id: Option<i64>,
  /// Client ids to add to the existing set.
  #[serde(default)]
  pub clients:   Vec<i64>,
}

// ─── Client ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClient {
  #[serde(default)]
  pub name:     String,
  /// Raw [`ClientType`](crate::entity::ClientType) discriminant.
  #[serde(default, rename = "type")]
  pub kind:     Option<i64>,
  #[serde(default, alias = "TIN")]
  pub tin:      String,
  /// Founder ids to associate; unknown ids are skipped.
  #[serde(default)]
  pub founders: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
  pub id:       i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:     Option<String>,
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind:     Option<i64>,
  #[serde(default, alias = "TIN", skip_serializing_if = "Option::is_none")]
  pub tin:      Option<String>,
  /// Founder ids to add to the existing set.
  #[serde(default)]
  pub founders: Vec<i64>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn patch_distinguishes_absent_null_and_value() {
    let absent: UpdatePerson = serde_json::from_value(json!({ "id": 1 })).unwrap();
    assert_eq!(absent.patronymic, Patch::Absent);

    let null: UpdatePerson =
      serde_json::from_value(json!({ "id": 1, "patronymic": null })).unwrap();
    assert_eq!(null.patronymic, Patch::Null);

    let value: UpdatePerson =
      serde_json::from_value(json!({ "id": 1, "address": "Moscow" })).unwrap();
    assert_eq!(value.address, Patch::Value("Moscow".to_owned()));
  }

  #[test]
  fn patch_apply() {
    let mut stored = Some("old".to_owned());
    Patch::Absent.apply(&mut stored);
    assert_eq!(stored.as_deref(), Some("old"));
    Patch::Value("new".to_owned()).apply(&mut stored);
    assert_eq!(stored.as_deref(), Some("new"));
    Patch::Null.apply(&mut stored);
    assert_eq!(stored, None);
  }

  #[test]
  fn absent_patch_is_not_serialized() {
    let cmd = UpdatePerson { id: 3, patronymic: Patch::Null, ..Default::default() };
    let v = serde_json::to_value(&cmd).unwrap();
    assert_eq!(v, json!({ "id": 3, "patronymic": null }));
  }

  #[test]
  fn client_command_uses_type_key_and_tin_alias() {
    let cmd: CreateClient = serde_json::from_value(json!({
      "name": "Roga i Kopyta",
      "type": 1,
      "TIN": "0123456789",
      "founders": [1, 2]
    }))
    .unwrap();
    assert_eq!(cmd.kind, Some(1));
    assert_eq!(cmd.tin, "0123456789");
    assert_eq!(cmd.founders, vec![1, 2]);
  }

  #[test]
  fn legacy_patronymic_spelling_accepted() {
    let cmd: CreatePerson = serde_json::from_value(json!({
      "name": "Ivan",
      "surname": "Ivanov",
      "patronomic": "Petrovich",
      "birthday": "1990-01-01"
    }))
    .unwrap();
    assert_eq!(cmd.patronymic.as_deref(), Some("Petrovich"));
  }
}
