//! Read-side projections: a brief shape for lists and a detail shape for a
//! single record. Dates are pre-rendered display strings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefPerson {
  pub id:        i64,
  pub full_name: String,
  pub birthday:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsPerson {
  pub id:         i64,
  pub name:       String,
  pub surname:    String,
  pub patronymic: Option<String>,
  pub full_name:  String,
  pub short_name: String,
  pub birthday:   String,
  pub address:    Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefFounder {
  pub id:       i64,
  /// Full name of the linked person.
  pub name:     String,
  pub birthday: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsFounder {
  pub id:          i64,
  pub person_id:   i64,
  pub full_name:   String,
  pub short_name:  String,
  pub birthday:    String,
  pub address:     Option<String>,
  pub added_date:  String,
  pub update_date: String,
  /// `"Name (id = X)"` for every associated client.
  pub clients:     Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BriefClient {
  pub id:   i64,
  pub name: String,
  /// Localized client type.
  #[serde(rename = "type")]
  pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsClient {
  pub id:          i64,
  pub name:        String,
  #[serde(rename = "type")]
  pub kind:        String,
  pub tin:         String,
  pub added_date:  String,
  pub update_date: String,
  /// `"FullName (id = X)"` for every associated founder.
  pub founders:    Vec<String>,
}
