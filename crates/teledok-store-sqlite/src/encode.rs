//! Conversions between domain values and the plain representations stored
//! in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text; the client type as its integer
//! discriminant.

use chrono::NaiveDate;
use rusqlite::{Row, types::Type};
use teledok_core::entity::ClientType;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// Read a date column, reporting a malformed value as a conversion failure.
pub fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
  let raw: String = row.get(idx)?;
  decode_date(&raw)
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── ClientType ──────────────────────────────────────────────────────────────

pub fn encode_client_type(k: ClientType) -> i64 { k.discriminant() }

pub fn client_type_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<ClientType> {
  let raw: i64 = row.get(idx)?;
  ClientType::from_discriminant(raw).ok_or_else(|| {
    rusqlite::Error::FromSqlConversionFailure(
      idx,
      Type::Integer,
      Box::new(teledok_core::Error::UnknownClientType(raw)),
    )
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_round_trip() {
    let d = NaiveDate::from_ymd_opt(2001, 9, 3).unwrap();
    assert_eq!(encode_date(d), "2001-09-03");
    assert_eq!(decode_date("2001-09-03").unwrap(), d);
  }

  #[test]
  fn malformed_date_rejected() {
    assert!(decode_date("03.09.2001").is_err());
  }
}
