//! Error types for `teledok-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three record kinds the registry stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Entity {
  Person,
  Founder,
  Client,
}

/// A single violated validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub property: String,
  pub message:  String,
}

impl FieldError {
  pub fn new(property: &str, message: impl Into<String>) -> Self {
    Self { property: property.to_owned(), message: message.into() }
  }
}

impl fmt::Display for FieldError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.property, self.message)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// One entry per violated rule; the whole command is rejected.
  #[error("validation failed: {} rule(s) violated", .0.len())]
  Validation(Vec<FieldError>),

  #[error("entity \"{entity}\" ({id}) not found")]
  NotFound { entity: Entity, id: i64 },

  #[error("the founder of an individual entrepreneur can be only 1 person")]
  LimitExceeded,

  #[error("unknown client type discriminant: {0}")]
  UnknownClientType(i64),
}

impl Error {
  pub fn not_found(entity: Entity, id: i64) -> Self { Self::NotFound { entity, id } }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
