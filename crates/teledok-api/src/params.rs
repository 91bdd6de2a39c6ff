//! Path and query parameter shapes shared by the resource routers.
//!
//! Path params are read into structs so the `{version}` capture of the
//! versioned routes is ignored.

use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct IdPath {
  pub id: i64,
}

/// `/{R}/{skip}/{take}`. The first segment shares its router node with
/// `/{R}/{id}`, so it carries the same name.
#[derive(Debug, Deserialize)]
pub struct RangePath {
  #[serde(rename = "id")]
  pub skip: u32,
  pub take: u32,
}

/// `DELETE /{R}?id=X`
#[derive(Debug, Deserialize)]
pub struct IdQuery {
  pub id: Option<i64>,
}

impl IdQuery {
  pub fn required(self) -> Result<i64, ApiError> {
    self.id.ok_or_else(|| ApiError::BadRequest("query parameter `id` is required".into()))
  }
}

#[derive(Debug, Deserialize)]
pub struct LinkPath {
  pub id:         i64,
  pub founder_id: i64,
}
