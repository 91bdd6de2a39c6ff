//! API version negotiation.
//!
//! The requested version is taken from the first of these that is present:
//!
//! 1. the `{version}` URL segment (`/api/v2/Person`),
//! 2. the `api-version` query parameter,
//! 3. the `api-version` request header,
//! 4. an `api-version` media-type parameter on `Content-Type` or `Accept`.
//!
//! A request that names none of them is served as version 1.0.

use std::{collections::HashMap, fmt};

use axum::{
  extract::{FromRequestParts, Query, RawPathParams},
  http::{
    HeaderMap,
    header::{ACCEPT, CONTENT_TYPE},
    request::Parts,
  },
};

use crate::error::ApiError;

pub const VERSION_PARAM: &str = "api-version";

/// Value of the `api-supported-versions` response header.
pub const SUPPORTED_VERSIONS: &str = "1.0, 2.0, 3.0";

/// The resource a request addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
  Person,
  Founder,
  Client,
}

/// An API operation, for the per-version capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  List,
  Range,
  Details,
  Create,
  Update,
  Delete,
  Unlink,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiVersion {
  #[default]
  V1,
  /// Read-only.
  V2,
  /// Single-record operations on people and clients; no listing, no
  /// founders.
  V3,
}

impl ApiVersion {
  /// Accepts `1`, `1.0`, `v1` and `v1.0` (and likewise for 2 and 3).
  pub fn parse(raw: &str) -> Option<Self> {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    match raw.strip_suffix(".0").unwrap_or(raw) {
      "1" => Some(Self::V1),
      "2" => Some(Self::V2),
      "3" => Some(Self::V3),
      _ => None,
    }
  }

  pub fn allows(self, resource: Resource, op: Operation) -> bool {
    use Operation::*;
    match self {
      Self::V1 => true,
      Self::V2 => matches!(op, List | Range | Details),
      Self::V3 => resource != Resource::Founder && matches!(op, Details | Create | Update | Delete),
    }
  }

  /// Operations a version does not offer do not exist for it.
  pub fn require(self, resource: Resource, op: Operation) -> Result<(), ApiError> {
    if self.allows(resource, op) {
      Ok(())
    } else {
      Err(ApiError::NotFound(format!(
        "{resource:?} {op:?} is not available in API version {self}"
      )))
    }
  }
}

impl fmt::Display for ApiVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::V1 => "1.0",
      Self::V2 => "2.0",
      Self::V3 => "3.0",
    };
    f.write_str(s)
  }
}

impl<S: Send + Sync> FromRequestParts<S> for ApiVersion {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    match requested(parts, state).await {
      Some(raw) => Self::parse(&raw).ok_or(ApiError::UnsupportedVersion(raw)),
      None => Ok(Self::default()),
    }
  }
}

async fn requested<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
  if let Ok(params) = RawPathParams::from_request_parts(parts, state).await {
    if let Some((_, v)) = params.iter().find(|(k, _)| *k == "version") {
      return Some(v.to_owned());
    }
  }

  if let Ok(Query(query)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
    if let Some(v) = query.get(VERSION_PARAM) {
      return Some(v.clone());
    }
  }

  if let Some(v) = parts.headers.get(VERSION_PARAM).and_then(|v| v.to_str().ok()) {
    return Some(v.to_owned());
  }

  media_type_param(&parts.headers)
}

/// `application/json; api-version=2.0`
fn media_type_param(headers: &HeaderMap) -> Option<String> {
  [CONTENT_TYPE, ACCEPT]
    .iter()
    .filter_map(|name| headers.get(name)?.to_str().ok())
    .flat_map(|value| value.split([',', ';']))
    .find_map(|param| {
      let (key, value) = param.split_once('=')?;
      (key.trim().eq_ignore_ascii_case(VERSION_PARAM)).then(|| value.trim().trim_matches('"').to_owned())
    })
}

#[cfg(test)]
mod tests {
  use axum::http::{HeaderValue, Request};

  use super::*;

  async fn resolve(req: Request<()>) -> Result<ApiVersion, ApiError> {
    let (mut parts, ()) = req.into_parts();
    ApiVersion::from_request_parts(&mut parts, &()).await
  }

  #[test]
  fn parse_accepts_common_spellings() {
    for raw in ["1", "1.0", "v1", "V1.0", " 1.0 "] {
      assert_eq!(ApiVersion::parse(raw), Some(ApiVersion::V1), "{raw}");
    }
    assert_eq!(ApiVersion::parse("v3"), Some(ApiVersion::V3));
    assert_eq!(ApiVersion::parse("4.0"), None);
    assert_eq!(ApiVersion::parse("1.1"), None);
    assert_eq!(ApiVersion::parse(""), None);
  }

  #[test]
  fn capabilities_per_version() {
    use Operation::*;
    use Resource::*;
    for resource in [Person, Founder, Client] {
      assert!([List, Range, Details, Create, Update, Delete, Unlink]
        .iter()
        .all(|op| ApiVersion::V1.allows(resource, *op)));
    }

    assert!(ApiVersion::V2.allows(Founder, Range));
    assert!(!ApiVersion::V2.allows(Person, Create));
    assert!(!ApiVersion::V2.allows(Client, Delete));

    assert!(ApiVersion::V3.allows(Person, Details));
    assert!(ApiVersion::V3.allows(Client, Update));
    assert!(!ApiVersion::V3.allows(Client, List));
    assert!(!ApiVersion::V3.allows(Client, Unlink));
  }

  #[test]
  fn v3_has_no_founders() {
    for op in [Operation::Details, Operation::Create, Operation::Update, Operation::Delete] {
      assert!(!ApiVersion::V3.allows(Resource::Founder, op), "{op:?}");
    }
    assert!(matches!(
      ApiVersion::V3.require(Resource::Founder, Operation::Create),
      Err(ApiError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn unspecified_defaults_to_v1() {
    let req = Request::builder().uri("/api/Person").body(()).unwrap();
    assert_eq!(resolve(req).await.unwrap(), ApiVersion::V1);
  }

  #[tokio::test]
  async fn query_beats_header() {
    let req = Request::builder()
      .uri("/api/Person?api-version=2.0")
      .header(VERSION_PARAM, "3.0")
      .body(())
      .unwrap();
    assert_eq!(resolve(req).await.unwrap(), ApiVersion::V2);
  }

  #[tokio::test]
  async fn header_then_media_type() {
    let req = Request::builder()
      .uri("/api/Person")
      .header(VERSION_PARAM, "3.0")
      .header(ACCEPT, "application/json; api-version=2.0")
      .body(())
      .unwrap();
    assert_eq!(resolve(req).await.unwrap(), ApiVersion::V3);

    let mut req = Request::builder().uri("/api/Person").body(()).unwrap();
    req
      .headers_mut()
      .insert(ACCEPT, HeaderValue::from_static("text/plain, application/json;api-version=2"));
    assert_eq!(resolve(req).await.unwrap(), ApiVersion::V2);
  }

  #[tokio::test]
  async fn unknown_version_is_rejected() {
    let req = Request::builder().uri("/api/Person?api-version=7").body(()).unwrap();
    assert!(matches!(resolve(req).await, Err(ApiError::UnsupportedVersion(v)) if v == "7"));
  }
}
