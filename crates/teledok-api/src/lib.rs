//! JSON REST API for the Teledok registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`teledok_core::store::RegistryStore`]. Every resource is reachable both
//! under `/api/{version}/...` and under `/api/...`, where the version comes
//! from the query string, a header or the media type (see [`version`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = teledok_api::api_router(Arc::new(store));
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod founder;
pub mod params;
pub mod person;
pub mod version;

use std::sync::Arc;

use axum::{
  Router,
  http::HeaderValue,
  middleware,
  response::Response,
};
use teledok_core::store::RegistryStore;

pub use error::ApiError;
pub use version::ApiVersion;

pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RegistryStore + 'static,
{
  let resources = Router::new()
    .merge(person::routes::<S>())
    .merge(founder::routes::<S>())
    .merge(client::routes::<S>());

  Router::new()
    .nest("/api/{version}", resources.clone())
    .nest("/api", resources)
    .layer(middleware::map_response(advertise_versions))
    .with_state(store)
}

async fn advertise_versions(mut res: Response) -> Response {
  res
    .headers_mut()
    .insert(SUPPORTED_VERSIONS_HEADER, HeaderValue::from_static(version::SUPPORTED_VERSIONS));
  res
}
