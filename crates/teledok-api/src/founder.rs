//! Handlers for `/Founder` endpoints.
//!
//! | Method   | Path | Versions |
//! |----------|------|----------|
//! | `GET`    | `/Founder` | 1, 2 |
//! | `GET`    | `/Founder/{skip}/{take}` | 1, 2 |
//! | `GET`    | `/Founder/{id}` | 1, 2 |
//! | `POST`   | `/Founder` | 1; returns the new id |
//! | `PUT`    | `/Founder` | 1; `clients` are added, never removed |
//! | `DELETE` | `/Founder?id=X`, `/Founder/{id}` | 1 |

use std::sync::Arc;

use axum::{
  Router,
  extract::{Query, State},
  http::StatusCode,
  routing::get,
};
use teledok_core::{
  command::{CreateFounder, UpdateFounder},
  store::RegistryStore,
  view::{BriefFounder, DetailsFounder},
};

use crate::{
  error::ApiError,
  extract::{Json, Path},
  params::{IdPath, IdQuery, RangePath},
  version::{ApiVersion, Operation, Resource},
};

pub fn routes<S: RegistryStore + 'static>() -> Router<Arc<S>> {
  Router::new()
    .route(
      "/Founder",
      get(list::<S>).post(create::<S>).put(update::<S>).delete(delete_by_query::<S>),
    )
    .route("/Founder/{id}", get(details::<S>).delete(delete::<S>))
    .route("/Founder/{id}/{take}", get(range::<S>))
}

/// `GET /Founder`
pub async fn list<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<BriefFounder>>, ApiError> {
  version.require(Resource::Founder, Operation::List)?;
  let founders = store.list_founders().await.map_err(ApiError::from_store)?;
  Ok(Json(founders))
}

/// `GET /Founder/{skip}/{take}`
pub async fn range<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(RangePath { skip, take }): Path<RangePath>,
) -> Result<Json<Vec<BriefFounder>>, ApiError> {
  version.require(Resource::Founder, Operation::Range)?;
  let founders = store.range_founders(skip, take).await.map_err(ApiError::from_store)?;
  Ok(Json(founders))
}

/// `GET /Founder/{id}`
pub async fn details<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Json<DetailsFounder>, ApiError> {
  version.require(Resource::Founder, Operation::Details)?;
  let founder = store.founder_details(id).await.map_err(ApiError::from_store)?;
  Ok(Json(founder))
}

/// `POST /Founder`: returns the id of the new founder.
pub async fn create<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<CreateFounder>,
) -> Result<Json<i64>, ApiError> {
  version.require(Resource::Founder, Operation::Create)?;
  let person_id = cmd.person_id;
  let id = store.create_founder(cmd).await.map_err(ApiError::from_store)?;
  tracing::info!(id, person_id, "founder created");
  Ok(Json(id))
}

/// `PUT /Founder`
pub async fn update<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<UpdateFounder>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Founder, Operation::Update)?;
  store.update_founder(cmd).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::OK)
}

/// `DELETE /Founder?id=X`
pub async fn delete_by_query<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Founder, Operation::Delete)?;
  remove(&*store, query.required()?).await
}

/// `DELETE /Founder/{id}`
pub async fn delete<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Founder, Operation::Delete)?;
  remove(&*store, id).await
}

async fn remove<S: RegistryStore>(store: &S, id: i64) -> Result<StatusCode, ApiError> {
  store.delete_founder(id).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "founder deleted");
  Ok(StatusCode::OK)
}
