//! Handlers for `/Client` endpoints.
//!
//! | Method   | Path | Versions |
//! |----------|------|----------|
//! | `GET`    | `/Client` | 1, 2 |
//! | `GET`    | `/Client/{skip}/{take}` | 1, 2 |
//! | `GET`    | `/Client/{id}` | 1, 2, 3 |
//! | `POST`   | `/Client` | 1, 3; returns the new id |
//! | `PUT`    | `/Client` | 1, 3; `founders` are added, never removed |
//! | `DELETE` | `/Client?id=X`, `/Client/{id}` | 1, 3 |
//! | `DELETE` | `/Client/{id}/Founder/{founder_id}` | 1; removes one association |

use std::sync::Arc;

use axum::{
  Router,
  extract::{Query, State},
  http::StatusCode,
  routing::{delete as delete_route, get},
};
use teledok_core::{
  command::{CreateClient, UpdateClient},
  store::RegistryStore,
  view::{BriefClient, DetailsClient},
};

use crate::{
  error::ApiError,
  extract::{Json, Path},
  params::{IdPath, IdQuery, LinkPath, RangePath},
  version::{ApiVersion, Operation, Resource},
};

pub fn routes<S: RegistryStore + 'static>() -> Router<Arc<S>> {
  Router::new()
    .route(
      "/Client",
      get(list::<S>).post(create::<S>).put(update::<S>).delete(delete_by_query::<S>),
    )
    .route("/Client/{id}", get(details::<S>).delete(delete::<S>))
    .route("/Client/{id}/{take}", get(range::<S>))
    .route("/Client/{id}/Founder/{founder_id}", delete_route(unlink::<S>))
}

/// `GET /Client`
pub async fn list<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<BriefClient>>, ApiError> {
  version.require(Resource::Client, Operation::List)?;
  let clients = store.list_clients().await.map_err(ApiError::from_store)?;
  Ok(Json(clients))
}

/// `GET /Client/{skip}/{take}`
pub async fn range<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(RangePath { skip, take }): Path<RangePath>,
) -> Result<Json<Vec<BriefClient>>, ApiError> {
  version.require(Resource::Client, Operation::Range)?;
  let clients = store.range_clients(skip, take).await.map_err(ApiError::from_store)?;
  Ok(Json(clients))
}

/// `GET /Client/{id}`
pub async fn details<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Json<DetailsClient>, ApiError> {
  version.require(Resource::Client, Operation::Details)?;
  let client = store.client_details(id).await.map_err(ApiError::from_store)?;
  Ok(Json(client))
}

/// `POST /Client`: returns the id of the new client.
pub async fn create<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<CreateClient>,
) -> Result<Json<i64>, ApiError> {
  version.require(Resource::Client, Operation::Create)?;
  let id = store.create_client(cmd).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "client created");
  Ok(Json(id))
}

/// `PUT /Client`
pub async fn update<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<UpdateClient>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Client, Operation::Update)?;
  store.update_client(cmd).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::OK)
}

/// `DELETE /Client?id=X`
pub async fn delete_by_query<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Client, Operation::Delete)?;
  remove(&*store, query.required()?).await
}

/// `DELETE /Client/{id}`
pub async fn delete<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Client, Operation::Delete)?;
  remove(&*store, id).await
}

/// `DELETE /Client/{id}/Founder/{founder_id}`
pub async fn unlink<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(LinkPath { id, founder_id }): Path<LinkPath>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Client, Operation::Unlink)?;
  store.unlink(id, founder_id).await.map_err(ApiError::from_store)?;
  tracing::info!(client_id = id, founder_id, "founder unlinked");
  Ok(StatusCode::OK)
}

async fn remove<S: RegistryStore>(store: &S, id: i64) -> Result<StatusCode, ApiError> {
  store.delete_client(id).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "client deleted");
  Ok(StatusCode::OK)
}
