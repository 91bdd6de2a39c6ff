//! Handlers for `/Person` endpoints.
//!
//! | Method   | Path | Versions |
//! |----------|------|----------|
//! | `GET`    | `/Person` | 1, 2 |
//! | `GET`    | `/Person/{skip}/{take}` | 1, 2 |
//! | `GET`    | `/Person/{id}` | 1, 2, 3 |
//! | `POST`   | `/Person` | 1, 3; returns the new id |
//! | `PUT`    | `/Person` | 1, 3 |
//! | `DELETE` | `/Person?id=X`, `/Person/{id}` | 1, 3 |

use std::sync::Arc;

use axum::{
  Router,
  extract::{Query, State},
  http::StatusCode,
  routing::get,
};
use teledok_core::{
  command::{CreatePerson, UpdatePerson},
  store::RegistryStore,
  view::{BriefPerson, DetailsPerson},
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
      "/Person",
      get(list::<S>).post(create::<S>).put(update::<S>).delete(delete_by_query::<S>),
    )
    .route("/Person/{id}", get(details::<S>).delete(delete::<S>))
    .route("/Person/{id}/{take}", get(range::<S>))
}

/// `GET /Person`
pub async fn list<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<BriefPerson>>, ApiError> {
  version.require(Resource::Person, Operation::List)?;
  let people = store.list_people().await.map_err(ApiError::from_store)?;
  Ok(Json(people))
}

/// `GET /Person/{skip}/{take}`
pub async fn range<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(RangePath { skip, take }): Path<RangePath>,
) -> Result<Json<Vec<BriefPerson>>, ApiError> {
  version.require(Resource::Person, Operation::Range)?;
  let people = store.range_people(skip, take).await.map_err(ApiError::from_store)?;
  Ok(Json(people))
}

/// `GET /Person/{id}`
pub async fn details<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<Json<DetailsPerson>, ApiError> {
  version.require(Resource::Person, Operation::Details)?;
  let person = store.person_details(id).await.map_err(ApiError::from_store)?;
  Ok(Json(person))
}

/// `POST /Person`: returns the id of the new person.
pub async fn create<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<CreatePerson>,
) -> Result<Json<i64>, ApiError> {
  version.require(Resource::Person, Operation::Create)?;
  let id = store.create_person(cmd).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "person created");
  Ok(Json(id))
}

/// `PUT /Person`
pub async fn update<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Json(cmd): Json<UpdatePerson>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Person, Operation::Update)?;
  store.update_person(cmd).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::OK)
}

/// `DELETE /Person?id=X`
pub async fn delete_by_query<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Person, Operation::Delete)?;
  remove(&*store, query.required()?).await
}

/// `DELETE /Person/{id}`
pub async fn delete<S: RegistryStore>(
  version: ApiVersion,
  State(store): State<Arc<S>>,
  Path(IdPath { id }): Path<IdPath>,
) -> Result<StatusCode, ApiError> {
  version.require(Resource::Person, Operation::Delete)?;
  remove(&*store, id).await
}

async fn remove<S: RegistryStore>(store: &S, id: i64) -> Result<StatusCode, ApiError> {
  store.delete_person(id).await.map_err(ApiError::from_store)?;
  tracing::info!(id, "person deleted");
  Ok(StatusCode::OK)
}
