//! The `RegistryStore` trait.
//!
//! Implemented by storage backends (e.g. `teledok-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on a concrete backend.
//!
//! Every write runs as one unit of work: either all of its effects are
//! persisted or none are.

use std::future::Future;

use crate::{
  Error,
  command::{CreateClient, CreateFounder, CreatePerson, UpdateClient, UpdateFounder, UpdatePerson},
  view::{BriefClient, BriefFounder, BriefPerson, DetailsClient, DetailsFounder, DetailsPerson},
};

/// Backend errors that may wrap a domain [`Error`].
pub trait StoreError: std::error::Error + Send + Sync + Sized + 'static {
  /// Return the domain failure this error carries, or the error unchanged if
  /// it is a storage-level failure.
  fn into_domain(self) -> Result<Error, Self>;
}

/// Abstraction over a registry store backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait RegistryStore: Send + Sync {
  type Error: StoreError;

  // ── People ────────────────────────────────────────────────────────────

  /// Every person, ordered by id.
  fn list_people(&self) -> impl Future<Output = Result<Vec<BriefPerson>, Self::Error>> + Send + '_;

  /// A page of [`list_people`](Self::list_people).
  fn range_people(
    &self,
    skip: u32,
    take: u32,
  ) -> impl Future<Output = Result<Vec<BriefPerson>, Self::Error>> + Send + '_;

  fn person_details(&self, id: i64) -> impl Future<Output = Result<DetailsPerson, Self::Error>> + Send + '_;

  /// Validate and insert; returns the new id.
  fn create_person(&self, cmd: CreatePerson) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn update_person(&self, cmd: UpdatePerson) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fails with a storage error while a founder still references the person.
  fn delete_person(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Founders ──────────────────────────────────────────────────────────

  fn list_founders(&self) -> impl Future<Output = Result<Vec<BriefFounder>, Self::Error>> + Send + '_;

  fn range_founders(
    &self,
    skip: u32,
    take: u32,
  ) -> impl Future<Output = Result<Vec<BriefFounder>, Self::Error>> + Send + '_;

  fn founder_details(&self, id: i64) -> impl Future<Output = Result<DetailsFounder, Self::Error>> + Send + '_;

  /// Unknown client ids are skipped; the person must exist.
  fn create_founder(&self, cmd: CreateFounder) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Client ids are merged into the existing set; nothing is removed.
  fn update_founder(&self, cmd: UpdateFounder) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_founder(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Clients ───────────────────────────────────────────────────────────

  fn list_clients(&self) -> impl Future<Output = Result<Vec<BriefClient>, Self::Error>> + Send + '_;

  fn range_clients(
    &self,
    skip: u32,
    take: u32,
  ) -> impl Future<Output = Result<Vec<BriefClient>, Self::Error>> + Send + '_;

  fn client_details(&self, id: i64) -> impl Future<Output = Result<DetailsClient, Self::Error>> + Send + '_;

  /// Unknown founder ids are skipped. An individual entrepreneur with more
  /// than one resolved founder is rejected with [`Error::LimitExceeded`].
  fn create_client(&self, cmd: CreateClient) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Founder ids are merged into the existing set; nothing is removed.
  fn update_client(&self, cmd: UpdateClient) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_client(&self, id: i64) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Associations ──────────────────────────────────────────────────────

  /// Remove a single client–founder link. Removing a link that does not
  /// exist is a no-op, but both records must exist.
  fn unlink(
    &self,
    client_id: i64,
    founder_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
