//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`].

use std::{path::Path, sync::Arc};

use teledok_core::{
  command::{CreateClient, CreateFounder, CreatePerson, UpdateClient, UpdateFounder, UpdatePerson},
  clock::{Clock, SystemClock},
  entity::{self, Client, ClientType},
  store::RegistryStore,
  validate,
  view::{BriefClient, BriefFounder, BriefPerson, DetailsClient, DetailsFounder, DetailsPerson},
};

use crate::{
  Error, Result,
  error::domain,
  query::{self, Page, Table},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A registry store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and clock are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<dyn Clock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, clock: Arc::new(SystemClock) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, clock: Arc::new(SystemClock) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the source of "today" used for validation and record dates.
  pub fn with_clock(mut self, clock: impl Clock) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Check existence, then delete. A foreign-key violation surfaces as a
  /// database error.
  async fn delete(
    &self,
    table: Table,
    load: fn(&rusqlite::Connection, i64) -> tokio_rusqlite::Result<()>,
    id: i64,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        load(&tx, id)?;
        query::delete_row(&tx, table, id)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    tracing::debug!(?table, id, "row deleted");
    Ok(())
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn list_people(&self) -> Result<Vec<BriefPerson>> {
    Ok(self.conn.call(|conn| Ok(query::people(conn, Page::ALL)?)).await?)
  }

  async fn range_people(&self, skip: u32, take: u32) -> Result<Vec<BriefPerson>> {
    let page = Page::new(skip, take);
    Ok(self.conn.call(move |conn| Ok(query::people(conn, page)?)).await?)
  }

  async fn person_details(&self, id: i64) -> Result<DetailsPerson> {
    let person = self.conn.call(move |conn| query::load_person(conn, id)).await?;
    Ok(query::person_details(person))
  }

  async fn create_person(&self, cmd: CreatePerson) -> Result<i64> {
    validate::create_person(&cmd, self.clock.today())?;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = query::insert_person(&tx, &cmd)?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, "person created");
    Ok(id)
  }

  async fn update_person(&self, cmd: UpdatePerson) -> Result<()> {
    let today = self.clock.today();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut person = query::load_person(&tx, cmd.id)?;
        person.apply_update(cmd, today).map_err(domain)?;
        query::save_person(&tx, &person)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_person(&self, id: i64) -> Result<()> {
    self
      .delete(Table::People, |conn, id| query::load_person(conn, id).map(drop), id)
      .await
  }

  // ── Founders ──────────────────────────────────────────────────────────────

  async fn list_founders(&self) -> Result<Vec<BriefFounder>> {
    Ok(self.conn.call(|conn| Ok(query::founders(conn, Page::ALL)?)).await?)
  }

  async fn range_founders(&self, skip: u32, take: u32) -> Result<Vec<BriefFounder>> {
    let page = Page::new(skip, take);
    Ok(self.conn.call(move |conn| Ok(query::founders(conn, page)?)).await?)
  }

  async fn founder_details(&self, id: i64) -> Result<DetailsFounder> {
    Ok(self.conn.call(move |conn| query::founder_details(conn, id)).await?)
  }

  async fn create_founder(&self, cmd: CreateFounder) -> Result<i64> {
    validate::create_founder(&cmd)?;
    let today = self.clock.today();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        query::load_person(&tx, cmd.person_id)?;
        let clients = query::existing_ids(&tx, Table::Clients, &cmd.clients)?;

        let id = query::insert_founder(&tx, cmd.person_id, today)?;
        for &client_id in &clients {
          query::link(&tx, client_id, id)?;
        }
        let clients: Vec<i64> = clients.into_iter().collect();
        query::check_entrepreneur_limits(&tx, &clients)?;

        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, "founder created");
    Ok(id)
  }

  async fn update_founder(&self, cmd: UpdateFounder) -> Result<()> {
    validate::update_founder(&cmd)?;
    let today = self.clock.today();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut founder = query::load_founder(&tx, cmd.id)?;
        if let Some(person_id) = cmd.person_id {
          query::load_person(&tx, person_id)?;
        }

        let clients = query::existing_ids(&tx, Table::Clients, &cmd.clients)?;
        let added: Vec<i64> = clients.difference(&founder.clients).copied().collect();
        founder.apply_update(cmd.person_id, clients, today);

        query::save_founder(&tx, &founder)?;
        query::check_entrepreneur_limits(&tx, &added)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_founder(&self, id: i64) -> Result<()> {
    self
      .delete(Table::Founders, |conn, id| query::load_founder(conn, id).map(drop), id)
      .await
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn list_clients(&self) -> Result<Vec<BriefClient>> {
    Ok(self.conn.call(|conn| Ok(query::clients(conn, Page::ALL)?)).await?)
  }

  async fn range_clients(&self, skip: u32, take: u32) -> Result<Vec<BriefClient>> {
    let page = Page::new(skip, take);
    Ok(self.conn.call(move |conn| Ok(query::clients(conn, page)?)).await?)
  }

  async fn client_details(&self, id: i64) -> Result<DetailsClient> {
    Ok(self.conn.call(move |conn| query::client_details(conn, id)).await?)
  }

  async fn create_client(&self, cmd: CreateClient) -> Result<i64> {
    validate::create_client(&cmd)?;
    let raw_kind = cmd.kind.unwrap_or(-1);
    let kind = ClientType::from_discriminant(raw_kind)
      .ok_or(teledok_core::Error::UnknownClientType(raw_kind))?;
    let today = self.clock.today();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let founders = query::existing_ids(&tx, Table::Founders, &cmd.founders)?;
        entity::check_founder_limit(kind, founders.len()).map_err(domain)?;

        let client = Client {
          id: 0,
          name: cmd.name,
          kind,
          tin: cmd.tin,
          added_date: today,
          update_date: today,
          founders,
        };
        let id = query::insert_client(&tx, &client)?;
        for &founder_id in &client.founders {
          query::link(&tx, id, founder_id)?;
        }

        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::debug!(id, ?kind, "client created");
    Ok(id)
  }

  async fn update_client(&self, cmd: UpdateClient) -> Result<()> {
    let today = self.clock.today();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut client = query::load_client(&tx, cmd.id)?;
        let founders = query::existing_ids(&tx, Table::Founders, &cmd.founders)?;
        client.apply_update(cmd, founders, today).map_err(domain)?;
        query::save_client(&tx, &client)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_client(&self, id: i64) -> Result<()> {
    self
      .delete(Table::Clients, |conn, id| query::load_client(conn, id).map(drop), id)
      .await
  }

  // ── Associations ──────────────────────────────────────────────────────────

  async fn unlink(&self, client_id: i64, founder_id: i64) -> Result<()> {
    let today = self.clock.today();

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        query::load_client(&tx, client_id)?;
        query::load_founder(&tx, founder_id)?;

        let removed = query::unlink(&tx, client_id, founder_id)?;
        if removed > 0 {
          query::touch(&tx, Table::Clients, client_id, today)?;
          query::touch(&tx, Table::Founders, founder_id, today)?;
        }
        tx.commit()?;
        Ok(removed)
      })
      .await?;

    tracing::debug!(client_id, founder_id, removed, "association removed");
    Ok(())
  }
}
