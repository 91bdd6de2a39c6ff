//! Synchronous SQL helpers run inside `tokio_rusqlite` connection closures.
//!
//! Functions take `&Connection` so they work on a plain connection or on a
//! `Transaction` (which derefs to one). Lookups that must find a row return
//! `tokio_rusqlite::Result` carrying a domain `NotFound`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension as _, Row, params};
use teledok_core::{
  Entity, Error as CoreError,
  command::CreatePerson,
  entity::{self, Client, Founder, Person},
  naming,
  view::{BriefClient, BriefFounder, BriefPerson, DetailsClient, DetailsFounder, DetailsPerson},
};

use crate::{
  encode::{client_type_column, date_column, encode_client_type, encode_date},
  error::domain,
};

type CallResult<T> = tokio_rusqlite::Result<T>;

// ─── Shared ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum Table {
  People,
  Founders,
  Clients,
}

impl Table {
  fn name(self) -> &'static str {
    match self {
      Self::People => "People",
      Self::Founders => "Founders",
      Self::Clients => "Clients",
    }
  }
}

/// `LIMIT`/`OFFSET` pair; a limit of `-1` means "no limit" in SQLite.
#[derive(Debug, Clone, Copy)]
pub struct Page {
  limit:  i64,
  offset: i64,
}

impl Page {
  pub const ALL: Page = Page { limit: -1, offset: 0 };

  pub fn new(skip: u32, take: u32) -> Self {
    Self { limit: i64::from(take), offset: i64::from(skip) }
  }
}

/// The subset of `ids` that exist in `table`, deduplicated.
pub fn existing_ids(conn: &Connection, table: Table, ids: &[i64]) -> rusqlite::Result<BTreeSet<i64>> {
  let mut stmt = conn.prepare_cached(&format!("SELECT 1 FROM {} WHERE Id = ?1", table.name()))?;
  let mut found = BTreeSet::new();
  for &id in ids {
    if stmt.exists(params![id])? {
      found.insert(id);
    }
  }
  Ok(found)
}

/// Delete a row by id, returning how many rows went away.
pub fn delete_row(conn: &Connection, table: Table, id: i64) -> rusqlite::Result<usize> {
  conn.execute(&format!("DELETE FROM {} WHERE Id = ?1", table.name()), params![id])
}

pub fn touch(conn: &Connection, table: Table, id: i64, today: NaiveDate) -> rusqlite::Result<()> {
  conn.execute(
    &format!("UPDATE {} SET UpdateDate = ?2 WHERE Id = ?1", table.name()),
    params![id, encode_date(today)],
  )?;
  Ok(())
}

// ─── People ──────────────────────────────────────────────────────────────────

fn person_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:         row.get(0)?,
    name:       row.get(1)?,
    surname:    row.get(2)?,
    patronymic: row.get(3)?,
    birthday:   date_column(row, 4)?,
    address:    row.get(5)?,
  })
}

pub fn find_person(conn: &Connection, id: i64) -> rusqlite::Result<Option<Person>> {
  conn
    .query_row(
      "SELECT Id, Name, Surname, Patronymic, Birthday, Address FROM People WHERE Id = ?1",
      params![id],
      person_row,
    )
    .optional()
}

pub fn load_person(conn: &Connection, id: i64) -> CallResult<Person> {
  find_person(conn, id)?.ok_or_else(|| domain(CoreError::not_found(Entity::Person, id)))
}

pub fn insert_person(conn: &Connection, cmd: &CreatePerson) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO People (Name, Surname, Patronymic, Birthday, Address)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      cmd.name,
      cmd.surname,
      cmd.patronymic.as_deref().filter(|p| !p.is_empty()),
      cmd.birthday.map(encode_date),
      cmd.address,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn save_person(conn: &Connection, p: &Person) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE People
     SET Name = ?2, Surname = ?3, Patronymic = ?4, Birthday = ?5, Address = ?6
     WHERE Id = ?1",
    params![p.id, p.name, p.surname, p.patronymic, encode_date(p.birthday), p.address],
  )?;
  Ok(())
}

pub fn people(conn: &Connection, page: Page) -> rusqlite::Result<Vec<BriefPerson>> {
  let mut stmt = conn.prepare(
    "SELECT Id, Name, Surname, Patronymic, Birthday, Address
     FROM People ORDER BY Id LIMIT ?1 OFFSET ?2",
  )?;
  let rows = stmt
    .query_map(params![page.limit, page.offset], person_row)?
    .map(|p| {
      p.map(|p| BriefPerson {
        id:        p.id,
        full_name: p.full_name(),
        birthday:  naming::display_date(p.birthday),
      })
    })
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn person_details(p: Person) -> DetailsPerson {
  DetailsPerson {
    id:         p.id,
    full_name:  p.full_name(),
    short_name: p.short_name(),
    birthday:   naming::display_date(p.birthday),
    name:       p.name,
    surname:    p.surname,
    patronymic: p.patronymic,
    address:    p.address,
  }
}

// ─── Founders ────────────────────────────────────────────────────────────────

fn founder_clients(conn: &Connection, founder_id: i64) -> rusqlite::Result<BTreeSet<i64>> {
  let mut stmt = conn.prepare_cached("SELECT ClientsId FROM ClientFounder WHERE FoundersId = ?1")?;
  let ids = stmt.query_map(params![founder_id], |r| r.get(0))?.collect();
  ids
}

pub fn load_founder(conn: &Connection, id: i64) -> CallResult<Founder> {
  let found = conn
    .query_row(
      "SELECT Id, PersonId, AddedDate, UpdateDate FROM Founders WHERE Id = ?1",
      params![id],
      |row| {
        Ok(Founder {
          id:          row.get(0)?,
          person_id:   row.get(1)?,
          added_date:  date_column(row, 2)?,
          update_date: date_column(row, 3)?,
          clients:     BTreeSet::new(),
        })
      },
    )
    .optional()?;

  let mut founder = found.ok_or_else(|| domain(CoreError::not_found(Entity::Founder, id)))?;
  founder.clients = founder_clients(conn, id)?;
  Ok(founder)
}

pub fn insert_founder(conn: &Connection, person_id: i64, today: NaiveDate) -> rusqlite::Result<i64> {
  let today = encode_date(today);
  conn.execute(
    "INSERT INTO Founders (PersonId, AddedDate, UpdateDate) VALUES (?1, ?2, ?2)",
    params![person_id, today],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Persist the scalar columns and make sure every client in the set is
/// linked. Existing links are never removed here.
pub fn save_founder(conn: &Connection, f: &Founder) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE Founders SET PersonId = ?2, UpdateDate = ?3 WHERE Id = ?1",
    params![f.id, f.person_id, encode_date(f.update_date)],
  )?;
  for &client_id in &f.clients {
    link(conn, client_id, f.id)?;
  }
  Ok(())
}

pub fn founders(conn: &Connection, page: Page) -> rusqlite::Result<Vec<BriefFounder>> {
  let mut stmt = conn.prepare(
    "SELECT f.Id, p.Id, p.Name, p.Surname, p.Patronymic, p.Birthday, p.Address
     FROM Founders f JOIN People p ON p.Id = f.PersonId
     ORDER BY f.Id LIMIT ?1 OFFSET ?2",
  )?;
  let rows = stmt
    .query_map(params![page.limit, page.offset], |row| {
      let id: i64 = row.get(0)?;
      let person = Person {
        id:         row.get(1)?,
        name:       row.get(2)?,
        surname:    row.get(3)?,
        patronymic: row.get(4)?,
        birthday:   date_column(row, 5)?,
        address:    row.get(6)?,
      };
      Ok(BriefFounder {
        id,
        name: person.full_name(),
        birthday: naming::display_date(person.birthday),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn founder_details(conn: &Connection, id: i64) -> CallResult<DetailsFounder> {
  let founder = load_founder(conn, id)?;
  let person = load_person(conn, founder.person_id)?;

  let mut stmt = conn.prepare(
    "SELECT c.Id, c.Name
     FROM ClientFounder cf JOIN Clients c ON c.Id = cf.ClientsId
     WHERE cf.FoundersId = ?1 ORDER BY c.Id",
  )?;
  let clients = stmt
    .query_map(params![id], |row| {
      let client_id: i64 = row.get(0)?;
      let name: String = row.get(1)?;
      Ok(naming::labelled(&name, client_id))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(DetailsFounder {
    id:          founder.id,
    person_id:   person.id,
    full_name:   person.full_name(),
    short_name:  person.short_name(),
    birthday:    naming::display_date(person.birthday),
    address:     person.address,
    added_date:  naming::display_date(founder.added_date),
    update_date: naming::display_date(founder.update_date),
    clients,
  })
}

// ─── Clients ─────────────────────────────────────────────────────────────────

fn client_founders(conn: &Connection, client_id: i64) -> rusqlite::Result<BTreeSet<i64>> {
  let mut stmt = conn.prepare_cached("SELECT FoundersId FROM ClientFounder WHERE ClientsId = ?1")?;
  let ids = stmt.query_map(params![client_id], |r| r.get(0))?.collect();
  ids
}

pub fn load_client(conn: &Connection, id: i64) -> CallResult<Client> {
  let found = conn
    .query_row(
      "SELECT Id, Name, Type, TIN, AddedDate, UpdateDate FROM Clients WHERE Id = ?1",
      params![id],
      |row| {
        Ok(Client {
          id:          row.get(0)?,
          name:        row.get(1)?,
          kind:        client_type_column(row, 2)?,
          tin:         row.get(3)?,
          added_date:  date_column(row, 4)?,
          update_date: date_column(row, 5)?,
          founders:    BTreeSet::new(),
        })
      },
    )
    .optional()?;

  let mut client = found.ok_or_else(|| domain(CoreError::not_found(Entity::Client, id)))?;
  client.founders = client_founders(conn, id)?;
  Ok(client)
}

/// Insert the client row (without links) and return its id.
pub fn insert_client(conn: &Connection, c: &Client) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO Clients (Name, Type, TIN, AddedDate, UpdateDate) VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      c.name,
      encode_client_type(c.kind),
      c.tin,
      encode_date(c.added_date),
      encode_date(c.update_date),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Persist the scalar columns and make sure every founder in the set is
/// linked. Existing links are never removed here.
pub fn save_client(conn: &Connection, c: &Client) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE Clients SET Name = ?2, Type = ?3, TIN = ?4, UpdateDate = ?5 WHERE Id = ?1",
    params![c.id, c.name, encode_client_type(c.kind), c.tin, encode_date(c.update_date)],
  )?;
  for &founder_id in &c.founders {
    link(conn, c.id, founder_id)?;
  }
  Ok(())
}

pub fn clients(conn: &Connection, page: Page) -> rusqlite::Result<Vec<BriefClient>> {
  let mut stmt = conn.prepare("SELECT Id, Name, Type FROM Clients ORDER BY Id LIMIT ?1 OFFSET ?2")?;
  let rows = stmt
    .query_map(params![page.limit, page.offset], |row| {
      Ok(BriefClient {
        id:   row.get(0)?,
        name: row.get(1)?,
        kind: client_type_column(row, 2)?.description().to_owned(),
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn client_details(conn: &Connection, id: i64) -> CallResult<DetailsClient> {
  let client = load_client(conn, id)?;

  let mut stmt = conn.prepare(
    "SELECT f.Id, p.Surname, p.Name, p.Patronymic
     FROM ClientFounder cf
     JOIN Founders f ON f.Id = cf.FoundersId
     JOIN People   p ON p.Id = f.PersonId
     WHERE cf.ClientsId = ?1 ORDER BY f.Id",
  )?;
  let founders = stmt
    .query_map(params![id], |row| {
      let founder_id: i64 = row.get(0)?;
      let surname: String = row.get(1)?;
      let name: String = row.get(2)?;
      let patronymic: Option<String> = row.get(3)?;
      let full = naming::full_name(&surname, &name, patronymic.as_deref());
      Ok(naming::labelled(&full, founder_id))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(DetailsClient {
    id:          client.id,
    name:        client.name,
    kind:        client.kind.description().to_owned(),
    tin:         client.tin,
    added_date:  naming::display_date(client.added_date),
    update_date: naming::display_date(client.update_date),
    founders,
  })
}

// ─── Associations ────────────────────────────────────────────────────────────

pub fn link(conn: &Connection, client_id: i64, founder_id: i64) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT OR IGNORE INTO ClientFounder (ClientsId, FoundersId) VALUES (?1, ?2)",
    params![client_id, founder_id],
  )?;
  Ok(())
}

pub fn unlink(conn: &Connection, client_id: i64, founder_id: i64) -> rusqlite::Result<usize> {
  conn.execute(
    "DELETE FROM ClientFounder WHERE ClientsId = ?1 AND FoundersId = ?2",
    params![client_id, founder_id],
  )
}

/// Re-check the founder limit for clients whose founder set was extended
/// from the founder side.
pub fn check_entrepreneur_limits(conn: &Connection, client_ids: &[i64]) -> CallResult<()> {
  let mut stmt = conn.prepare_cached(
    "SELECT c.Type, (SELECT COUNT(*) FROM ClientFounder cf WHERE cf.ClientsId = c.Id)
     FROM Clients c WHERE c.Id = ?1",
  )?;
  for &id in client_ids {
    let (kind, count): (_, i64) =
      stmt.query_row(params![id], |row| Ok((client_type_column(row, 0)?, row.get(1)?)))?;
    entity::check_founder_limit(kind, usize::try_from(count).unwrap_or(usize::MAX)).map_err(domain)?;
  }
  Ok(())
}
