//! Subcommands and their execution against the API.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;
use teledok_core::{
  command::{CreateClient, CreateFounder, CreatePerson, Patch, UpdateClient, UpdateFounder, UpdatePerson},
  entity::ClientType,
  view::{BriefClient, BriefFounder, BriefPerson, DetailsClient, DetailsFounder, DetailsPerson},
};

use crate::{client::ApiClient, output};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Natural persons.
  #[command(subcommand)]
  Person(PersonCommand),
  /// Founders: persons linked to clients.
  #[command(subcommand)]
  Founder(FounderCommand),
  /// Clients: individual entrepreneurs and legal entities.
  #[command(subcommand)]
  Client(ClientCommand),
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
  List,
  /// Skip `skip` records, then show at most `take`.
  Range { skip: u32, take: u32 },
  Show { id: i64 },
  Create {
    #[arg(long)]
    name:       String,
    #[arg(long)]
    surname:    String,
    #[arg(long)]
    patronymic: Option<String>,
    /// `YYYY-MM-DD`, strictly before today.
    #[arg(long)]
    birthday:   NaiveDate,
    #[arg(long)]
    address:    Option<String>,
  },
  /// Change only the given fields.
  Update {
    id:               i64,
    #[arg(long)]
    name:             Option<String>,
    #[arg(long)]
    surname:          Option<String>,
    #[arg(long, conflicts_with = "clear_patronymic")]
    patronymic:       Option<String>,
    #[arg(long)]
    clear_patronymic: bool,
    #[arg(long)]
    birthday:         Option<NaiveDate>,
    #[arg(long, conflicts_with = "clear_address")]
    address:          Option<String>,
    #[arg(long)]
    clear_address:    bool,
  },
  Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum FounderCommand {
  List,
  Range { skip: u32, take: u32 },
  Show { id: i64 },
  Create {
    #[arg(long)]
    person_id: i64,
    /// Client to associate; repeatable.
    #[arg(long = "client")]
    clients:   Vec<i64>,
  },
  /// Re-link the person and/or add clients. Existing clients are kept.
  Update {
    id:        i64,
    #[arg(long)]
    person_id: Option<i64>,
    #[arg(long = "client")]
    clients:   Vec<i64>,
  },
  Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
  List,
  Range { skip: u32, take: u32 },
  Show { id: i64 },
  Create {
    #[arg(long)]
    name:     String,
    #[arg(long = "type", value_enum)]
    kind:     KindArg,
    #[arg(long)]
    tin:      String,
    /// Founder to associate; repeatable.
    #[arg(long = "founder")]
    founders: Vec<i64>,
  },
  /// Change the given fields and add founders. Existing founders are kept.
  Update {
    id:       i64,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long = "type", value_enum)]
    kind:     Option<KindArg>,
    #[arg(long)]
    tin:      Option<String>,
    #[arg(long = "founder")]
    founders: Vec<i64>,
  },
  Delete { id: i64 },
  /// Remove one founder from a client.
  Unlink { id: i64, founder_id: i64 },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
  /// Individual entrepreneur (12-digit TIN).
  Ie,
  /// Legal entity (10-digit TIN).
  Le,
}

impl From<KindArg> for ClientType {
  fn from(kind: KindArg) -> Self {
    match kind {
      KindArg::Ie => ClientType::IndividualEntrepreneur,
      KindArg::Le => ClientType::LegalEntity,
    }
  }
}

fn patch(value: Option<String>, clear: bool) -> Patch<String> {
  match (value, clear) {
    (Some(v), _) => Patch::Value(v),
    (None, true) => Patch::Null,
    (None, false) => Patch::Absent,
  }
}

fn print_list<T: Serialize>(items: &[T], json: bool, render: fn(&T) -> String) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(items)?);
  } else {
    for item in items {
      println!("{}", render(item));
    }
  }
  Ok(())
}

fn print_one<T: Serialize>(item: &T, json: bool, render: fn(&T) -> String) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(item)?);
  } else {
    println!("{}", render(item));
  }
  Ok(())
}

pub async fn run(command: Command, api: &ApiClient, json: bool) -> Result<()> {
  match command {
    Command::Person(cmd) => person(cmd, api, json).await,
    Command::Founder(cmd) => founder(cmd, api, json).await,
    Command::Client(cmd) => client(cmd, api, json).await,
  }
}

async fn person(cmd: PersonCommand, api: &ApiClient, json: bool) -> Result<()> {
  match cmd {
    PersonCommand::List => {
      let people: Vec<BriefPerson> = api.get("/Person").await?;
      print_list(&people, json, output::brief_person)
    }
    PersonCommand::Range { skip, take } => {
      let people: Vec<BriefPerson> = api.get(&format!("/Person/{skip}/{take}")).await?;
      print_list(&people, json, output::brief_person)
    }
    PersonCommand::Show { id } => {
      let person: DetailsPerson = api.get(&format!("/Person/{id}")).await?;
      print_one(&person, json, output::details_person)
    }
    PersonCommand::Create { name, surname, patronymic, birthday, address } => {
      let body = CreatePerson { name, surname, patronymic, birthday: Some(birthday), address };
      let id = api.create("/Person", &body).await?;
      println!("{id}");
      Ok(())
    }
    PersonCommand::Update {
      id,
      name,
      surname,
      patronymic,
      clear_patronymic,
      birthday,
      address,
      clear_address,
    } => {
      let body = UpdatePerson {
        id,
        name,
        surname,
        patronymic: patch(patronymic, clear_patronymic),
        birthday,
        address: patch(address, clear_address),
      };
      api.update("/Person", &body).await
    }
    PersonCommand::Delete { id } => api.delete(&format!("/Person/{id}")).await,
  }
}

async fn founder(cmd: FounderCommand, api: &ApiClient, json: bool) -> Result<()> {
  match cmd {
    FounderCommand::List => {
      let founders: Vec<BriefFounder> = api.get("/Founder").await?;
      print_list(&founders, json, output::brief_founder)
    }
    FounderCommand::Range { skip, take } => {
      let founders: Vec<BriefFounder> = api.get(&format!("/Founder/{skip}/{take}")).await?;
      print_list(&founders, json, output::brief_founder)
    }
    FounderCommand::Show { id } => {
      let founder: DetailsFounder = api.get(&format!("/Founder/{id}")).await?;
      print_one(&founder, json, output::details_founder)
    }
    FounderCommand::Create { person_id, clients } => {
      let id = api.create("/Founder", &CreateFounder { person_id, clients }).await?;
      println!("{id}");
      Ok(())
    }
    FounderCommand::Update { id, person_id, clients } => {
      api.update("/Founder", &UpdateFounder { id, person_id, clients }).await
    }
    FounderCommand::Delete { id } => api.delete(&format!("/Founder/{id}")).await,
  }
}

async fn client(cmd: ClientCommand, api: &ApiClient, json: bool) -> Result<()> {
  match cmd {
    ClientCommand::List => {
      let clients: Vec<BriefClient> = api.get("/Client").await?;
      print_list(&clients, json, output::brief_client)
    }
    ClientCommand::Range { skip, take } => {
      let clients: Vec<BriefClient> = api.get(&format!("/Client/{skip}/{take}")).await?;
      print_list(&clients, json, output::brief_client)
    }
    ClientCommand::Show { id } => {
      let client: DetailsClient = api.get(&format!("/Client/{id}")).await?;
      print_one(&client, json, output::details_client)
    }
    ClientCommand::Create { name, kind, tin, founders } => {
      let body = CreateClient {
        name,
        kind: Some(ClientType::from(kind).discriminant()),
        tin,
        founders,
      };
      let id = api.create("/Client", &body).await?;
      println!("{id}");
      Ok(())
    }
    ClientCommand::Update { id, name, kind, tin, founders } => {
      let body = UpdateClient {
        id,
        name,
        kind: kind.map(|k| ClientType::from(k).discriminant()),
        tin,
        founders,
      };
      api.update("/Client", &body).await
    }
    ClientCommand::Delete { id } => api.delete(&format!("/Client/{id}")).await,
    ClientCommand::Unlink { id, founder_id } => {
      api.delete(&format!("/Client/{id}/Founder/{founder_id}")).await
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_from_flags() {
    assert_eq!(patch(Some("x".into()), false), Patch::Value("x".into()));
    assert_eq!(patch(None, true), Patch::Null);
    assert_eq!(patch(None, false), Patch::Absent);
  }

  #[test]
  fn kind_arg_maps_to_wire_discriminant() {
    assert_eq!(ClientType::from(KindArg::Ie).discriminant(), 0);
    assert_eq!(ClientType::from(KindArg::Le).discriminant(), 1);
  }
}
