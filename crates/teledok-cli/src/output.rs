//! Plain-text rendering of API projections.

use teledok_core::view::{
  BriefClient, BriefFounder, BriefPerson, DetailsClient, DetailsFounder, DetailsPerson,
};

pub fn brief_person(p: &BriefPerson) -> String {
  format!("Id: {}, Name: {}, Birthday: {}", p.id, p.full_name, p.birthday)
}

pub fn brief_founder(f: &BriefFounder) -> String {
  format!("Id: {}, Name: {}, Birthday: {}", f.id, f.name, f.birthday)
}

pub fn brief_client(c: &BriefClient) -> String {
  format!("Id: {}, Name: {}, Type: {}", c.id, c.name, c.kind)
}

pub fn details_person(p: &DetailsPerson) -> String {
  [
    format!("Id: {}", p.id),
    format!("Surname: {}", p.surname),
    format!("Name: {}", p.name),
    format!("Patronymic: {}", p.patronymic.as_deref().unwrap_or("-")),
    format!("FullName: {}", p.full_name),
    format!("ShortName: {}", p.short_name),
    format!("Birthday: {}", p.birthday),
    format!("Address: {}", p.address.as_deref().unwrap_or("-")),
  ]
  .join("\n")
}

pub fn details_founder(f: &DetailsFounder) -> String {
  let mut out = vec![
    format!("Id: {}", f.id),
    format!("PersonId: {}", f.person_id),
    format!("FullName: {}", f.full_name),
    format!("ShortName: {}", f.short_name),
    format!("Birthday: {}", f.birthday),
    format!("Address: {}", f.address.as_deref().unwrap_or("-")),
    format!("Added: {}", f.added_date),
    format!("Updated: {}", f.update_date),
    "Clients:".to_owned(),
  ];
  out.extend(f.clients.iter().map(|c| format!("  {c}")));
  out.join("\n")
}

pub fn details_client(c: &DetailsClient) -> String {
  let mut out = vec![
    format!("Id: {}", c.id),
    format!("Name: {}", c.name),
    format!("Type: {}", c.kind),
    format!("TIN: {}", c.tin),
    format!("Added: {}", c.added_date),
    format!("Updated: {}", c.update_date),
    "Founders:".to_owned(),
  ];
  out.extend(c.founders.iter().map(|f| format!("  {f}")));
  out.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn brief_person_line() {
    let p = BriefPerson { id: 3, full_name: "Ivanov Ivan".into(), birthday: "01.02.1990".into() };
    assert_eq!(brief_person(&p), "Id: 3, Name: Ivanov Ivan, Birthday: 01.02.1990");
  }

  #[test]
  fn client_details_list_founders_indented() {
    let c = DetailsClient {
      id:          1,
      name:        "Roga i Kopyta".into(),
      kind:        "Юридическое лицо".into(),
      tin:         "7701234567".into(),
      added_date:  "28.03.2025".into(),
      update_date: "28.03.2025".into(),
      founders:    vec!["Ivanov Ivan (id = 2)".into()],
    };
    let text = details_client(&c);
    assert!(text.contains("TIN: 7701234567"));
    assert!(text.ends_with("Founders:\n  Ivanov Ivan (id = 2)"));
  }

  #[test]
  fn missing_optional_fields_render_as_dash() {
    let p = DetailsPerson {
      id:         1,
      name:       "Ivan".into(),
      surname:    "Ivanov".into(),
      patronymic: None,
      full_name:  "Ivanov Ivan".into(),
      short_name: "Ivanov I.".into(),
      birthday:   "01.02.1990".into(),
      address:    None,
    };
    let text = details_person(&p);
    assert!(text.contains("Patronymic: -"));
    assert!(text.contains("Address: -"));
  }
}
