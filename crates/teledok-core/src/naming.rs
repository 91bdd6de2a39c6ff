//! Display formatting shared by every projection.

use chrono::NaiveDate;

/// `"Surname Name[ Patronymic]"`; an empty patronymic is treated as absent.
pub fn full_name(surname: &str, name: &str, patronymic: Option<&str>) -> String {
  let mut full = format!("{surname} {name}");
  if let Some(p) = patronymic.filter(|p| !p.is_empty()) {
    full.push(' ');
    full.push_str(p);
  }
  full
}

/// `"Surname N.P."`
pub fn short_name(surname: &str, name: &str, patronymic: Option<&str>) -> String {
  let mut short = surname.to_owned();
  short.push(' ');
  for part in [Some(name), patronymic] {
    if let Some(initial) = part.and_then(|p| p.chars().next()) {
      short.push(initial);
      short.push('.');
    }
  }
  short
}

/// Short date form used in every projection: `dd.MM.yyyy`.
pub fn display_date(date: NaiveDate) -> String { date.format("%d.%m.%Y").to_string() }

/// `"Label (id = X)"`, used for association lists.
pub fn labelled(label: &str, id: i64) -> String { format!("{label} (id = {id})") }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_name_without_patronymic() {
    assert_eq!(full_name("Ivanov", "Ivan", None), "Ivanov Ivan");
    assert_eq!(full_name("Ivanov", "Ivan", Some("")), "Ivanov Ivan");
  }

  #[test]
  fn full_name_with_patronymic() {
    assert_eq!(full_name("Ivanov", "Ivan", Some("Petrovich")), "Ivanov Ivan Petrovich");
  }

  #[test]
  fn short_name_forms() {
    assert_eq!(short_name("Ivanov", "Ivan", Some("Petrovich")), "Ivanov I.P.");
    assert_eq!(short_name("Ivanov", "Ivan", None), "Ivanov I.");
    assert_eq!(short_name("Иванов", "Иван", Some("Петрович")), "Иванов И.П.");
  }

  #[test]
  fn dates_render_day_first() {
    let d = NaiveDate::from_ymd_opt(1990, 3, 7).unwrap();
    assert_eq!(display_date(d), "07.03.1990");
  }

  #[test]
  fn association_label() {
    assert_eq!(labelled("Horns and Hooves", 4), "Horns and Hooves (id = 4)");
  }
}
